use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use glam::DVec3;

use collision::contact::aabb_vs_aabb;
use collision::{
    Aabb, CollisionError, CollisionEventKind, CollisionFilter, CollisionKind, CollisionPair,
    CollisionResponder, CollisionWorld, ContactSolver, RigidBodyAdapter, SweepAndPrune,
};

#[derive(Debug, Clone, Copy)]
struct Body {
    position: DVec3,
    half_extents: DVec3,
    velocity: DVec3,
    inverse_mass: f64,
    restitution: f64,
    friction: f64,
    filter: CollisionFilter,
}

impl Body {
    fn fixed(position: DVec3, half_extents: DVec3) -> Self {
        Self {
            position,
            half_extents,
            velocity: DVec3::ZERO,
            inverse_mass: 0.0,
            restitution: 0.0,
            friction: 0.5,
            filter: CollisionFilter::DEFAULT,
        }
    }

    fn dynamic(position: DVec3, half_extents: DVec3) -> Self {
        Self {
            inverse_mass: 1.0,
            ..Self::fixed(position, half_extents)
        }
    }

    fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }
}

type Store = Rc<RefCell<Vec<Body>>>;

struct StoreAdapter {
    store: Store,
}

impl RigidBodyAdapter<usize> for StoreAdapter {
    fn position(&self, body: &usize) -> DVec3 {
        self.store.borrow()[*body].position
    }
    fn set_position(&mut self, body: &usize, position: DVec3) {
        self.store.borrow_mut()[*body].position = position;
    }
    fn velocity(&self, body: &usize) -> DVec3 {
        self.store.borrow()[*body].velocity
    }
    fn set_velocity(&mut self, body: &usize, velocity: DVec3) {
        self.store.borrow_mut()[*body].velocity = velocity;
    }
    fn inverse_mass(&self, body: &usize) -> f64 {
        self.store.borrow()[*body].inverse_mass
    }
    fn restitution(&self, body: &usize) -> f64 {
        self.store.borrow()[*body].restitution
    }
    fn friction(&self, body: &usize) -> f64 {
        self.store.borrow()[*body].friction
    }
}

fn world_over(store: &Store) -> CollisionWorld<usize> {
    let bounds_store = store.clone();
    let filter_store = store.clone();
    let narrow_store = store.clone();
    CollisionWorld::new(
        Box::new(SweepAndPrune::new()),
        move |i: &usize| bounds_store.borrow()[*i].aabb(),
        move |i: &usize| Some(filter_store.borrow()[*i].filter),
        move |a: &usize, b: &usize| {
            let bodies = narrow_store.borrow();
            aabb_vs_aabb(&bodies[*a].aabb(), &bodies[*b].aabb())
        },
    )
}

fn strict_solver() -> ContactSolver {
    let mut solver = ContactSolver::new();
    solver.set_position_correction_percent(1.0);
    solver.set_position_correction_slop(0.0);
    solver
}

#[test]
fn emits_enter_stay_exit_for_persistent_pair() {
    let store: Store = Rc::new(RefCell::new(vec![
        Body::dynamic(DVec3::new(1.0, 1.0, 1.0), DVec3::splat(1.0)),
        Body::dynamic(DVec3::new(2.0, 1.0, 1.0), DVec3::splat(1.0)),
    ]));
    let mut world = world_over(&store);
    let items = [0usize, 1];

    let frame1 = world.update(&items);
    assert_eq!(frame1.len(), 1);
    assert_eq!(frame1[0].kind, CollisionEventKind::Enter);

    let frame2 = world.update(&items);
    assert_eq!(frame2.len(), 1);
    assert_eq!(frame2[0].kind, CollisionEventKind::Stay);

    store.borrow_mut()[1].position = DVec3::new(6.0, 1.0, 1.0);
    let frame3 = world.update(&items);
    assert_eq!(frame3.len(), 1);
    assert_eq!(frame3[0].kind, CollisionEventKind::Exit);
    // The exit event carries the last colliding manifold.
    assert!(frame3[0].manifold.depth > 0.0);

    let frame4 = world.update(&items);
    assert!(frame4.is_empty());
}

#[test]
fn trigger_pairs_emit_events_without_response() {
    let store: Store = Rc::new(RefCell::new(vec![
        Body::dynamic(DVec3::new(1.0, 1.0, 1.0), DVec3::splat(1.0)),
        Body::dynamic(DVec3::new(2.0, 1.0, 1.0), DVec3::splat(1.0)),
    ]));
    store.borrow_mut()[0].filter = CollisionFilter::new(0b0001, 0b0110, CollisionKind::Solid);
    store.borrow_mut()[1].filter = CollisionFilter::new(0b0010, 0b1111, CollisionKind::Trigger);

    let mut world = world_over(&store);
    world.set_body_adapter(Box::new(StoreAdapter { store: store.clone() }));
    world.set_responder(CollisionResponder::Solver(strict_solver()));

    let before = store.borrow().clone();
    let events = world.update(&[0, 1]);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, CollisionEventKind::Enter);
    assert!(!events[0].response_enabled);
    // The solver must leave both bodies untouched.
    let after = store.borrow().clone();
    assert_eq!(before[0].position, after[0].position);
    assert_eq!(before[1].position, after[1].position);
    assert_eq!(before[0].velocity, after[0].velocity);
}

#[test]
fn manifold_cache_is_reused_and_order_insensitive() {
    let store: Store = Rc::new(RefCell::new(vec![
        Body::dynamic(DVec3::new(1.0, 1.0, 1.0), DVec3::splat(1.0)),
        Body::dynamic(DVec3::new(2.0, 1.0, 1.0), DVec3::splat(1.0)),
    ]));
    let mut world = world_over(&store);

    world.update(&[0, 1]);
    assert!(world.manifold_cache().get(&CollisionPair::new(0, 1)).is_some());
    assert!(world.manifold_cache().get(&CollisionPair::new(1, 0)).is_some());

    world.update(&[0, 1]);
    assert!(world.manifold_cache().get(&CollisionPair::new(1, 0)).is_some());
}

#[test]
fn stale_cache_entries_expire_after_retention() {
    let store: Store = Rc::new(RefCell::new(vec![
        Body::dynamic(DVec3::new(1.0, 1.0, 1.0), DVec3::splat(1.0)),
        Body::dynamic(DVec3::new(2.0, 1.0, 1.0), DVec3::splat(1.0)),
    ]));
    let mut world = world_over(&store);
    world.set_retention_frames(1);

    world.update(&[0, 1]);
    store.borrow_mut()[1].position = DVec3::new(10.0, 1.0, 1.0);
    world.update(&[0, 1]);
    assert!(world.manifold_cache().get(&CollisionPair::new(0, 1)).is_some());
    world.update(&[0, 1]);
    assert!(world.manifold_cache().get(&CollisionPair::new(0, 1)).is_none());
}

#[test]
fn resting_box_settles_on_floor_and_stays() {
    let store: Store = Rc::new(RefCell::new(vec![
        Body::fixed(DVec3::ZERO, DVec3::new(5.0, 0.5, 5.0)),
        Body::dynamic(DVec3::new(0.0, 0.9, 0.0), DVec3::splat(0.5)),
    ]));
    let mut world = world_over(&store);
    world.set_body_adapter(Box::new(StoreAdapter { store: store.clone() }));
    world.set_responder(CollisionResponder::Solver(strict_solver()));

    let frame1 = world.update(&[0, 1]);
    assert_eq!(frame1[0].kind, CollisionEventKind::Enter);
    assert_relative_eq!(store.borrow()[1].position.y, 1.0, epsilon = 1e-6);

    for _ in 0..5 {
        let events = world.update(&[0, 1]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, CollisionEventKind::Stay);
    }
    assert_relative_eq!(store.borrow()[1].position.y, 1.0, epsilon = 1e-6);
}

#[test]
fn kinematic_bodies_never_move() {
    let store: Store = Rc::new(RefCell::new(vec![
        Body::fixed(DVec3::ZERO, DVec3::splat(1.0)),
        Body::fixed(DVec3::new(1.0, 0.0, 0.0), DVec3::splat(1.0)),
    ]));
    let mut world = world_over(&store);
    world.set_body_adapter(Box::new(StoreAdapter { store: store.clone() }));
    world.set_responder(CollisionResponder::Solver(strict_solver()));
    world.set_gravity(DVec3::new(0.0, -9.81, 0.0));

    for _ in 0..10 {
        world.step(&[0, 1], 0.016).unwrap();
    }
    let bodies = store.borrow();
    assert_eq!(bodies[0].position, DVec3::ZERO);
    assert_eq!(bodies[1].position, DVec3::new(1.0, 0.0, 0.0));
    assert_eq!(bodies[0].velocity, DVec3::ZERO);
    assert_eq!(bodies[1].velocity, DVec3::ZERO);
}

#[test]
fn step_validates_timestep_and_adapter() {
    let store: Store = Rc::new(RefCell::new(vec![Body::dynamic(
        DVec3::ZERO,
        DVec3::splat(0.5),
    )]));
    let mut world = world_over(&store);

    assert!(matches!(
        world.step(&[0], 0.016),
        Err(CollisionError::MissingBodyAdapter)
    ));

    world.set_body_adapter(Box::new(StoreAdapter { store: store.clone() }));
    assert!(matches!(
        world.step(&[0], 0.0),
        Err(CollisionError::InvalidTimestep(_))
    ));
    assert!(matches!(
        world.step(&[0], -0.01),
        Err(CollisionError::InvalidTimestep(_))
    ));
    assert!(matches!(
        world.step(&[0], f64::NAN),
        Err(CollisionError::InvalidTimestep(_))
    ));
    assert!(world.step(&[0], 10.0).is_ok());
}

#[test]
fn stepped_mover_produces_ordered_lifecycle() {
    let store: Store = Rc::new(RefCell::new(vec![
        Body::fixed(DVec3::ZERO, DVec3::splat(0.5)),
        Body::dynamic(DVec3::new(-2.0, 0.0, 0.0), DVec3::splat(0.5)),
    ]));
    store.borrow_mut()[1].velocity = DVec3::new(1.0, 0.0, 0.0);

    let mut world = world_over(&store);
    world.set_body_adapter(Box::new(StoreAdapter { store: store.clone() }));

    let mut timeline = Vec::new();
    for _ in 0..8 {
        let events = world.step(&[0, 1], 0.5).unwrap();
        if !events.is_empty() {
            assert_eq!(events.len(), 1);
            timeline.push(events[0].kind);
        }
    }
    assert_eq!(
        timeline,
        vec![
            CollisionEventKind::Enter,
            CollisionEventKind::Stay,
            CollisionEventKind::Stay,
            CollisionEventKind::Stay,
            CollisionEventKind::Stay,
            CollisionEventKind::Exit,
        ]
    );
}

#[test]
fn identical_input_sequences_produce_identical_events_and_state() {
    let run = || {
        let store: Store = Rc::new(RefCell::new(vec![
            Body::fixed(DVec3::ZERO, DVec3::new(5.0, 0.5, 5.0)),
            Body::dynamic(DVec3::new(0.0, 0.9, 0.0), DVec3::splat(0.5)),
            Body::dynamic(DVec3::new(0.0, 1.7, 0.0), DVec3::splat(0.5)),
        ]));
        let mut world = world_over(&store);
        world.set_body_adapter(Box::new(StoreAdapter { store: store.clone() }));
        world.set_responder(CollisionResponder::Solver(strict_solver()));
        world.set_solver_iterations(6);
        world.set_gravity(DVec3::new(0.0, -9.81, 0.0));

        let mut keys = Vec::new();
        for _ in 0..50 {
            for event in world.step(&[0, 1, 2], 0.01).unwrap() {
                keys.push(format!(
                    "{}-{}-{:?}",
                    event.pair.first(),
                    event.pair.second(),
                    event.kind
                ));
            }
        }
        let bodies = store.borrow();
        (keys, bodies[1].position, bodies[2].position, bodies[1].velocity)
    };

    let (keys_a, pos1_a, pos2_a, vel_a) = run();
    let (keys_b, pos1_b, pos2_b, vel_b) = run();
    assert_eq!(keys_a, keys_b);
    // Bit-exact reproducibility, not just approximate agreement.
    assert_eq!(pos1_a, pos1_b);
    assert_eq!(pos2_a, pos2_b);
    assert_eq!(vel_a, vel_b);
}

#[test]
fn iterative_solver_keeps_small_stack_finite_and_separated() {
    let store: Store = Rc::new(RefCell::new(vec![
        Body::fixed(DVec3::ZERO, DVec3::new(5.0, 0.5, 5.0)),
        Body::dynamic(DVec3::new(0.0, 0.9, 0.0), DVec3::splat(0.5)),
        Body::dynamic(DVec3::new(0.0, 1.7, 0.0), DVec3::splat(0.5)),
    ]));
    let mut world = world_over(&store);
    world.set_body_adapter(Box::new(StoreAdapter { store: store.clone() }));
    world.set_responder(CollisionResponder::Solver(strict_solver()));
    world.set_solver_iterations(8);
    world.set_gravity(DVec3::new(0.0, -9.81, 0.0));

    for _ in 0..60 {
        world.step(&[0, 1, 2], 0.01).unwrap();
    }
    let bodies = store.borrow();
    assert!(bodies[1].position.y.is_finite());
    assert!(bodies[2].position.y.is_finite());
    // Top box stays stacked above the bottom one.
    assert!(bodies[2].position.y > bodies[1].position.y);
    assert!(bodies[1].position.y > 0.5);
}

#[test]
fn warm_start_impulses_persist_in_the_cache() {
    let store: Store = Rc::new(RefCell::new(vec![
        Body::fixed(DVec3::ZERO, DVec3::new(5.0, 0.5, 5.0)),
        Body::dynamic(DVec3::new(0.0, 0.9, 0.0), DVec3::splat(0.5)),
    ]));
    store.borrow_mut()[1].velocity = DVec3::new(0.0, -1.0, 0.0);

    let mut world = world_over(&store);
    world.set_body_adapter(Box::new(StoreAdapter { store: store.clone() }));
    world.set_responder(CollisionResponder::Solver(strict_solver()));

    world.update(&[0, 1]);
    let warm = world
        .manifold_cache()
        .warm_start(&CollisionPair::new(0, 1))
        .unwrap();
    assert!(warm.normal > 0.0);
}

#[test]
fn custom_responder_sees_each_response_event_once() {
    let store: Store = Rc::new(RefCell::new(vec![
        Body::dynamic(DVec3::new(1.0, 1.0, 1.0), DVec3::splat(1.0)),
        Body::dynamic(DVec3::new(2.0, 1.0, 1.0), DVec3::splat(1.0)),
        Body::dynamic(DVec3::new(2.5, 1.0, 1.0), DVec3::splat(1.0)),
    ]));
    let mut world = world_over(&store);

    let seen: Rc<RefCell<Vec<(usize, usize)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    world.set_responder(CollisionResponder::Custom(Box::new(move |event| {
        sink.borrow_mut()
            .push((*event.pair.first(), *event.pair.second()));
    })));

    world.update(&[0, 1, 2]);
    let mut calls = seen.borrow().clone();
    calls.sort_unstable();
    assert_eq!(calls, vec![(0, 1), (0, 2), (1, 2)]);
}
