//! Frame orchestration: broad phase, filtering, narrow phase, event diff,
//! cache discipline and contact response.
//!
//! Items are opaque handles (`T: Clone + Eq + Hash + Debug`): the world
//! borrows them for the duration of a frame and keeps clones in the
//! previous-frame map and the manifold cache, so handles must stay valid
//! for `retention_frames` after they were last seen.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use glam::DVec3;
use tracing::{debug, trace, warn};

use crate::body::RigidBodyAdapter;
use crate::broad_phase::BroadPhase;
use crate::cache::{ManifoldCache, WarmStartImpulse};
use crate::contact::ContactManifold;
use crate::error::CollisionError;
use crate::events::{CollisionEvent, CollisionEventKind};
use crate::filtering::{filter_pairs, CollisionFilter};
use crate::pair::CollisionPair;
use crate::steps::constraint::Constraint;
use crate::steps::contact::ContactSolver;
use crate::steps::integration;
use crate::types::Aabb;

/// How collisions get answered when response-enabled events exist.
pub enum CollisionResponder<T> {
    /// The built-in iterative solver, driven with warm starting by the
    /// world (requires a bound body adapter).
    Solver(ContactSolver),
    /// A host callback invoked once per response-enabled event.
    Custom(Box<dyn FnMut(&CollisionEvent<T>)>),
}

#[derive(Clone)]
struct FrameCollision {
    response_enabled: bool,
    manifold: ContactManifold,
}

/// Per-frame orchestrator over an opaque item type.
pub struct CollisionWorld<T: Clone + Eq + Hash + fmt::Debug> {
    broad_phase: Box<dyn BroadPhase<T>>,
    bounds_of: Box<dyn Fn(&T) -> Aabb>,
    filter_of: Box<dyn Fn(&T) -> Option<CollisionFilter>>,
    narrow_phase: Box<dyn Fn(&T, &T) -> Option<ContactManifold>>,
    manifold_cache: ManifoldCache<T>,
    constraints: Vec<Box<dyn Constraint<T>>>,

    // Insertion-ordered with a set for membership so event sequences are a
    // pure function of the input order.
    previous_frame: Vec<(CollisionPair<T>, FrameCollision)>,
    previous_set: HashSet<CollisionPair<T>>,

    retention_frames: u64,
    solver_iterations: usize,
    constraint_iterations: usize,
    responder: Option<CollisionResponder<T>>,
    body_adapter: Option<Box<dyn RigidBodyAdapter<T>>>,
    gravity: DVec3,
}

impl<T: Clone + Eq + Hash + fmt::Debug> CollisionWorld<T> {
    pub fn new(
        broad_phase: Box<dyn BroadPhase<T>>,
        bounds_of: impl Fn(&T) -> Aabb + 'static,
        filter_of: impl Fn(&T) -> Option<CollisionFilter> + 'static,
        narrow_phase: impl Fn(&T, &T) -> Option<ContactManifold> + 'static,
    ) -> Self {
        Self {
            broad_phase,
            bounds_of: Box::new(bounds_of),
            filter_of: Box::new(filter_of),
            narrow_phase: Box::new(narrow_phase),
            manifold_cache: ManifoldCache::new(),
            constraints: Vec::new(),
            previous_frame: Vec::new(),
            previous_set: HashSet::new(),
            retention_frames: 2,
            solver_iterations: 1,
            constraint_iterations: 1,
            responder: None,
            body_adapter: None,
            gravity: DVec3::ZERO,
        }
    }

    pub fn set_retention_frames(&mut self, retention_frames: u64) {
        self.retention_frames = retention_frames;
    }

    /// # Panics
    ///
    /// Panics when `solver_iterations` is zero.
    pub fn set_solver_iterations(&mut self, solver_iterations: usize) {
        assert!(solver_iterations >= 1, "solver iterations must be >= 1");
        self.solver_iterations = solver_iterations;
    }

    /// # Panics
    ///
    /// Panics when `constraint_iterations` is zero.
    pub fn set_constraint_iterations(&mut self, constraint_iterations: usize) {
        assert!(constraint_iterations >= 1, "constraint iterations must be >= 1");
        self.constraint_iterations = constraint_iterations;
    }

    pub fn set_responder(&mut self, responder: CollisionResponder<T>) {
        self.responder = Some(responder);
    }

    pub fn clear_responder(&mut self) {
        self.responder = None;
    }

    pub fn set_body_adapter(&mut self, adapter: Box<dyn RigidBodyAdapter<T>>) {
        self.body_adapter = Some(adapter);
    }

    #[must_use]
    pub fn body_adapter(&self) -> Option<&dyn RigidBodyAdapter<T>> {
        self.body_adapter.as_deref()
    }

    /// # Panics
    ///
    /// Panics when `gravity` is non-finite.
    pub fn set_gravity(&mut self, gravity: DVec3) {
        assert!(gravity.is_finite(), "gravity must be finite");
        self.gravity = gravity;
    }

    pub fn add_constraint(&mut self, constraint: Box<dyn Constraint<T>>) {
        self.constraints.push(constraint);
    }

    pub fn clear_constraints(&mut self) {
        self.constraints.clear();
    }

    #[must_use]
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    #[must_use]
    pub fn manifold_cache(&self) -> &ManifoldCache<T> {
        &self.manifold_cache
    }

    pub fn manifold_cache_mut(&mut self) -> &mut ManifoldCache<T> {
        &mut self.manifold_cache
    }

    /// Runs one detection frame: broad phase, filtering, narrow phase,
    /// event diff against the previous frame, cache refresh/prune, and
    /// response application. Events for pairs colliding this frame come
    /// first (`Enter`/`Stay` in discovery order), then `Exit` events in
    /// last frame's order.
    pub fn update(&mut self, items: &[T]) -> Vec<CollisionEvent<T>> {
        self.manifold_cache.next_frame();

        let candidates = self
            .broad_phase
            .find_potential_pairs(items, self.bounds_of.as_ref());
        let candidate_count = candidates.len();
        let filtered = filter_pairs(candidates, self.filter_of.as_ref());
        let filtered_count = filtered.len();

        let mut current_frame: Vec<(CollisionPair<T>, FrameCollision)> =
            Vec::with_capacity(filtered.len());
        let mut current_set: HashSet<CollisionPair<T>> = HashSet::with_capacity(filtered.len());
        for survivor in filtered {
            let Some(manifold) =
                (self.narrow_phase)(survivor.pair.first(), survivor.pair.second())
            else {
                continue;
            };
            self.manifold_cache.put(survivor.pair.clone(), manifold.clone());
            current_set.insert(survivor.pair.clone());
            current_frame.push((
                survivor.pair,
                FrameCollision { response_enabled: survivor.response_enabled, manifold },
            ));
        }

        let mut events = Vec::with_capacity(current_frame.len());
        for (pair, collision) in &current_frame {
            let kind = if self.previous_set.contains(pair) {
                CollisionEventKind::Stay
            } else {
                CollisionEventKind::Enter
            };
            events.push(CollisionEvent {
                pair: pair.clone(),
                kind,
                response_enabled: collision.response_enabled,
                manifold: collision.manifold.clone(),
            });
        }
        for (pair, prior) in &self.previous_frame {
            if !current_set.contains(pair) {
                events.push(CollisionEvent {
                    pair: pair.clone(),
                    kind: CollisionEventKind::Exit,
                    response_enabled: prior.response_enabled,
                    manifold: prior.manifold.clone(),
                });
            }
        }

        self.previous_frame = current_frame;
        self.previous_set = current_set;
        self.manifold_cache.prune_stale(self.retention_frames);

        trace!(
            candidates = candidate_count,
            filtered = filtered_count,
            events = events.len(),
            cached = self.manifold_cache.len(),
            "collision frame"
        );

        self.apply_responses(&events);
        events
    }

    /// Full physics step: gravity integration, positional constraints, the
    /// detection/response frame, then position integration.
    ///
    /// # Errors
    ///
    /// [`CollisionError::InvalidTimestep`] when `dt` is not finite and
    /// positive; [`CollisionError::MissingBodyAdapter`] when no adapter is
    /// bound.
    pub fn step(&mut self, items: &[T], dt: f64) -> Result<Vec<CollisionEvent<T>>, CollisionError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(CollisionError::InvalidTimestep(dt));
        }
        {
            let adapter = self
                .body_adapter
                .as_mut()
                .ok_or(CollisionError::MissingBodyAdapter)?;
            integration::integrate_velocities(adapter.as_mut(), items, self.gravity, dt);
            for _ in 0..self.constraint_iterations {
                for constraint in &self.constraints {
                    constraint.solve(adapter.as_mut(), dt);
                }
            }
        }

        let events = self.update(items);

        if let Some(adapter) = self.body_adapter.as_mut() {
            integration::integrate_positions(adapter.as_mut(), items, dt);
        }
        Ok(events)
    }

    fn apply_responses(&mut self, events: &[CollisionEvent<T>]) {
        let Some(responder) = self.responder.as_mut() else {
            return;
        };
        let mut response_events: Vec<&CollisionEvent<T>> = events
            .iter()
            .filter(|event| event.response_enabled && event.kind != CollisionEventKind::Exit)
            .collect();
        if response_events.is_empty() {
            return;
        }
        // Visit order must be a pure function of the pair identities, not
        // of hash or discovery order.
        response_events.sort_by_cached_key(|event| {
            format!("{:?}|{:?}", event.pair.first(), event.pair.second())
        });

        match responder {
            CollisionResponder::Solver(solver) => {
                let Some(adapter) = self.body_adapter.as_mut() else {
                    warn!("solver responder bound without a body adapter; skipping response");
                    return;
                };
                for _ in 0..self.solver_iterations {
                    for &event in &response_events {
                        solver.solve_position(adapter.as_mut(), event);
                    }
                }
                for iteration in 0..self.solver_iterations {
                    for &event in &response_events {
                        let warm_start = if iteration == 0 {
                            self.manifold_cache
                                .warm_start(&event.pair)
                                .unwrap_or(WarmStartImpulse::ZERO)
                        } else {
                            WarmStartImpulse::ZERO
                        };
                        let solved = solver.solve_velocity(adapter.as_mut(), event, warm_start);
                        if iteration == self.solver_iterations - 1 {
                            self.manifold_cache.set_warm_start(&event.pair, solved);
                        }
                    }
                }
                debug!(events = response_events.len(), "contact solve applied");
            }
            CollisionResponder::Custom(callback) => {
                for &event in &response_events {
                    callback(event);
                }
            }
        }
    }
}
