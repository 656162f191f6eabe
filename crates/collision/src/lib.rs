#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Collision Core
//!
//! A real-time 3D collision-detection and contact-response library for
//! integration with a rendering runtime. The crate covers the full frame
//! pipeline: broad-phase candidate generation, filter classification, a
//! support-mapping narrow phase with expanding-polytope penetration
//! extraction, primitive contact generation, a world orchestrator with a
//! stable enter/stay/exit event lifecycle, and an iterative positional and
//! impulse-based contact solver with warm starting backed by a manifold
//! cache.
//!
//! ## Key Components
//!
//! -   **Broad phase:** [`SpatialHash`] and [`SweepAndPrune`] implement
//!     the [`BroadPhase`] contract over host items and an AABB provider.
//! -   **Narrow phase:** closed-form primitive tests in [`narrowphase`],
//!     plus the support-mapping core in [`narrowphase::gjk`] and
//!     [`narrowphase::epa`] for arbitrary convex shapes.
//! -   **Contact generation:** one-point manifolds for every primitive
//!     pair in [`contact`].
//! -   **World:** [`CollisionWorld`] diffs colliding pairs across frames,
//!     maintains the [`ManifoldCache`], and drives the [`ContactSolver`].
//!
//! ## Usage
//!
//! The world is generic over an opaque item handle; the host supplies
//! bounds, filter and narrow-phase callbacks:
//!
//! ```rust,ignore
//! use collision::{contact, CollisionWorld, SweepAndPrune};
//!
//! let mut world = CollisionWorld::new(
//!     Box::new(SweepAndPrune::new()),
//!     |body: &Body| body.aabb(),
//!     |body: &Body| Some(body.filter),
//!     |a: &Body, b: &Body| contact::aabb_vs_aabb(&a.aabb(), &b.aabb()),
//! );
//! let events = world.update(&bodies);
//! ```

pub mod body;
pub mod broad_phase;
pub mod cache;
pub mod contact;
pub mod error;
pub mod events;
pub mod filtering;
pub mod mesh;
pub mod narrowphase;
pub mod pair;
pub mod shapes;
pub mod stepper;
pub mod steps;
pub mod types;
pub mod world;

pub use body::RigidBodyAdapter;
pub use broad_phase::{BroadPhase, SpatialHash, SweepAndPrune};
pub use cache::{ManifoldCache, WarmStartImpulse};
pub use contact::ContactManifold;
pub use error::CollisionError;
pub use events::{CollisionEvent, CollisionEventKind};
pub use filtering::{filter_pairs, CollisionFilter, CollisionKind, FilteredPair};
pub use pair::CollisionPair;
pub use shapes::{CollisionShape, RaycastHit};
pub use stepper::FixedTimestep;
pub use steps::{Constraint, ContactSolver, DistanceConstraint, PointConstraint};
pub use types::{Aabb, Capsule, Ray, Sphere};
pub use world::{CollisionResponder, CollisionWorld};
