//! Physics Backend
//!
//! The solver is an injected collaborator. Meshes and bodies are mutated
//! locally; the backend is told when a component's physics state must be
//! rebuilt, when an impulse was applied and when a body goes away.
//!
//! [`BodyStore`] is the in-crate backend: it keeps the last state pushed for
//! every component and records every call as a [`PhysicsEvent`], which is what
//! the demo and the tests inspect.

use std::collections::HashMap;

use glam::Vec3;

use super::body::BodyInstance;
use super::body_setup::BodySetup;
use crate::world::ComponentId;

/// Narrow interface to the physics solver.
pub trait PhysicsBackend {
    /// Rebuild acceleration structures for a component from its setup and body.
    ///
    /// `async_cook` allows the backend to cook collision off-thread; callers
    /// never wait for that to finish.
    fn recreate_physics_state(
        &mut self,
        component: ComponentId,
        setup: &BodySetup,
        body: &BodyInstance,
        async_cook: bool,
    );

    /// Apply an instantaneous impulse to a simulated body.
    fn add_impulse(&mut self, component: ComponentId, impulse: Vec3, velocity_change: bool);

    /// Forget a component's physics state.
    fn destroy_physics_state(&mut self, component: ComponentId);
}

/// One call received by a [`BodyStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsEvent {
    Recreated {
        component: ComponentId,
        hull_count: usize,
        hull_points: usize,
        simulate: bool,
        async_cook: bool,
    },
    Impulse {
        component: ComponentId,
        impulse: Vec3,
        velocity_change: bool,
    },
    Destroyed {
        component: ComponentId,
    },
}

/// Last state pushed for one component.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBody {
    pub setup: BodySetup,
    pub body: BodyInstance,
    pub pending_cook: bool,
}

/// Recording physics backend for tests and the demo.
///
/// It keeps no simulation of its own. The event log grows with every call
/// until it is drained, so long-running hosts should call
/// [`drain_events`](Self::drain_events) once per frame.
#[derive(Debug, Default)]
pub struct BodyStore {
    bodies: HashMap<ComponentId, StoredBody>,
    events: Vec<PhysicsEvent>,
}

impl BodyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self, component: ComponentId) -> Option<&StoredBody> {
        self.bodies.get(&component)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn events(&self) -> &[PhysicsEvent] {
        &self.events
    }

    /// Impulses applied to a component, in order.
    pub fn impulses_for(&self, component: ComponentId) -> Vec<Vec3> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PhysicsEvent::Impulse {
                    component: c,
                    impulse,
                    ..
                } if *c == component => Some(*impulse),
                _ => None,
            })
            .collect()
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<PhysicsEvent> {
        std::mem::take(&mut self.events)
    }
}

impl PhysicsBackend for BodyStore {
    fn recreate_physics_state(
        &mut self,
        component: ComponentId,
        setup: &BodySetup,
        body: &BodyInstance,
        async_cook: bool,
    ) {
        let hull_points = setup.convex_elems.iter().map(|h| h.points.len()).sum();
        log::trace!(
            "recreate physics state for {component}: {} hull(s), {hull_points} point(s)",
            setup.hull_count()
        );
        self.events.push(PhysicsEvent::Recreated {
            component,
            hull_count: setup.hull_count(),
            hull_points,
            simulate: body.simulate_physics,
            async_cook,
        });
        self.bodies.insert(
            component,
            StoredBody {
                setup: setup.clone(),
                body: body.clone(),
                pending_cook: async_cook,
            },
        );
    }

    fn add_impulse(&mut self, component: ComponentId, impulse: Vec3, velocity_change: bool) {
        if let Some(stored) = self.bodies.get_mut(&component) {
            stored.body.add_impulse(impulse, velocity_change);
        }
        self.events.push(PhysicsEvent::Impulse {
            component,
            impulse,
            velocity_change,
        });
    }

    fn destroy_physics_state(&mut self, component: ComponentId) {
        self.bodies.remove(&component);
        self.events.push(PhysicsEvent::Destroyed { component });
    }
}
