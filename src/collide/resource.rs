//! The world resource that plugs a [`ShapeCollider`] into the ECS.

use super::{AnalyticCollider, ShapeCollider};

/// Holds the shape-vs-shape collider the narrowphase orchestrator calls.
/// Defaults to [`AnalyticCollider`]; replace it in the `World` to plug in a
/// production GJK/EPA backend without touching the orchestrator.
pub struct ColliderResource(pub Box<dyn ShapeCollider>);

impl Default for ColliderResource {
    fn default() -> Self {
        ColliderResource(Box::new(AnalyticCollider))
    }
}
