//! Scene graph layer
//!
//! The rig system talks to the host scene through the [`SceneGraph`] trait:
//! - [`SceneGraph`]: the primitives rig generation and rendering need
//! - [`Scene`]: in-memory implementation (headless runs, tests)
//! - [`Node`]: hierarchy, transform, constraints and rig components
//! - [`Transform`]: local position / rotation / scale
//! - [`Camera`]: lens data block
//! - [`LookAtConstraint`]: keeps a camera aimed at a target node

pub mod bounds;
pub mod camera;
pub mod constraint;
pub mod graph;
pub mod node;
pub mod scene;
pub mod transform;

pub use bounds::BoundingBox;
pub use camera::{Camera, ProjectionType};
pub use constraint::{LookAtConstraint, TrackAxis, UpAxis};
pub use graph::SceneGraph;
pub use node::Node;
pub use scene::{NodeBuilder, Scene};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
