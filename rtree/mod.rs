pub mod algorithms;
pub mod node;
pub mod rectangle;
#[allow(clippy::module_inception)]
pub mod rtree;

// Re-export the main types
pub use node::{Entry, Node};
pub use rectangle::Rectangle;
pub use rtree::RTree;
