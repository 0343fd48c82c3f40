//! In-memory reply tree: the shape every score is computed over.

pub mod builder;
pub mod discussion_tree;
pub mod traversal;

pub use builder::TreeBuilder;
pub use discussion_tree::DiscussionTree;
pub use traversal::{ancestors, bfs_descendants, is_descendant, post_order};
