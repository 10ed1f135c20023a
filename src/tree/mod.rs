pub mod node;
pub mod projector;

pub use node::{type_emoji, DisplayKind, DisplayNode};
pub use projector::{find_node, project};
