pub mod buffer;
pub mod config;
pub mod document;
pub mod export;
pub mod highlight;
pub mod search;
pub mod session;
pub mod sync;
pub mod tree;
pub mod ui;

pub use buffer::Buffer;
pub use config::EditorConfig;
pub use document::{parse, serialize, ParseError, Path, PathError, PathSegment};
pub use session::{EditorSession, ValidationStatus};
pub use sync::{apply_edit, locate, EditError, LocateError, TextRange};
pub use tree::{project, DisplayKind, DisplayNode};
