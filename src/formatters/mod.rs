pub mod dot;
pub mod json_compact;
pub mod render;

pub use dot::{to_dot, GraphStyle};
pub use json_compact::JsonCompactFormatter;
pub use render::{DiagramBackend, DiagramFormat, GraphRenderer, GraphvizBackend, RenderError};
