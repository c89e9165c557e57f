mod tool_button;

pub use tool_button::{ColorSwatch, ToolButton};
