//! UI primitives for the secret-diary CLI.
//!
//! - **context**: environment detection (TTY, width, color, timezone)
//! - **mode**: output mode resolution (json, plain, pretty)
//! - **theme**: badges and owo-colors styles
//! - **render**: comfy-table tables, headers, hints, errors
//! - **progress**: indicatif spinners
//! - **format**: truncation, timestamps, highlighting

mod context;
pub mod format;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::{color_enabled, UiContext};
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{badge, blank_line, header, hint, kv, print, print_error, table};

pub use format::{display_timestamp, format_bytes, highlight_matches, truncate};
