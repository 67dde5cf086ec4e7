//! Normalizers for human-readable page fragments.
//!
//! Every function here is total: unparsable input degrades to a documented
//! default (`0`, the base time, or `None`) instead of failing.

mod count;
mod date;
mod gguf;
mod size;

pub use count::parse_count;
pub use date::{parse_absolute_date, parse_relative_date, resolve_timestamp, try_parse_absolute_date};
pub use gguf::{parse_gguf_snippet, GgufMetadata};
pub use size::parse_size_bytes;
