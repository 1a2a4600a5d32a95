//! # df-formats
//!
//! Static metadata for the document formats the office suite can read and
//! write: extension, export filter name, MIME type, application category,
//! and import/export capability.
//!
//! All lookups go through [`FormatRegistry`]; extensions are matched
//! case-insensitively and tolerate a leading dot.

pub mod category;
mod data;
pub mod registry;

pub use category::DocumentCategory;
pub use registry::{FormatInfo, FormatRegistry};
