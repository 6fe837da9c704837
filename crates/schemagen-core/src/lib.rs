//! Core contracts for schemagen.
//!
//! This crate defines the error taxonomy, dialect and key-type vocabulary,
//! the configuration document, and the Variable Space model consumed by the
//! generation engine.

pub mod config;
pub mod dialect;
pub mod error;
pub mod keys;
pub mod space;

pub use config::{GenerationConfig, GroupSource, KeyTypePolicy};
pub use dialect::{Dialect, TemplateFamily};
pub use error::{GenerationError, Result};
pub use keys::{KeyType, KeyTypeSelector, SUPPORTED_KEY_TYPES};
pub use space::{Axis, AxisKind, VariableSpace};

/// Literal axis value meaning "contribute nothing for this axis".
pub const UNDEF: &str = "undef";
