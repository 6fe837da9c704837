//! Combinatorial DDL generation engine for schemagen.
//!
//! Enumerates the cartesian product of configured axes, applies per-axis
//! transforms, resolves partition/key dependencies, names every statement
//! uniquely, and renders dialect templates with an open column-body slot.

pub mod assemble;
pub mod engine;
pub mod extract;
pub mod fields;
pub mod model;
pub mod naming;
pub mod render;
pub mod tables;
pub mod traverse;

pub use assemble::{AGG_TYPE_PLACEHOLDER, assemble_ddl};
pub use engine::{GenerationEngine, GenerationRun};
pub use extract::extract_columns;
pub use fields::{FieldAxis, FieldStatement};
pub use model::{GenerateOptions, GroupOutput};
pub use naming::NameRegistry;
pub use render::BODY_SLOT;
pub use tables::{TableAxis, TableStatement};
pub use traverse::traverse;
