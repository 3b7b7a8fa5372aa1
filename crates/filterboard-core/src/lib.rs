//! # Filterboard Core
//!
//! The engine behind the audience filter builder: a tree of OR'd groups of
//! AND'ed conditions, kept losslessly in sync with its flat JSON document
//! form.
//!
//! ## What lives here
//!
//! - **Relation vocabulary** — phrases ("is greater than") vs. operator
//!   codes (`>`), with a lenient normalizer.
//! - **Field schema registry** — the fixed catalog of filterable fields and
//!   their property descriptors.
//! - **Condition codec** — one condition to/from one canonical filter
//!   object.
//! - **Placement engine** — decides whether a new condition may join a
//!   group or must open a new OR'd one (conflict and range-feasibility
//!   rules).
//! - **Document assembler** — the group tree to/from the flat array with
//!   `{"operator":"OR"}` separators.
//! - **Tolerant JSON front-end** — parses hand-edited text, locating
//!   comments, trailing commas, and unquoted keys before the parser sees
//!   them.
//! - **Builder facade** — the user-action entry points, observed through
//!   the [`RenderSurface`] trait.
//!
//! ## Quick Start
//!
//! ```rust
//! use filterboard_core::{
//!     values_of, BuilderConfig, Field, FilterBuilder, NullSurface, Prop,
//! };
//!
//! let mut builder = FilterBuilder::new(BuilderConfig::default(), NullSurface);
//! builder
//!     .add_condition(
//!         Field::Country,
//!         values_of([(Prop::Relation, "is"), (Prop::Value, "United States")]),
//!     )
//!     .unwrap();
//! assert!(builder.mirror().contains("\"country\""));
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod codec;
pub mod condition;
pub mod config;
pub mod document;
pub mod error;
pub mod field;
pub mod placement;
#[cfg(test)]
mod placement_tests;
pub mod relation;
pub mod schema;
pub mod surface;
pub mod text;
pub mod tree;

pub use builder::FilterBuilder;
pub use condition::{values_of, Condition, PropertyValues};
pub use config::{BuilderConfig, ConfigError, MirrorStyle, SkipPolicy};
pub use error::{Error, Result};
pub use field::Field;
pub use relation::Relation;
pub use schema::{Prop, PropertyKind, PropertySpec};
pub use surface::{NullSurface, RenderSurface};
pub use text::{Applied, Diagnostic};
pub use tree::{ConditionId, Group, GroupId, GroupTree};
