//! # Answer-Shaping Options
//!
//! The option schema describes which dimensions (tone, length, logic
//! structure, ...) the user can adjust before the final prompt is written.
//! A schema comes either from the built-in [`catalog`] or from the analyzer's
//! dynamically generated definitions; both end up as the same validated
//! [`OptionSchema`], so selection and rendering have a single code path.

pub mod catalog;
pub mod form;
pub mod schema;
pub mod selection;

pub use form::{render_form, ChoiceView, ControlGroup, FormView};
pub use schema::{
    OptionChoice, OptionDefinition, OptionSchema, RawOptionChoice, RawOptionDefinition,
    SchemaViolation, LOGIC_STRUCTURE, NOT_SPECIFIED, OTHER, SCHEMA_VERSION,
};
pub use selection::OptionSelection;
