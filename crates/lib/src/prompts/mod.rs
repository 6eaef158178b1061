//! # Prompt Template Modules
//!
//! This module organizes all prompt templates used by the analyzer and the
//! synthesizer. `tasks` holds the default templates, which the server can
//! override through `config.yml` or `prompt.yml`; `core` holds the helpers that
//! turn analysis data into template sections.

pub mod core;
pub mod tasks;
