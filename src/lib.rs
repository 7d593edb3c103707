//! stachemig - i18n migration for Mustache templates
//!
//! Replaces hardcoded natural-language strings in Mustache templates with
//! `{{#__}}category.slug{{/__}}` key references, then checks that the migrated
//! templates are still structurally sound and that every key is known.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, commands, terminal report)
//! - `config`: Configuration file loading and parsing
//! - `core`: Key generation, inventory, contextual replacement, validation, driver
//! - `issues`: Issue type definitions and reporting
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod utils;
