//! encore-common - Shared library for the Encore booking directory
//!
//! Holds the error taxonomy, configuration resolution, database bootstrap,
//! typed models, and all query/aggregation logic. The web layer in
//! `encore-web` is a thin HTTP surface over this crate.

pub mod config;
pub mod db;
pub mod error;
pub mod token;

pub use error::{Error, Result};
