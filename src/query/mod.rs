//! Query execution for crm-joins.
//!
//! This module isolates SQL execution from the lesson and the CLI.

pub mod executor;

pub use executor::QueryRunner;
