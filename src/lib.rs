//! crm-joins - worked SQL join lessons against a sample CRM database.
//!
//! This library exposes the core modules for the binary and for
//! integration tests.

pub mod config;
pub mod db;
pub mod error;
pub mod lesson;
pub mod logging;
pub mod query;
pub mod render;
