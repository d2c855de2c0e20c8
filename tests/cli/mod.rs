//! Tests that drive the crm-joins binary.

pub mod common;
pub mod run_test;
