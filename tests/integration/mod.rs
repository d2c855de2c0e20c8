//! Library-level integration tests.

pub mod lesson_test;
