//! Test helpers shared by service tests.

pub mod helpers;
