//! Cross-crate scenario and property tests for Alembic.
//!
//! The tests in `tests/` drive the calculation core through a real settings
//! store, the way the bot and CLI front ends do.

pub mod helpers;
