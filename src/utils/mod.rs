//! Shared helpers.

pub mod states;
