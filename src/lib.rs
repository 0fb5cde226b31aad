//! Team predictor TUI client.
//!
//! This library exposes the app's modules for testing.

pub mod action;
pub mod channel;
pub mod components;
pub mod effect;
pub mod options;
pub mod payload;
pub mod reducer;
pub mod state;
