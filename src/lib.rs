//! Signup: registration and profile wizards
//!
//! Two three-step form wizards gated by per-step validation, backed by a
//! country and dial-code lookup service.

pub mod cli;
pub mod core;
pub mod schema;
