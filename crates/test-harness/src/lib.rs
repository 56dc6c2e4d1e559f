//! Test harness for scripted airframe scenarios.
//!
//! Provides programmatic tools for building multi-component rockets,
//! driving the engine's mutators, and verifying geometry at every step.
//!
//! # Key Components
//!
//! - [`RocketBuilder`] — named-component wrapper over the engine
//! - [`helpers`] — component constructors and stock rockets
//! - [`assertions`] — assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod workflow;

pub use helpers::HarnessError;
pub use workflow::RocketBuilder;
