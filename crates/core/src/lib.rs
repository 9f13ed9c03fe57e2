//! Verified Plate Core - form, validation and wizard types.
//!
//! This crate holds the view-state model shared by the portal's screens:
//! - [`form`] - Flat field-name to value records backing every form screen
//! - [`validation`] - Declarative field schemas, issues and error maps
//! - [`schemas`] - The concrete schemas used by each screen
//! - [`wizard`] - Linear multi-step form state machine (signup, forgot-password)
//! - [`types`] - Email shape check plus money and stored auth token types
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session access. Everything here is synchronous and
//! deterministic, which keeps the screen logic unit-testable without a server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod form;
pub mod schemas;
pub mod types;
pub mod validation;
pub mod wizard;

pub use form::FormState;
pub use types::*;
pub use validation::{FieldErrors, Issue, Schema};
pub use wizard::{Transition, Wizard, WizardKind};
