//! Change computer implementations.
//!
//! This module provides concrete implementations of the `ChangeComputer` trait
//! for each category of change: presence, signatures, and deprecations.

mod deprecation;
mod presence;
mod signature;

pub use deprecation::DeprecationChangeComputer;
pub use presence::PresenceChangeComputer;
pub use signature::SignatureChangeComputer;
