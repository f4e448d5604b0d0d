//! Pure filtering and reconciliation logic.
//!
//! Modules here take already-loaded documents and return values. No I/O, so
//! every rule is testable without spawning the external tools.

pub mod project;
pub mod reconcile;
pub mod xfail;
