//! Domain model shared by every storage backend.
//!
//! # Responsibility
//! - Define the resume record and its typed contact entries.
//! - Keep the model free of persistence concerns.
//!
//! # Invariants
//! - Every resume is identified by a stable uuid string.
//! - Contacts hold at most one value per contact type.

pub mod resume;
