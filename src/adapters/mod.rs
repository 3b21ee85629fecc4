//! Infrastructure adapters. Implement ports.
//!
//! Filesystem storage and the interactive shell. Map errors to DomainError.

pub mod persistence;
pub mod ui;
