//! Lockup - a transaction admission gate that freezes movement of selected
//! tokens while a chain is locked
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Admission
//! - [`ante`] - Decorator pipeline and the lockup decorator
//! - [`policy`] - Per message type lockup rules
//!
//! ## Lock State
//! - [`lockup`] - Params, keeper, and genesis for the lockup namespace
//! - [`persistence`] - Param store backends (SQLite, in-memory)
//! - [`context`] - Per transaction execution context
//!
//! ## Messages
//! - [`transaction`] - Message types, transactions, and the `Any` codec
//! - [`address`] - Address normalization and validation
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Admission
// ============================================================================
pub mod ante;
pub mod policy;

// ============================================================================
// Lock State
// ============================================================================
pub mod context;
pub mod lockup;
pub mod persistence;

// ============================================================================
// Messages
// ============================================================================
pub mod address;
pub mod transaction;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
