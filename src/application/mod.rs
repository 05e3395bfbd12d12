//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `PointService`, the entry point for balance
//! queries and mutations, and the `KeyedLockRegistry` it uses to serialize
//! concurrent mutations against the same user.

pub mod locks;
pub mod service;
