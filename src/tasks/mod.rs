//! Background Tasks Module
//!
//! - TTL Cleanup: sweeps expired entries out of the in-process cache backend

mod cleanup;

pub use cleanup::spawn_cleanup_task;
