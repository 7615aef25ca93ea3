//! Kumo Core - NaN-boxed value representation (pure logic, no IO)
//!
//! Contains the bit layout policy, the 8-byte value cell, total numeric
//! coercions, and the managed-reference / collector contract.
//! Only operates on in-memory data structures, no file IO or terminal output.
//!
//! The encoding is selected at build time by target pointer width and is
//! never mixed within one binary.

pub mod core;
pub mod runtime;

// Re-export common types
pub use crate::core::error::ValueError;
pub use crate::core::value::Value;
pub use crate::runtime::coerce::ToPrimitive;
pub use crate::runtime::gc::{Collector, Managed, Ref};
