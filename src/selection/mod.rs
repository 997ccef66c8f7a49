//! Cyclic selection policies
//!
//! This module decides *which index* of a pool a caller receives. Pools are
//! walked cyclically: once the end is reached the next index wraps back to the
//! beginning. Three policies are supported, mirroring [`ParameterLevel`]:
//!
//! - **Per invocation**: one shared cursor; every call takes the next index.
//! - **Per caller**: each caller walks its own cursor, seeded from the shared
//!   cursor the first time the caller is seen.
//! - **Per caller, sticky**: each caller is assigned one index on first access
//!   and keeps it.
//!
//! The same cursor logic drives literal pools, integer ranges, the weighted
//! dispersion sequence of a file set, and the file list inside each folder.
//!
//! # Example
//!
//! ```
//! use paramfeed::config::ParameterLevel;
//! use paramfeed::selection::CyclicCursor;
//! use paramfeed::CallerId;
//!
//! let cursor = CyclicCursor::new(3);
//! let caller = CallerId(1);
//!
//! let picks: Vec<usize> = (0..4)
//!     .map(|_| cursor.select(ParameterLevel::PerInvocation, caller))
//!     .collect();
//! assert_eq!(picks, vec![0, 1, 2, 0]);
//! ```
//!
//! [`ParameterLevel`]: crate::config::ParameterLevel

pub mod cursor;
pub mod dispersion;

pub use cursor::CyclicCursor;
pub use dispersion::{Dispersion, DISPERSION_SLOTS};
