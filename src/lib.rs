#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A fixed-capacity map implementation using linear probing.
///
/// This module provides `ProbeMap`, a flat-array hash map that resolves
/// collisions by scanning sequential slots and never resizes.
pub mod map;

pub use map::CreateError;
pub use map::InsertError;
pub use map::Iter;
pub use map::Keys;
pub use map::ProbeMap;
pub use map::Values;
