//! Internal data structures.
//!
//! This module hosts the small utilities the reactor relies on,
//! currently only the [`Slab`] used for readiness token allocation.

mod slab;

pub(crate) use slab::Slab;
