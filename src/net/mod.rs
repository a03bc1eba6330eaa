//! Managed socket ownership and raw access.
//!
//! This module provides the two halves of the raw access contract:
//! - [`Sock`]: the owning side, which holds the descriptor, tracks
//!   transient references, and drives the close lifecycle,
//! - [`RawSock`]: the accessor side, which runs caller-supplied
//!   functions directly against the descriptor.
//!
//! The accessor never owns the descriptor; closing is always the
//! owner's decision, and every accessor operation observes it.

pub(crate) mod fd;

mod raw;
mod sock;

pub use raw::RawSock;
pub use sock::Sock;
