//! Domain types.

mod client_key;

pub use client_key::ClientKey;
