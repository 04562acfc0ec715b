//! Digest primitives shared across the vesta crates.
//!
//! Signing keys and derivation live with the callers; this crate only
//! provides the hash value type and the Blake2b hashers the on-chain data
//! model depends on.

pub mod hash;
