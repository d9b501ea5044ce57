//! Market Stall application library.
//!
//! Everything between the pure catalog rules in `market-stall-core` and a
//! front end: configuration, the identity provider and document store
//! backends, product persistence, and the login / catalog / add-item screen
//! controllers. Kept as a library so the screens can be driven by tests as
//! well as by the `stall` binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod identity;
pub mod products;
pub mod screens;
pub mod seed;
pub mod state;
pub mod store;

mod remote;
