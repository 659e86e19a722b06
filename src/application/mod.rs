//! Application layer: runs ledger operations against a store.
//!
//! `WalletService` is the single entry point. It owns the store and drives the pure
//! transitions in `domain::engine`, persisting their results in the order they require.

pub mod service;
