//! vtriple Engine - Orchestration layer
//!
//! Runs diff, history encoding, latest-view materialization and the mutation
//! pipeline against a SQLite store inside a single transaction.

pub mod commands;
