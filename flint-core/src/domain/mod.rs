//! Core domain types
//!
//! This module contains the domain structures shared across Flint crates.
//! Everything here is a fresh snapshot of remote state: nothing is ever
//! persisted or mutated locally.

pub mod run;
pub mod workflow;
