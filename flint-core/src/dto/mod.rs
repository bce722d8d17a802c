//! Data Transfer Objects for the GitHub Actions REST surface
//!
//! This module contains the wire shapes Flint exchanges with the API:
//! listing envelopes (which wrap domain types together with a total
//! count) and the dispatch request body.

pub mod run;
pub mod workflow;
