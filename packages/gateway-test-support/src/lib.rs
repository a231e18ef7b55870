//! Gateway test support utilities
//!
//! Shared by the gateway's unit and integration tests: idempotent logging
//! initialization and assertions on the Problem Details error contract.

pub mod logging;
pub mod problem_details;
