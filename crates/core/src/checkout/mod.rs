//! Checkout orchestration.
//!
//! The runner drives one checkout attempt through the fixed sequence:
//! authenticate, establish 3DS viability (or device data, for the simple
//! variant), optional validation method, order submission, and at most one
//! challenge round trip. Every transition is recorded on a timeline.

mod runner;
mod types;

pub use runner::CheckoutRunner;
pub use types::{
    CheckoutFlow, CheckoutOutcome, CheckoutReport, CheckoutRequest, CheckoutStage, Credentials,
    RunnerError, Timeline, TimelineEntry,
};
