//! Validation/policy service client (§4.7, §6).

mod client;

pub use client::{ValidationServiceClient, ValidationVerdict};
