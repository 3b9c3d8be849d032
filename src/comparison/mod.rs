pub mod client;

pub use client::{ComparisonClient, ComparisonError};
