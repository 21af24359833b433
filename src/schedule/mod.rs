// src/schedule/mod.rs
// =============================================================================
// This module decides which links get checked and how many at once.
//
// - sampler: ignore policy + random sample capped at the run's limit
// - queue: bounded worker pool that keeps results in input order
// =============================================================================

mod queue;
mod sampler;

pub use queue::run_queue;
pub use sampler::{content_seed, sampling_rng, should_ignore, LinkSampler, Sample};
