//! Impact Runner - Estimation Orchestration
//!
//! Composes the estimation stages along their data dependencies:
//!
//! - **Pipeline**: Runs every stage over the batches of an observation source
//! - **Memory**: In-memory source and sink adapters
//!
//! ## Architecture
//!
//! ```text
//!   ObservationSource
//!          │ batches
//!          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  per batch (parallel)                                   │
//! │  pivot ──► daily summary ──► intraday volume profile    │
//! └──────────────────────┬──────────────────────────────────┘
//!                        │ all daily summaries
//!                        ▼
//!              ┌───────────────────┐
//!              │  Scaling Factors  │
//!              └─────────┬─────────┘
//!                        │
//!      ┌─────────────────┼─────────────────┐
//!      ▼                 ▼                 ▼
//!  reduced_form       linear             sqrt        (parallel)
//!  states ► moments   states ► moments   states ► moments
//!      │                 │                 │
//!      ▼                 ▼                 ▼
//!  walk-forward       walk-forward      walk-forward
//!      └─────────────────┼─────────────────┘
//!                        ▼
//!                   ResultSink
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use impact_runner::{ImpactPipeline, InMemorySink, InMemorySource};
//!
//! let source = InMemorySource::new().with_batch("2019-01", january);
//! let sink = InMemorySink::new();
//! let report = ImpactPipeline::new(EstimationConfig::default())?.run(&source, &sink)?;
//! ```

pub mod error;
pub mod memory;
pub mod pipeline;

pub use error::{Result, RunnerError};
pub use memory::{InMemorySink, InMemorySource};
pub use pipeline::{ImpactPipeline, KernelReport, RunReport};
