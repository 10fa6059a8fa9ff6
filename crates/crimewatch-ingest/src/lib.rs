//! Crime-incident ingestion pipeline.
//!
//! One run seeds the reference districts, picks a random subset of them, and
//! asks an upstream generator for recent incidents in small batches. Each
//! batch's free-text answer goes through the stages below before anything is
//! written:
//!
//! | Stage | Module |
//! |-------|--------|
//! | Payload recovery | [`parser`] |
//! | Field validation, date normalisation, district matching | [`validate`] |
//! | Source-URL deduplication | [`dedup`] |
//! | Persistence | [`sink`] |
//!
//! [`orchestrator`] sequences the batches. Failures are contained at the
//! batch or record level; only an unreachable store stops a run.

pub mod config;
pub mod dedup;
pub mod gemini;
pub mod generator;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod sink;
pub mod validate;

pub use config::{BatchPolicy, IngestConfig};
pub use generator::{GenerationRequest, Generator, GeneratorError};
pub use orchestrator::{BatchOutcome, BatchReport, Orchestrator, RunReport};
