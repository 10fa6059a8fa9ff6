//! Batch orchestration for one ingestion run.
//!
//! A run is strictly sequential: seed the reference districts, pick a random
//! subset without replacement, split it into fixed-size batches, and issue
//! one upstream request per batch with a fixed pause in between. A failed
//! batch is logged and skipped; it is never retried within the run.

use chrono::Utc;
use crimewatch_core::{
  candidate::CandidateRecord,
  district::ReferenceDistrict,
  store::IncidentStore,
};
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, info, warn};

use crate::{
  config::BatchPolicy,
  dedup::{Admission, DedupGate},
  generator::Generator,
  parser::{self, Extraction},
  prompt,
  sink::{SaveOutcome, SeedReport, Sink},
  validate::{self, Normalizer, Resolution},
};

// ─── Selection ───────────────────────────────────────────────────────────────

/// Pick up to `subset_size` distinct districts in random order. Asking for
/// more than are available returns all of them.
pub fn select_districts<R: Rng + ?Sized>(
  reference: &[ReferenceDistrict],
  subset_size: usize,
  rng: &mut R,
) -> Vec<ReferenceDistrict> {
  reference.choose_multiple(rng, subset_size).copied().collect()
}

/// Split `selected` into consecutive groups of at most `batch_size`.
pub fn partition<T>(selected: &[T], batch_size: usize) -> std::slice::Chunks<'_, T> {
  selected.chunks(batch_size.max(1))
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchOutcome {
  /// The payload was recovered; see the per-record counters.
  #[default]
  Completed,
  /// Transport, status or empty-response failure.
  UpstreamFailed,
  /// No `[ ... ]` span in the upstream text.
  Malformed,
  /// The bracketed span did not deserialise.
  ParseFailed,
}

/// What happened to one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
  pub targets:    Vec<String>,
  pub outcome:    BatchOutcome,
  pub parsed:     usize,
  /// Missing or sentinel fields.
  pub rejected:   usize,
  /// District name not in the seeded set.
  pub unmatched:  usize,
  /// Source URL already stored.
  pub duplicates: usize,
  /// Source URL stored by another writer between check and insert.
  pub conflicts:  usize,
  /// Store errors during lookup or insert.
  pub failed:     usize,
  pub saved:      usize,
}

/// What happened in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
  pub seed:     SeedReport,
  pub selected: Vec<String>,
  pub batches:  Vec<BatchReport>,
}

impl RunReport {
  pub fn saved(&self) -> usize { self.batches.iter().map(|b| b.saved).sum() }

  pub fn failed_batches(&self) -> usize {
    self
      .batches
      .iter()
      .filter(|b| b.outcome != BatchOutcome::Completed)
      .count()
  }
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

/// Drives one ingestion run against a store and a generator.
pub struct Orchestrator<'a, S, G> {
  store:     &'a S,
  generator: &'a G,
  reference: &'a [ReferenceDistrict],
  policy:    BatchPolicy,
  grounding: bool,
}

impl<'a, S, G> Orchestrator<'a, S, G>
where
  S: IncidentStore,
  G: Generator,
{
  pub fn new(
    store: &'a S,
    generator: &'a G,
    reference: &'a [ReferenceDistrict],
    policy: BatchPolicy,
  ) -> Self {
    Self { store, generator, reference, policy, grounding: true }
  }

  pub fn with_grounding(mut self, grounding: bool) -> Self {
    self.grounding = grounding;
    self
  }

  /// Run every batch to completion. Never fails: problems are logged and
  /// reflected in the returned report.
  pub async fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> RunReport {
    let seed = Sink::new(self.store).seed_districts(self.reference).await;

    let selected = select_districts(self.reference, self.policy.subset_size, rng);
    let total = selected.len().div_ceil(self.policy.batch_size.max(1));

    let mut report = RunReport {
      seed,
      selected: selected.iter().map(|d| d.name.to_owned()).collect(),
      batches: Vec::with_capacity(total),
    };

    for (i, batch) in partition(&selected, self.policy.batch_size).enumerate() {
      if i > 0 {
        tokio::time::sleep(self.policy.pacing()).await;
      }

      let names: Vec<&str> = batch.iter().map(|d| d.name).collect();
      info!(batch = i + 1, total, targets = ?names, "processing batch");

      report.batches.push(self.process_batch(&names).await);
    }

    info!(
      batches = report.batches.len(),
      failed_batches = report.failed_batches(),
      saved = report.saved(),
      "ingestion run completed"
    );
    report
  }

  /// One upstream exchange and everything downstream of it.
  pub async fn process_batch(&self, targets: &[&str]) -> BatchReport {
    let mut report = BatchReport {
      targets: targets.iter().map(|t| (*t).to_owned()).collect(),
      ..BatchReport::default()
    };

    let request = prompt::batch_request(targets, self.grounding);
    let text = match self.generator.generate(&request).await {
      Ok(text) if text.trim().is_empty() => {
        warn!(targets = ?targets, "no content returned for batch");
        report.outcome = BatchOutcome::UpstreamFailed;
        return report;
      }
      Ok(text) => text,
      Err(e) => {
        warn!(targets = ?targets, error = %e, "upstream request failed");
        report.outcome = BatchOutcome::UpstreamFailed;
        return report;
      }
    };

    let candidates = match parser::extract(&text) {
      Extraction::Found(candidates) => candidates,
      Extraction::NotFound => {
        warn!(targets = ?targets, raw = %text, "no JSON array in upstream response");
        report.outcome = BatchOutcome::Malformed;
        return report;
      }
      Extraction::Malformed(e) => {
        warn!(targets = ?targets, error = %e, raw = %text, "could not parse upstream payload");
        report.outcome = BatchOutcome::ParseFailed;
        return report;
      }
    };

    report.parsed = candidates.len();
    info!(parsed = report.parsed, "parsed candidates, saving");
    for (n, c) in candidates.iter().take(3).enumerate() {
      debug!(
        sample = n + 1,
        title = ?c.article_title,
        district = ?c.district_name,
        source_url = ?c.source_url,
        "sample candidate"
      );
    }

    for candidate in &candidates {
      self.ingest_candidate(candidate, &mut report).await;
    }

    report
  }

  async fn ingest_candidate(&self, candidate: &CandidateRecord, report: &mut BatchReport) {
    let valid = match validate::validate(candidate, Utc::now()) {
      Ok(valid) => valid,
      Err(rejection) => {
        info!(
          %rejection,
          title = ?candidate.article_title,
          district = ?candidate.district_name,
          "skipping candidate"
        );
        report.rejected += 1;
        return;
      }
    };

    if valid.date_fallback {
      warn!(
        raw = ?candidate.incident_date,
        title = %valid.title,
        "failed to parse incident date, using processing time"
      );
    }

    let incident = match Normalizer::new(self.store).resolve(valid).await {
      Ok(Resolution::Matched(incident)) => incident,
      Ok(Resolution::Unmatched(name)) => {
        info!(district = %name, "district not found, skipping report");
        report.unmatched += 1;
        return;
      }
      Err(e) => {
        warn!(error = %e, "district lookup failed");
        report.failed += 1;
        return;
      }
    };

    match DedupGate::new(self.store).admit(&incident.source_url).await {
      Ok(Admission::Admit) => {}
      Ok(Admission::Duplicate) => {
        report.duplicates += 1;
        return;
      }
      Err(e) => {
        warn!(source_url = %incident.source_url, error = %e, "duplicate check failed");
        report.failed += 1;
        return;
      }
    }

    match Sink::new(self.store).save_record(incident).await {
      SaveOutcome::Saved(_) => report.saved += 1,
      SaveOutcome::Conflict => report.conflicts += 1,
      SaveOutcome::Failed => report.failed += 1,
    }
  }
}
