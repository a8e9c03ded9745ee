//! Per-run results.
//!
//! Partial failures never abort a run; they are recorded here per API so the
//! caller can inspect them instead of grepping logs.

use std::fmt;

/// Message reported on normal completion, independent of per-API outcomes.
pub const COMPLETION_MESSAGE: &str = "Embedding and upsert completed for documents";

/// Pipeline stage in which a contained failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Fetch,
    Normalize,
    Storage,
    Indexing,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStage::Fetch => "fetch",
            SyncStage::Normalize => "normalize",
            SyncStage::Storage => "storage",
            SyncStage::Indexing => "indexing",
        };
        write!(f, "{}", name)
    }
}

/// What happened to a single document that went through the full pipeline.
#[derive(Debug, Clone, Default)]
pub struct DocumentStats {
    pub storage_key: String,
    pub chunks: usize,
    pub upserted: usize,
    /// Chunks dropped because their vector failed validation.
    pub skipped_invalid: usize,
}

/// Outcome of processing one API.
#[derive(Debug, Clone)]
pub enum ApiOutcome {
    /// New or changed content: uploaded and indexed.
    Synced(DocumentStats),
    /// Stored content is byte-identical; nothing uploaded or embedded.
    Unchanged,
    /// The API has no version records.
    NoVersions,
    /// The latest version record carries no specification content.
    MissingContent,
    /// A contained failure; the run moved on to the next API.
    Failed { stage: SyncStage, reason: String },
}

/// One processed API with its outcome.
#[derive(Debug, Clone)]
pub struct ApiReport {
    pub api_name: String,
    pub outcome: ApiOutcome,
}

/// Summary of a full sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub entries: Vec<ApiReport>,
}

impl SyncReport {
    pub fn push(&mut self, api_name: impl Into<String>, outcome: ApiOutcome) {
        self.entries.push(ApiReport {
            api_name: api_name.into(),
            outcome,
        });
    }

    pub fn apis_seen(&self) -> usize {
        self.entries.len()
    }

    pub fn synced(&self) -> usize {
        self.count(|o| matches!(o, ApiOutcome::Synced(_)))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, ApiOutcome::Unchanged))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ApiOutcome::NoVersions | ApiOutcome::MissingContent))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ApiOutcome::Failed { .. }))
    }

    pub fn records_upserted(&self) -> usize {
        self.entries
            .iter()
            .map(|e| match &e.outcome {
                ApiOutcome::Synced(stats) => stats.upserted,
                _ => 0,
            })
            .sum()
    }

    /// Fixed success message returned to the invoker regardless of contained
    /// per-API failures.
    pub fn completion_message(&self) -> &'static str {
        COMPLETION_MESSAGE
    }

    /// Plain-text rendering for CLI output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let line = match &entry.outcome {
                ApiOutcome::Synced(stats) => format!(
                    "  {}: synced {} ({} chunks, {} upserted{})",
                    entry.api_name,
                    stats.storage_key,
                    stats.chunks,
                    stats.upserted,
                    if stats.skipped_invalid > 0 {
                        format!(", {} invalid vectors dropped", stats.skipped_invalid)
                    } else {
                        String::new()
                    },
                ),
                ApiOutcome::Unchanged => format!("  {}: unchanged", entry.api_name),
                ApiOutcome::NoVersions => format!("  {}: no versions", entry.api_name),
                ApiOutcome::MissingContent => format!("  {}: no spec content", entry.api_name),
                ApiOutcome::Failed { stage, reason } => {
                    format!("  {}: failed during {}: {}", entry.api_name, stage, reason)
                }
            };
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(&format!(
            "{} APIs: {} synced, {} unchanged, {} skipped, {} failed\n",
            self.apis_seen(),
            self.synced(),
            self.unchanged(),
            self.skipped(),
            self.failed(),
        ));
        out
    }

    fn count(&self, predicate: impl Fn(&ApiOutcome) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|e| predicate(&e.outcome))
            .count()
    }
}
