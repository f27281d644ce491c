//! Pipeline report types

use crate::storage::WriteResult;
use std::time::Duration;

/// What happened to one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityOutcome {
    /// The entity was parsed, coerced and written
    Written {
        /// Rows written
        rows: usize,
        /// Files and partitions written
        write_result: WriteResult,
    },
    /// No extract rows were found, nothing was written
    SkippedEmpty,
}

impl EntityOutcome {
    /// Check if the entity was written
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }

    /// Rows written (zero when skipped)
    pub fn rows(&self) -> usize {
        match self {
            Self::Written { rows, .. } => *rows,
            Self::SkippedEmpty => 0,
        }
    }
}

/// Report for one processed entity
#[derive(Debug, Clone)]
pub struct EntityReport {
    /// Entity name
    pub entity: String,
    /// Source prefix that was read
    pub source_path: String,
    /// Target prefix that was written
    pub target_path: String,
    /// Outcome
    pub outcome: EntityOutcome,
    /// Wall time spent on the entity
    pub duration: Duration,
}

/// Report of a whole run, one entry per entity in processing order
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Per-entity reports
    pub entities: Vec<EntityReport>,
}

impl RunReport {
    /// Report of an entity, if it was processed
    pub fn entity(&self, name: &str) -> Option<&EntityReport> {
        self.entities.iter().find(|r| r.entity == name)
    }

    /// Total rows written
    pub fn total_rows(&self) -> usize {
        self.entities.iter().map(|r| r.outcome.rows()).sum()
    }

    /// Number of entities written
    pub fn written_count(&self) -> usize {
        self.entities.iter().filter(|r| r.outcome.is_written()).count()
    }

    /// Number of entities skipped for lack of data
    pub fn skipped_count(&self) -> usize {
        self.entities.len() - self.written_count()
    }

    /// Every stored file path, in write order
    pub fn stored_paths(&self) -> Vec<&str> {
        self.entities
            .iter()
            .filter_map(|r| match &r.outcome {
                EntityOutcome::Written { write_result, .. } => Some(write_result),
                EntityOutcome::SkippedEmpty => None,
            })
            .flat_map(|w| w.stored_paths.iter().map(String::as_str))
            .collect()
    }
}
