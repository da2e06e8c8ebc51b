use std::collections::BTreeMap;

use async_trait::async_trait;
use ironbeam_core::CollaboratorResult;
use ironbeam_domain::{FieldMap, FieldValue, Record, RecordId};

use crate::RecordFilter;

/// Advisory narrowing passed to [`PersistenceCollaborator::fetch_all`].
///
/// Collaborators may ignore hints; the controller always re-applies its own
/// filter locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchHints {
    /// Trimmed search term, when one is active.
    pub search_term: Option<String>,
    /// Active exact-match predicates.
    pub predicates: BTreeMap<String, FieldValue>,
}

impl From<&RecordFilter> for FetchHints {
    fn from(filter: &RecordFilter) -> Self {
        Self {
            search_term: filter.trimmed_search_term().map(str::to_owned),
            predicates: filter.predicates().clone(),
        }
    }
}

/// Durable store for one admin record collection.
#[async_trait]
pub trait PersistenceCollaborator: Send + Sync {
    /// Returns every record the store holds for the collection.
    async fn fetch_all(&self, hints: &FetchHints) -> CollaboratorResult<Vec<Record>>;

    /// Persists a draft and returns the record with its assigned id and timestamps.
    async fn create_record(&self, draft: FieldMap) -> CollaboratorResult<Record>;

    /// Applies a partial update and returns the stored record.
    async fn update_record(&self, id: &RecordId, partial: FieldMap) -> CollaboratorResult<Record>;

    /// Deletes one record; fails with a not-found kind when the store has none.
    async fn delete_record(&self, id: &RecordId) -> CollaboratorResult<()>;
}
