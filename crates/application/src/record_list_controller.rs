use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use ironbeam_core::{AppError, AppResult};
use ironbeam_domain::{Record, RecordPayload};

use crate::{ListSettings, PersistenceCollaborator, PredicateValue, RecordFilter, RecordSort};

mod listing;
mod mutations;


/// In-memory view of one admin record collection.
///
/// Holds the last known server view, answers filtered and paged queries
/// synchronously, and forwards every write to the persistence collaborator
/// before touching local state.
pub struct RecordListController {
    collaborator: Arc<dyn PersistenceCollaborator>,
    settings: ListSettings,
    filter: RecordFilter,
    records: Vec<Record>,
    loaded: bool,
}

impl RecordListController {
    /// Creates an empty, not-yet-loaded controller.
    #[must_use]
    pub fn new(collaborator: Arc<dyn PersistenceCollaborator>, settings: ListSettings) -> Self {
        Self {
            collaborator,
            settings,
            filter: RecordFilter::default(),
            records: Vec::new(),
            loaded: false,
        }
    }

    /// Replaces the whole collection.
    ///
    /// The batch is rejected as a unit when it holds duplicate ids or a status
    /// outside the kind's catalog; the previous collection stays in place.
    pub fn load(&mut self, records: Vec<Record>) -> AppResult<()> {
        let kind = self.settings.kind();
        let mut seen = HashSet::with_capacity(records.len());

        for record in &records {
            if !seen.insert(record.id().as_str()) {
                return Err(AppError::Validation(format!(
                    "duplicate record id '{}' in {} batch",
                    record.id(),
                    kind.as_str()
                )));
            }

            kind.validate_status(record.fields()).map_err(|error| {
                AppError::Validation(format!("record '{}': {error}", record.id()))
            })?;
        }

        self.records = records;
        self.loaded = true;
        Ok(())
    }

    /// Loads a static JSON fixture holding an array of flat record rows.
    pub fn load_fixture(&mut self, fixture: &str) -> AppResult<()> {
        let payloads: Vec<RecordPayload> = serde_json::from_str(fixture)
            .map_err(|error| AppError::Validation(format!("invalid record fixture: {error}")))?;

        let records = payloads
            .into_iter()
            .enumerate()
            .map(|(position, payload)| {
                Record::try_from(payload).map_err(|error| {
                    AppError::Validation(format!("fixture entry {position}: {error}"))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        self.load(records)
    }

    /// Stores the free-text search term; filtering happens on read.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.set_search(term.into());
    }

    /// Sets one predicate, or clears it when `value` is the wildcard.
    pub fn set_predicate(&mut self, field: impl Into<String>, value: PredicateValue) {
        self.filter.set_predicate(field.into(), value);
    }

    /// Resets search and predicates to the identity filter.
    pub fn clear_filters(&mut self) {
        self.filter = RecordFilter::default();
    }

    /// Replaces the current sort.
    pub fn set_sort(&mut self, sort: RecordSort) {
        self.settings.set_sort(sort);
    }

    /// Returns the active filter.
    #[must_use]
    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    /// Returns the list configuration.
    #[must_use]
    pub fn settings(&self) -> &ListSettings {
        &self.settings
    }

    /// Returns true once a collection has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Returns the number of records held, ignoring the filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when no record is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by id, ignoring the filter.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.id().as_str() == id)
    }

    /// Counts records per status across the whole collection.
    #[must_use]
    pub fn status_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for status in self.records.iter().filter_map(Record::status) {
            *counts.entry(status.to_owned()).or_insert(0) += 1;
        }

        counts
    }

    fn position(&self, id: &str) -> AppResult<usize> {
        self.records
            .iter()
            .position(|record| record.id().as_str() == id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "{} record '{id}' does not exist",
                    self.settings.kind().as_str()
                ))
            })
    }
}
