use async_trait::async_trait;
use chrono::Utc;
use ironbeam_application::{FetchHints, PersistenceCollaborator};
use ironbeam_core::{
    AppError, AppResult, CollaboratorError, CollaboratorErrorKind, CollaboratorResult,
};
use ironbeam_domain::{FieldMap, Record, RecordId, RecordPayload};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory persistence collaborator for one record collection.
#[derive(Debug, Default)]
pub struct InMemoryRecordCollaborator {
    records: RwLock<Vec<Record>>,
}

impl InMemoryRecordCollaborator {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Creates a store seeded with existing records.
    #[must_use]
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Creates a store seeded from a JSON fixture of flat record rows.
    pub fn from_fixture(fixture: &str) -> AppResult<Self> {
        let payloads: Vec<RecordPayload> = serde_json::from_str(fixture)
            .map_err(|error| AppError::Validation(format!("invalid record fixture: {error}")))?;
        let records = payloads
            .into_iter()
            .map(Record::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self::with_records(records))
    }
}

#[async_trait]
impl PersistenceCollaborator for InMemoryRecordCollaborator {
    async fn fetch_all(&self, hints: &FetchHints) -> CollaboratorResult<Vec<Record>> {
        let records = self.records.read().await;
        let mut listed: Vec<Record> = records
            .iter()
            .filter(|record| {
                hints
                    .predicates
                    .iter()
                    .all(|(field, expected)| record.field(field.as_str()) == Some(expected))
            })
            .cloned()
            .collect();

        listed.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(listed)
    }

    async fn create_record(&self, draft: FieldMap) -> CollaboratorResult<Record> {
        let now = Utc::now();
        let record = Record::new(Uuid::new_v4().to_string(), draft, now, now).map_err(|error| {
            CollaboratorError::new(CollaboratorErrorKind::Rejected, error.to_string())
        })?;

        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn update_record(&self, id: &RecordId, partial: FieldMap) -> CollaboratorResult<Record> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| {
                CollaboratorError::not_found(format!("record '{id}' does not exist"))
            })?;

        record.apply_update(partial, Utc::now());
        Ok(record.clone())
    }

    async fn delete_record(&self, id: &RecordId) -> CollaboratorResult<()> {
        let mut records = self.records.write().await;
        let Some(position) = records.iter().position(|record| record.id() == id) else {
            return Err(CollaboratorError::not_found(format!(
                "record '{id}' does not exist"
            )));
        };

        records.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
