use chrono::Utc;
use ironbeam_core::{CollaboratorError, CollaboratorErrorKind};
use ironbeam_domain::FieldMap;

use super::*;

use crate::FetchHints;

impl RecordListController {
    /// Fetches the collection from the collaborator and loads it.
    ///
    /// Returns the number of records loaded. On failure the current
    /// collection is kept.
    pub async fn refresh(&mut self) -> AppResult<usize> {
        let hints = FetchHints::from(&self.filter);
        let records = self.collaborator.fetch_all(&hints).await?;
        let count = records.len();
        self.load(records)?;
        Ok(count)
    }

    /// Persists a draft and inserts the confirmed record at the head.
    pub async fn create(&mut self, draft: FieldMap) -> AppResult<Record> {
        let kind = self.settings.kind();
        kind.validate_draft(&draft)?;

        let record = self.collaborator.create_record(draft).await?;

        if self.get(record.id().as_str()).is_some() {
            return Err(AppError::Validation(format!(
                "collaborator returned existing {} id '{}'",
                kind.as_str(),
                record.id()
            )));
        }

        self.records.insert(0, record.clone());
        Ok(record)
    }

    /// Persists a partial update, then merges it into the local record.
    ///
    /// Fields absent from `partial` are kept. When the collaborator fails the
    /// local record is left exactly as it was.
    pub async fn update(&mut self, id: &str, partial: FieldMap) -> AppResult<Record> {
        let position = self.position(id)?;
        self.settings.kind().validate_status(&partial)?;

        let record_id = self.records[position].id().clone();
        let result = self
            .collaborator
            .update_record(&record_id, partial.clone())
            .await;
        let confirmed = match result {
            Ok(confirmed) => confirmed,
            Err(error) => return Err(self.forget_if_gone(position, error)),
        };

        let now = Utc::now().max(confirmed.updated_at());
        let record = &mut self.records[position];
        record.apply_update(partial, now);
        Ok(record.clone())
    }

    /// Deletes a record through the collaborator, then drops it locally.
    pub async fn remove(&mut self, id: &str) -> AppResult<()> {
        let position = self.position(id)?;
        let record_id = self.records[position].id().clone();

        let result = self.collaborator.delete_record(&record_id).await;
        if let Err(error) = result {
            return Err(self.forget_if_gone(position, error));
        }

        self.records.remove(position);
        Ok(())
    }

    /// Drops the local copy when the collaborator reports the record as absent.
    fn forget_if_gone(&mut self, position: usize, error: CollaboratorError) -> AppError {
        if error.kind() != CollaboratorErrorKind::NotFound {
            return AppError::Collaborator(error);
        }

        let record = self.records.remove(position);
        AppError::NotFound(format!(
            "{} '{}' no longer exists: {}",
            self.settings.kind().as_str(),
            record.id(),
            error.message()
        ))
    }
}
