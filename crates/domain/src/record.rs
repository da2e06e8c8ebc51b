use std::fmt::{Display, Formatter};

use chrono::{DateTime, TimeDelta, Utc};
use ironbeam_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{FieldMap, FieldValue, STATUS_FIELD};

/// Opaque record identifier assigned by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(NonEmptyString);

impl RecordId {
    /// Creates a validated record identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value)?))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RecordId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Identifier as it appears on the wire: MySQL rows carry integers,
/// fixtures usually carry strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRecordId {
    /// String identifier.
    Text(String),
    /// Integer identifier.
    Number(u64),
}

impl From<RawRecordId> for String {
    fn from(value: RawRecordId) -> Self {
        match value {
            RawRecordId::Text(text) => text,
            RawRecordId::Number(number) => number.to_string(),
        }
    }
}

/// Loose record shape accepted from endpoints and static fixtures.
///
/// Domain attributes sit next to `id` and the timestamps, matching the flat
/// rows returned by the admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPayload {
    /// Server-assigned identifier; required to build a [`Record`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RawRecordId>,
    /// Creation timestamp; required to build a [`Record`].
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last mutation timestamp; defaults to `created_at` when absent.
    #[serde(default, alias = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Every other attribute of the row.
    #[serde(flatten)]
    pub fields: FieldMap,
}

/// One managed admin record (document, lead, page, SEO entry, audit or security event).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordPayload", into = "RecordPayload")]
pub struct Record {
    id: RecordId,
    fields: FieldMap,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Record {
    /// Creates a validated record.
    pub fn new(
        id: impl Into<String>,
        fields: FieldMap,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let id = RecordId::new(id)
            .map_err(|_| AppError::Validation("record id must not be empty".to_owned()))?;

        if updated_at < created_at {
            return Err(AppError::Validation(format!(
                "record '{id}' has updated_at earlier than created_at"
            )));
        }

        Ok(Self {
            id,
            fields,
            created_at,
            updated_at,
        })
    }

    /// Returns the stable record identifier.
    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Returns every domain attribute of the record.
    #[must_use]
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Returns one domain attribute.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns the record status, when the record carries a textual one.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.field(STATUS_FIELD).and_then(FieldValue::as_text)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last mutation timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Merges `partial` over the existing fields and advances `updated_at`.
    ///
    /// Keys absent from `partial` are kept. The new `updated_at` is
    /// strictly later than the previous one even when `now` is not.
    pub fn apply_update(&mut self, partial: FieldMap, now: DateTime<Utc>) {
        self.fields.extend(partial);
        self.updated_at = strictly_after(self.updated_at, now);
    }
}

fn strictly_after(previous: DateTime<Utc>, candidate: DateTime<Utc>) -> DateTime<Utc> {
    if candidate > previous {
        candidate
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

impl TryFrom<RecordPayload> for Record {
    type Error = AppError;

    fn try_from(payload: RecordPayload) -> Result<Self, Self::Error> {
        let Some(id) = payload.id.map(String::from) else {
            return Err(AppError::Validation("record is missing an id".to_owned()));
        };

        let Some(created_at) = payload.created_at else {
            return Err(AppError::Validation(format!(
                "record '{id}' is missing created_at"
            )));
        };

        let updated_at = payload.updated_at.unwrap_or(created_at);
        Self::new(id, payload.fields, created_at, updated_at)
    }
}

impl From<Record> for RecordPayload {
    fn from(record: Record) -> Self {
        Self {
            id: Some(RawRecordId::Text(String::from(record.id.0))),
            created_at: Some(record.created_at),
            updated_at: Some(record.updated_at),
            fields: record.fields,
        }
    }
}
