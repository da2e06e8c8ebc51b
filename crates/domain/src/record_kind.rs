use std::str::FromStr;

use ironbeam_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{FieldMap, FieldValue};

/// Field name holding the record status.
pub const STATUS_FIELD: &str = "status";

/// Admin resource managed by a record list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Uploaded project documents and brochures.
    Document,
    /// Sales leads captured from the contact forms.
    Lead,
    /// Content pages built in the page builder.
    Page,
    /// Per-page SEO settings.
    SeoEntry,
    /// Admin audit trail entries.
    AuditEvent,
    /// Security dashboard events.
    SecurityEvent,
}

impl RecordKind {
    /// Every supported kind.
    pub const ALL: [Self; 6] = [
        Self::Document,
        Self::Lead,
        Self::Page,
        Self::SeoEntry,
        Self::AuditEvent,
        Self::SecurityEvent,
    ];

    /// Returns a stable storage value for the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Lead => "lead",
            Self::Page => "page",
            Self::SeoEntry => "seo_entry",
            Self::AuditEvent => "audit_event",
            Self::SecurityEvent => "security_event",
        }
    }

    /// Returns the REST resource segment under `/api/admin/`.
    #[must_use]
    pub fn resource_path(&self) -> &'static str {
        match self {
            Self::Document => "documents",
            Self::Lead => "leads",
            Self::Page => "pages",
            Self::SeoEntry => "seo",
            Self::AuditEvent => "audit-logs",
            Self::SecurityEvent => "security-events",
        }
    }

    /// Fields matched by free-text search unless the list overrides them.
    #[must_use]
    pub fn searchable_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Document => &["title", "file_name", "category", "tags"],
            Self::Lead => &["name", "email", "company", "project_type"],
            Self::Page => &["title", "slug"],
            Self::SeoEntry => &["page_path", "meta_title", "meta_description"],
            Self::AuditEvent => &["action", "actor", "resource_type", "details"],
            Self::SecurityEvent => &["event_type", "source_ip", "description"],
        }
    }

    /// Fields a draft must carry before it is sent for creation.
    #[must_use]
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Document => &["title", "file_name"],
            Self::Lead => &["name", "email"],
            Self::Page => &["title", "slug"],
            Self::SeoEntry => &["page_path"],
            Self::AuditEvent => &["action", "actor"],
            Self::SecurityEvent => &["event_type"],
        }
    }

    /// Closed status catalog; empty when the kind carries no status.
    #[must_use]
    pub fn statuses(&self) -> &'static [&'static str] {
        match self {
            Self::Document | Self::Page => &["draft", "published", "archived"],
            Self::Lead => &["new", "contacted", "qualified", "proposal", "won", "lost"],
            Self::SeoEntry => &[],
            Self::AuditEvent => &["success", "failure"],
            Self::SecurityEvent => &["open", "investigating", "resolved"],
        }
    }

    /// Checks that a `status` value in `fields`, if present, belongs to the catalog.
    ///
    /// Any catalog value may replace any other; transitions are not restricted.
    pub fn validate_status(&self, fields: &FieldMap) -> AppResult<()> {
        let Some(value) = fields.get(STATUS_FIELD) else {
            return Ok(());
        };

        let catalog = self.statuses();
        let known = value
            .as_text()
            .map(|status| catalog.contains(&status))
            .unwrap_or(false);

        if !known {
            return Err(AppError::Validation(format!(
                "status '{value}' is not valid for {}; expected one of [{}]",
                self.as_str(),
                catalog.join(", ")
            )));
        }

        Ok(())
    }

    /// Checks a creation draft: required fields present and non-blank, status valid.
    pub fn validate_draft(&self, draft: &FieldMap) -> AppResult<()> {
        let missing: Vec<&str> = self
            .required_fields()
            .iter()
            .copied()
            .filter(|name| draft.get(*name).map(FieldValue::is_blank).unwrap_or(true))
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "{} draft is missing required fields: {}",
                self.as_str(),
                missing.join(", ")
            )));
        }

        self.validate_status(draft)
    }
}

impl FromStr for RecordKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value || kind.resource_path() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown record kind '{value}'")))
    }
}
