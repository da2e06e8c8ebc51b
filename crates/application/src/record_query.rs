use std::cmp::Ordering;
use std::collections::BTreeMap;

use ironbeam_core::{AppError, AppResult};
use ironbeam_domain::{FieldValue, Record, RecordKind, SortDirection};

/// Transport value selecting every record for a predicate.
const WILDCARD: &str = "all";

/// Value of one field-level predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateValue {
    /// Wildcard: the predicate is inactive.
    All,
    /// Exact match against the field value.
    Exact(FieldValue),
}

impl PredicateValue {
    /// Creates an exact-match predicate value.
    #[must_use]
    pub fn exact(value: impl Into<FieldValue>) -> Self {
        Self::Exact(value.into())
    }

    /// Parses a select-box value; `"all"` is the wildcard.
    ///
    /// `true`/`false` and finite numbers become typed values so they match
    /// boolean and numeric fields; anything else is text.
    #[must_use]
    pub fn parse_transport(value: &str) -> Self {
        if value == WILDCARD {
            return Self::All;
        }

        let typed = match value {
            "true" => FieldValue::Boolean(true),
            "false" => FieldValue::Boolean(false),
            _ => match value.parse::<f64>() {
                Ok(number) if number.is_finite() => FieldValue::Number(number),
                _ => FieldValue::from(value),
            },
        };

        Self::Exact(typed)
    }
}

/// Search term plus exact-match predicates for one record list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    search_term: String,
    predicates: BTreeMap<String, FieldValue>,
}

impl RecordFilter {
    /// Returns the raw search term as last set.
    #[must_use]
    pub fn search_term(&self) -> &str {
        self.search_term.as_str()
    }

    /// Returns the search term without surrounding whitespace, if non-empty.
    #[must_use]
    pub fn trimmed_search_term(&self) -> Option<&str> {
        let trimmed = self.search_term.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Returns active predicates keyed by field name.
    #[must_use]
    pub fn predicates(&self) -> &BTreeMap<String, FieldValue> {
        &self.predicates
    }

    /// Returns true when the filter admits every record.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.trimmed_search_term().is_none() && self.predicates.is_empty()
    }

    pub(crate) fn set_search(&mut self, term: String) {
        self.search_term = term;
    }

    pub(crate) fn set_predicate(&mut self, field: String, value: PredicateValue) {
        match value {
            PredicateValue::All => {
                self.predicates.remove(field.as_str());
            }
            PredicateValue::Exact(value) => {
                self.predicates.insert(field, value);
            }
        }
    }

    /// Search (OR over `searchable`) then predicates (AND).
    pub(crate) fn matches(&self, record: &Record, searchable: &[String]) -> bool {
        self.matches_search(record, searchable) && self.matches_predicates(record)
    }

    fn matches_search(&self, record: &Record, searchable: &[String]) -> bool {
        let Some(term) = self.trimmed_search_term() else {
            return true;
        };

        let needle = term.to_lowercase();
        searchable.iter().any(|field| {
            record
                .field(field.as_str())
                .map(|value| value.contains_lowercase(needle.as_str()))
                .unwrap_or(false)
        })
    }

    fn matches_predicates(&self, record: &Record) -> bool {
        self.predicates
            .iter()
            .all(|(field, expected)| record.field(field.as_str()) == Some(expected))
    }
}

/// Attribute a record list is ordered by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    /// Creation timestamp.
    CreatedAt,
    /// Last mutation timestamp.
    UpdatedAt,
    /// A domain field.
    Field(String),
}

/// Sort instruction for a record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSort {
    /// Attribute to order by.
    pub key: SortKey,
    /// Sort direction.
    pub direction: SortDirection,
}

impl Default for RecordSort {
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl RecordSort {
    /// Parses `key` or `key:direction`, e.g. `updated_at:asc` or `title`.
    ///
    /// `created_at` and `updated_at` select the timestamps; any other key is a
    /// domain field. The direction defaults to descending.
    pub fn parse_transport(value: &str) -> AppResult<Self> {
        let (key, direction) = match value.split_once(':') {
            Some((key, direction)) => (key.trim(), direction.trim().parse::<SortDirection>()?),
            None => (value.trim(), SortDirection::default()),
        };

        let key = match key {
            "" => {
                return Err(AppError::Validation(format!(
                    "sort '{value}' is missing a key"
                )));
            }
            "created_at" => SortKey::CreatedAt,
            "updated_at" => SortKey::UpdatedAt,
            field => SortKey::Field(field.to_owned()),
        };

        Ok(Self { key, direction })
    }

    /// Compares two records; records missing a sort field go after the others
    /// in ascending order, and the whole ordering flips for descending.
    pub(crate) fn compare(&self, left: &Record, right: &Record) -> Ordering {
        let ordering = match &self.key {
            SortKey::CreatedAt => left.created_at().cmp(&right.created_at()),
            SortKey::UpdatedAt => left.updated_at().cmp(&right.updated_at()),
            SortKey::Field(name) => {
                match (left.field(name.as_str()), right.field(name.as_str())) {
                    (Some(left), Some(right)) => left.compare(right),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Construction-time configuration of a record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSettings {
    kind: RecordKind,
    searchable_fields: Vec<String>,
    sort: RecordSort,
}

impl ListSettings {
    /// Returns the defaults for `kind`: its searchable fields, newest first.
    #[must_use]
    pub fn for_kind(kind: RecordKind) -> Self {
        Self {
            kind,
            searchable_fields: kind
                .searchable_fields()
                .iter()
                .map(|field| (*field).to_owned())
                .collect(),
            sort: RecordSort::default(),
        }
    }

    /// Replaces the fields matched by free-text search.
    #[must_use]
    pub fn with_searchable_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the initial sort.
    #[must_use]
    pub fn with_sort(mut self, sort: RecordSort) -> Self {
        self.sort = sort;
        self
    }

    /// Returns the managed record kind.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Returns the fields matched by free-text search.
    #[must_use]
    pub fn searchable_fields(&self) -> &[String] {
        self.searchable_fields.as_slice()
    }

    /// Returns the current sort.
    #[must_use]
    pub fn sort(&self) -> &RecordSort {
        &self.sort
    }

    pub(crate) fn set_sort(&mut self, sort: RecordSort) {
        self.sort = sort;
    }
}

/// One page of the filtered, sorted list.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPage<'a> {
    /// Records on this page, borrowed from the controller.
    pub items: Vec<&'a Record>,
    /// Number of records matching the filter.
    pub total_count: usize,
    /// `ceil(total_count / page_size)`.
    pub total_pages: usize,
    /// Requested page, starting at 1.
    pub page_number: usize,
    /// Requested page size.
    pub page_size: usize,
}
