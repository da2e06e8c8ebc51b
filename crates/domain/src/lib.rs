//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod field_value;
mod record;
mod record_kind;
mod sort;

pub use field_value::{FieldMap, FieldValue};
pub use record::{RawRecordId, Record, RecordId, RecordPayload};
pub use record_kind::{RecordKind, STATUS_FIELD};
pub use sort::SortDirection;
