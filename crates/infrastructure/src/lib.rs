//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_record_collaborator;
mod in_memory_record_collaborator;

pub use http_record_collaborator::HttpRecordCollaborator;
pub use in_memory_record_collaborator::InMemoryRecordCollaborator;
