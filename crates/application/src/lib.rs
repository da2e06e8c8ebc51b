//! Application services and ports.

#![forbid(unsafe_code)]

mod record_list_controller;
mod record_ports;
mod record_query;

pub use record_list_controller::RecordListController;
pub use record_ports::{FetchHints, PersistenceCollaborator};
pub use record_query::{
    ListSettings, PredicateValue, RecordFilter, RecordPage, RecordSort, SortKey,
};
