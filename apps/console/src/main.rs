//! Ironbeam admin record console.

#![forbid(unsafe_code)]

mod console_config;

use std::sync::Arc;
use std::time::Duration;

use ironbeam_application::{
    ListSettings, PersistenceCollaborator, PredicateValue, RecordListController, RecordPage,
};
use ironbeam_core::{AppError, AppResult, CollaboratorError, CollaboratorErrorKind};
use ironbeam_domain::{Record, RecordKind};
use ironbeam_infrastructure::{HttpRecordCollaborator, InMemoryRecordCollaborator};
use tracing::info;

use crate::console_config::{ConsoleConfig, RecordSourceConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let collaborator = build_collaborator(&config)?;
    let settings = ListSettings::for_kind(config.kind).with_sort(config.sort.clone());
    let mut controller = RecordListController::new(collaborator, settings);

    if let Some(term) = config.search.as_deref() {
        controller.set_search(term);
    }
    for (field, value) in &config.filters {
        controller.set_predicate(field.as_str(), PredicateValue::parse_transport(value));
    }

    let loaded = controller.refresh().await?;
    info!(
        resource = config.kind.resource_path(),
        loaded,
        search = controller.filter().search_term(),
        predicates = controller.filter().predicates().len(),
        sort = controller.settings().sort().direction.as_str(),
        "record list loaded"
    );

    let page = controller.paginate(config.page, config.page_size)?;
    print_page(config.kind, &page);

    for (status, count) in controller.status_counts() {
        println!("{status:>14}: {count}");
    }

    Ok(())
}

fn build_collaborator(config: &ConsoleConfig) -> AppResult<Arc<dyn PersistenceCollaborator>> {
    match &config.source {
        RecordSourceConfig::Http(http) => {
            let http_client = reqwest::Client::builder()
                .timeout(Duration::from_secs(http.timeout_secs))
                .build()
                .map_err(|error| {
                    CollaboratorError::with_source(
                        CollaboratorErrorKind::Transport,
                        "failed to build HTTP client",
                        error,
                    )
                })?;

            let mut collaborator = HttpRecordCollaborator::new(
                http_client,
                &http.base_url,
                config.kind,
                http.max_attempts,
                http.retry_backoff_ms,
            )?;
            if let Some(token) = http.api_token.as_deref() {
                collaborator = collaborator.with_api_token(token);
            }

            info!(endpoint = %collaborator.collection_url(), "using admin API");
            Ok(Arc::new(collaborator))
        }
        RecordSourceConfig::Fixture(path) => {
            let fixture = std::fs::read_to_string(path).map_err(|error| {
                AppError::Validation(format!(
                    "failed to read fixture '{}': {error}",
                    path.display()
                ))
            })?;

            info!(fixture = %path.display(), "using static fixture");
            Ok(Arc::new(InMemoryRecordCollaborator::from_fixture(
                fixture.as_str(),
            )?))
        }
    }
}

fn print_page(kind: RecordKind, page: &RecordPage<'_>) {
    println!(
        "{} page {}/{} ({} matching)",
        kind.resource_path(),
        page.page_number,
        page.total_pages.max(1),
        page.total_count
    );

    for record in &page.items {
        println!(
            "{:<38} {}  {:<12} {}",
            record.id().as_str(),
            record.created_at().format("%Y-%m-%d %H:%M"),
            record.status().unwrap_or("-"),
            headline(kind, record)
        );
    }
}

fn headline(kind: RecordKind, record: &Record) -> String {
    kind.searchable_fields()
        .iter()
        .find_map(|field| record.field(field))
        .map(ToString::to_string)
        .unwrap_or_default()
}
