use std::sync::Arc;

use ironbeam_application::{
    FetchHints, ListSettings, PersistenceCollaborator, PredicateValue, RecordListController,
};
use ironbeam_core::{AppError, CollaboratorErrorKind};
use ironbeam_domain::{FieldMap, FieldValue, RecordId, RecordKind};

use super::InMemoryRecordCollaborator;

const LEADS_FIXTURE: &str = r#"[
    {"id": "l-1", "name": "Dana Ortiz", "email": "dana@example.com", "status": "new",
     "estimated_value": 120000, "created_at": "2024-04-01T08:00:00Z"},
    {"id": "l-2", "name": "Sam Harbor", "email": "sam@example.com", "status": "won",
     "estimated_value": 45000, "created_at": "2024-04-03T08:00:00Z"},
    {"id": "l-3", "name": "Lee Park", "email": "lee@example.com", "status": "new",
     "created_at": "2024-04-02T08:00:00Z"}
]"#;

fn draft(entries: &[(&str, &str)]) -> FieldMap {
    entries
        .iter()
        .map(|(name, value)| ((*name).to_owned(), FieldValue::from(*value)))
        .collect()
}

#[tokio::test]
async fn fetch_all_applies_predicate_hints_newest_first() {
    let collaborator =
        InMemoryRecordCollaborator::from_fixture(LEADS_FIXTURE).unwrap_or_else(|_| unreachable!());

    let mut hints = FetchHints::default();
    hints
        .predicates
        .insert("status".to_owned(), FieldValue::from("new"));

    let listed = collaborator
        .fetch_all(&hints)
        .await
        .unwrap_or_else(|_| unreachable!());
    let ids: Vec<&str> = listed.iter().map(|record| record.id().as_str()).collect();
    assert_eq!(ids, vec!["l-3", "l-1"]);
}

#[tokio::test]
async fn fixture_without_id_is_rejected() {
    let result = InMemoryRecordCollaborator::from_fixture(
        r#"[{"name": "Nobody", "created_at": "2024-04-01T08:00:00Z"}]"#,
    );
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn create_assigns_id_and_timestamps() {
    let collaborator = InMemoryRecordCollaborator::new();

    let created = collaborator
        .create_record(draft(&[("title", "Brochure"), ("file_name", "brochure.pdf")]))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(!created.id().as_str().is_empty());
    assert_eq!(created.created_at(), created.updated_at());

    let listed = collaborator
        .fetch_all(&FetchHints::default())
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn update_and_delete_unknown_ids_are_not_found() {
    let collaborator = InMemoryRecordCollaborator::new();
    let missing = RecordId::new("missing").unwrap_or_else(|_| unreachable!());

    let updated = collaborator.update_record(&missing, FieldMap::new()).await;
    assert_eq!(
        updated.err().map(|error| error.kind()),
        Some(CollaboratorErrorKind::NotFound)
    );

    let deleted = collaborator.delete_record(&missing).await;
    assert_eq!(
        deleted.err().map(|error| error.kind()),
        Some(CollaboratorErrorKind::NotFound)
    );
}

#[tokio::test]
async fn controller_round_trip_against_in_memory_store() {
    let collaborator = Arc::new(
        InMemoryRecordCollaborator::from_fixture(LEADS_FIXTURE).unwrap_or_else(|_| unreachable!()),
    );
    let mut controller =
        RecordListController::new(collaborator.clone(), ListSettings::for_kind(RecordKind::Lead));

    assert_eq!(controller.refresh().await.ok(), Some(3));

    let updated = controller
        .update("l-1", draft(&[("status", "contacted")]))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(updated.status(), Some("contacted"));
    assert_eq!(updated.field("estimated_value"), Some(&FieldValue::from(120000)));

    assert!(controller.remove("l-2").await.is_ok());

    controller.set_predicate("status", PredicateValue::exact("contacted"));
    assert_eq!(controller.refresh().await.ok(), Some(1));
    assert_eq!(
        controller.get("l-1").and_then(|record| record.status()),
        Some("contacted")
    );
    assert!(controller.get("l-2").is_none());
}

#[tokio::test]
async fn bundled_fixtures_load_for_their_kinds() {
    for (kind, fixture) in [
        (RecordKind::Lead, include_str!("../../../../fixtures/leads.json")),
        (RecordKind::Page, include_str!("../../../../fixtures/pages.json")),
    ] {
        let collaborator = InMemoryRecordCollaborator::from_fixture(fixture);
        assert!(collaborator.is_ok());

        let mut controller = RecordListController::new(
            Arc::new(collaborator.unwrap_or_default()),
            ListSettings::for_kind(kind),
        );
        let loaded = controller.refresh().await;
        assert!(loaded.is_ok_and(|count| count > 0));
    }
}
