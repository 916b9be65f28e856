//! Tests for the filter manager.

use super::*;
use onboard_filters::{Condition, FilterCriteria, Operator};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

fn manager_in(dir: &TempDir) -> FilterManager {
    FilterManager::new(DatabaseStore::with_path(dir.path().join("store.json"))).unwrap()
}

fn draft(name: &str, category: &str, criteria: FilterCriteria) -> FilterDraft {
    FilterDraft {
        name: Some(name.to_string()),
        category: Some(category.to_string()),
        ..FilterDraft::default()
    }
    .with_criteria(&criteria)
}

fn chiefs() -> FilterDraft {
    draft(
        "Chiefs",
        "personas",
        FilterCriteria::all(vec![Condition::new("title", Operator::Contains, "chief")]),
    )
}

fn records() -> Vec<Value> {
    vec![
        json!({ "title": "Police Chief", "level": "A" }),
        json!({ "title": "Clerk", "level": "B" }),
        json!({ "title": "Fire Chief", "level": "C" }),
    ]
}

// ==================== Filters ====================

#[tokio::test]
async fn test_create_filter_assigns_metadata() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let user = UserId::new("alice");

    let filter = manager.create_filter(&user, &chiefs()).await.unwrap();

    assert_eq!(filter.id, Some(1));
    assert_eq!(filter.user_id.as_deref(), Some("alice"));
    assert!(filter.is_active);
    assert!(filter.created_at.is_some());
    assert_eq!(filter.created_at, filter.updated_at);
}

#[tokio::test]
async fn test_create_filter_persists() {
    let dir = tempdir().unwrap();
    let user = UserId::anonymous();
    {
        let mut manager = manager_in(&dir);
        manager.create_filter(&user, &chiefs()).await.unwrap();
    }

    let reopened = manager_in(&dir);
    let filters = reopened.fetch_filters(&user, None);
    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0].name, "Chiefs");
    assert!(reopened.database().updated_at.is_some());
}

#[tokio::test]
async fn test_create_filter_rejects_invalid_draft() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);

    let err = manager
        .create_filter(&UserId::anonymous(), &FilterDraft::default())
        .await
        .unwrap_err();

    let inner = match err {
        StoreError::InvalidFilter(inner) => inner,
        other => panic!("expected InvalidFilter, got {other:?}"),
    };
    let paths: Vec<&str> = inner.issues().iter().map(|i| i.path.as_str()).collect();
    assert!(paths.contains(&"name"));
    assert!(paths.contains(&"category"));
    assert!(!manager.store().exists());
    assert_eq!(manager.database().next_filter_id, 1);
}

#[tokio::test]
async fn test_ids_are_not_reused() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let user = UserId::anonymous();

    let first = manager.create_filter(&user, &chiefs()).await.unwrap();
    manager.delete_filter(&user, 1).await.unwrap();
    let second = manager.create_filter(&user, &chiefs()).await.unwrap();

    assert_eq!(first.id, Some(1));
    assert_eq!(second.id, Some(2));
}

#[tokio::test]
async fn test_fetch_filters_scoped_by_user_and_category() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    manager.create_filter(&alice, &chiefs()).await.unwrap();
    manager
        .create_filter(&alice, &draft("All", "accounts", FilterCriteria::default()))
        .await
        .unwrap();
    manager.create_filter(&bob, &chiefs()).await.unwrap();

    assert_eq!(manager.fetch_filters(&alice, None).len(), 2);
    assert_eq!(manager.fetch_filters(&alice, Some("accounts")).len(), 1);
    assert_eq!(manager.fetch_filters(&bob, None).len(), 1);
    assert!(manager.fetch_filters(&bob, Some("accounts")).is_empty());
    assert!(manager.fetch_filters(&UserId::anonymous(), None).is_empty());
}

#[tokio::test]
async fn test_find_filter_is_user_scoped() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let alice = UserId::new("alice");
    manager.create_filter(&alice, &chiefs()).await.unwrap();

    assert_eq!(manager.find_filter(&alice, 1).unwrap().name, "Chiefs");

    let err = manager.find_filter(&UserId::new("bob"), 1).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { resource_type: "filter", .. }));
    assert_eq!(err.to_string(), "filter '1' not found.");
}

#[tokio::test]
async fn test_set_active_toggles_and_bumps_timestamp() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let user = UserId::anonymous();
    let created = manager.create_filter(&user, &chiefs()).await.unwrap();

    let updated = manager.set_active(&user, 1, false).await.unwrap();
    assert!(!updated.is_active);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.created_at, created.created_at);

    let reopened = manager_in(&dir);
    assert!(!reopened.find_filter(&user, 1).unwrap().is_active);
}

#[tokio::test]
async fn test_delete_missing_filter() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let err = manager
        .delete_filter(&UserId::anonymous(), 9)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn test_apply_filters_uses_active_user_filters() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");
    let records = records();

    manager.create_filter(&alice, &chiefs()).await.unwrap();
    manager
        .create_filter(
            &alice,
            &draft(
                "Level A",
                "levels",
                FilterCriteria::all(vec![Condition::new("level", Operator::Equals, "A")]),
            ),
        )
        .await
        .unwrap();

    assert_eq!(manager.apply_filters(&alice, None, &records).len(), 1);
    assert_eq!(manager.apply_filters(&alice, Some("personas"), &records).len(), 2);
    // Bob has no filters: every record passes.
    assert_eq!(manager.apply_filters(&bob, None, &records).len(), 3);

    manager.set_active(&alice, 2, false).await.unwrap();
    assert_eq!(manager.apply_filters(&alice, None, &records).len(), 2);
}

#[tokio::test]
async fn test_load_keeps_filters_that_fail_revalidation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(
        &path,
        serde_json::to_string(&json!({
            "filters": [{
                "id": 1,
                "name": "",
                "category": "personas",
                "criteria": { "conditions": [], "logic": "and" },
                "user_id": "alice"
            }],
            "next_filter_id": 2
        }))
        .unwrap(),
    )
    .unwrap();

    let manager = FilterManager::new(DatabaseStore::with_path(path)).unwrap();
    assert_eq!(manager.fetch_filters(&UserId::new("alice"), None).len(), 1);
}

/// Makes every later save fail by occupying the temp file path.
fn block_saves(dir: &TempDir) {
    std::fs::create_dir(dir.path().join("store.tmp")).unwrap();
}

#[tokio::test]
async fn test_failed_delete_keeps_filter() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let user = UserId::anonymous();
    manager.create_filter(&user, &chiefs()).await.unwrap();
    manager
        .create_filter(&user, &draft("All", "accounts", FilterCriteria::default()))
        .await
        .unwrap();
    let before = manager.database().clone();
    block_saves(&dir);

    let err = manager.delete_filter(&user, 1).await.unwrap_err();
    assert!(matches!(err, StoreError::Store(_)));

    assert_eq!(manager.database(), &before);
    assert_eq!(manager.fetch_filters(&user, None)[0].name, "Chiefs");
    assert_eq!(manager_in(&dir).fetch_filters(&user, None).len(), 2);
}

#[tokio::test]
async fn test_failed_set_active_restores_flag_and_timestamp() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let user = UserId::anonymous();
    let created = manager.create_filter(&user, &chiefs()).await.unwrap();
    block_saves(&dir);

    assert!(manager.set_active(&user, 1, false).await.is_err());

    let filter = manager.find_filter(&user, 1).unwrap();
    assert!(filter.is_active);
    assert_eq!(filter.updated_at, created.updated_at);
}

#[tokio::test]
async fn test_failed_delete_keyword_keeps_keyword() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let user = UserId::anonymous();
    manager.add_keyword(&user, "grants", "opportunity_keywords").await.unwrap();
    manager.add_keyword(&user, "rfps", "opportunity_keywords").await.unwrap();
    let before = manager.database().clone();
    block_saves(&dir);

    assert!(manager.delete_keyword(&user, 1).await.is_err());

    assert_eq!(manager.database(), &before);
    let texts: Vec<&str> = manager
        .keywords(&user, None)
        .iter()
        .map(|k| k.keyword.as_str())
        .collect();
    assert_eq!(texts, vec!["grants", "rfps"]);
}

// ==================== Keywords ====================

#[tokio::test]
async fn test_add_keyword_trims_and_persists() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let user = UserId::anonymous();

    let keyword = manager
        .add_keyword(&user, "  grants  ", "opportunity_keywords")
        .await
        .unwrap();
    assert_eq!(keyword.keyword, "grants");
    assert_eq!(keyword.id, 1);
    assert_eq!(keyword.user_id, user.as_str());

    let reopened = manager_in(&dir);
    let keywords = reopened.keywords(&user, Some("opportunity_keywords"));
    assert_eq!(keywords.len(), 1);
    assert_eq!(keywords[0].keyword, "grants");
}

#[tokio::test]
async fn test_add_blank_keyword_rejected() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let err = manager
        .add_keyword(&UserId::anonymous(), "   ", "opportunity_keywords")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::EmptyKeyword));
    assert!(!manager.store().exists());
}

#[tokio::test]
async fn test_add_keyword_unknown_category_suggests() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let err = manager
        .add_keyword(&UserId::anonymous(), "rfp", "opportunity_keyword")
        .await
        .unwrap_err();

    match &err {
        StoreError::NotFound { suggestion, .. } => {
            assert_eq!(suggestion.as_deref(), Some("opportunity_keywords"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(err.to_string().contains("Did you mean 'opportunity_keywords'?"));
    assert_eq!(manager.database().next_keyword_id, 1);
}

#[tokio::test]
async fn test_add_keyword_to_persona_category() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let category = crate::persona_category("persona_title_filters", "Sales Lead");

    let keyword = manager
        .add_keyword(&UserId::anonymous(), "VP Sales", &category)
        .await
        .unwrap();
    assert_eq!(keyword.category, "persona_title_filters_sales_lead");
}

#[tokio::test]
async fn test_keywords_scoped_by_user() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    manager.add_keyword(&alice, "grants", "opportunity_keywords").await.unwrap();
    manager.add_keyword(&alice, "CFO", "target_personas").await.unwrap();
    manager.add_keyword(&bob, "tenders", "opportunity_keywords").await.unwrap();

    assert_eq!(manager.keywords(&alice, None).len(), 2);
    assert_eq!(manager.keywords(&alice, Some("target_personas")).len(), 1);
    assert_eq!(manager.keywords(&bob, None).len(), 1);
}

#[tokio::test]
async fn test_delete_keyword() {
    let dir = tempdir().unwrap();
    let mut manager = manager_in(&dir);
    let alice = UserId::new("alice");
    let keyword = manager
        .add_keyword(&alice, "grants", "opportunity_keywords")
        .await
        .unwrap();

    // Another user's id does not match.
    assert!(!manager.delete_keyword(&UserId::new("bob"), keyword.id).await.unwrap());
    assert!(manager.delete_keyword(&alice, keyword.id).await.unwrap());
    assert!(!manager.delete_keyword(&alice, keyword.id).await.unwrap());
    assert!(manager.keywords(&alice, None).is_empty());
}

#[test]
fn test_categories_seeded() {
    let dir = tempdir().unwrap();
    let manager = manager_in(&dir);
    let names: Vec<&str> = manager.categories().iter().map(|c| c.name.as_str()).collect();
    assert!(names.contains(&"opportunity_keywords"));
    assert!(names.contains(&"authority_department_filters"));
}
