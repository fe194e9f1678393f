//! Integration tests for the CRUD repositories and summary views.
//!
//! - Create and update attributes, sets and values
//! - Category denormalization on attach
//! - Unique and foreign key violations
//! - Aggregate views

use attrdb_db::models::attribute::{CreateAttribute, UpdateAttribute};
use attrdb_db::models::attribute_set::{CreateAttributeSet, UpdateAttributeSet};
use attrdb_db::models::attribute_value::{CreateAttributeValue, UpdateAttributeValue};
use attrdb_db::repositories::{AttributeRepo, AttributeSetRepo, AttributeValueRepo, SummaryRepo};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_attribute(id: &str, category: &str) -> CreateAttribute {
    CreateAttribute {
        id: id.to_string(),
        category: category.to_string(),
        description: None,
    }
}

fn new_set(id: &str, name: &str) -> CreateAttributeSet {
    CreateAttributeSet {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
    }
}

fn new_value(set_id: &str, attribute_id: &str, base_value: f64) -> CreateAttributeValue {
    CreateAttributeValue {
        attribute_set_id: set_id.to_string(),
        attribute_id: attribute_id.to_string(),
        base_value,
        min_value: None,
        max_value: None,
        comment: None,
    }
}

// ---------------------------------------------------------------------------
// Attributes and sets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_update_attribute(pool: SqlitePool) {
    let created = AttributeRepo::create(&pool, &new_attribute("Ship.Armor", "Ship"))
        .await
        .unwrap();
    assert_eq!(created.id, "Ship.Armor");
    assert_eq!(created.description, None);

    let updated = AttributeRepo::update(
        &pool,
        "Ship.Armor",
        &UpdateAttribute {
            description: Some("Hull plating".to_string()),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Hull plating"));

    let missing = AttributeRepo::update(&pool, "Ghost", &UpdateAttribute { description: None })
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_attribute_id_rejected(pool: SqlitePool) {
    AttributeRepo::create(&pool, &new_attribute("Ship.Armor", "Ship"))
        .await
        .unwrap();

    let result = AttributeRepo::create(&pool, &new_attribute("Ship.Armor", "Other")).await;
    assert!(result.is_err(), "duplicate id should be rejected");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_categories(pool: SqlitePool) {
    for (id, category) in [("Ship.Armor", "Ship"), ("Ship.Speed", "Ship"), ("Gun.Damage", "Gun")] {
        AttributeRepo::create(&pool, &new_attribute(id, category)).await.unwrap();
    }

    let categories = AttributeRepo::list_categories(&pool).await.unwrap();
    let pairs: Vec<(&str, i64)> = categories
        .iter()
        .map(|c| (c.category.as_str(), c.attribute_count))
        .collect();
    assert_eq!(pairs, vec![("Gun", 1), ("Ship", 2)]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_attribute_set(pool: SqlitePool) {
    AttributeSetRepo::create(&pool, &new_set("Frigate", "Frigate")).await.unwrap();

    let updated = AttributeSetRepo::update(
        &pool,
        "Frigate",
        &UpdateAttributeSet {
            name: Some("Light Frigate".to_string()),
            description: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "Light Frigate");
    assert_eq!(updated.id, "Frigate");
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_attach_copies_category_and_default_bounds(pool: SqlitePool) {
    AttributeRepo::create(&pool, &new_attribute("Ship.Armor", "Ship")).await.unwrap();
    AttributeSetRepo::create(&pool, &new_set("Frigate", "Frigate")).await.unwrap();

    let value = AttributeValueRepo::attach(&pool, &new_value("Frigate", "Ship.Armor", 100.0))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(value.attribute_category, "Ship");
    assert_eq!(value.base_value, 100.0);
    assert_eq!(value.min_value, -999_999.0);
    assert_eq!(value.max_value, 999_999.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_attach_missing_attribute_returns_none(pool: SqlitePool) {
    AttributeSetRepo::create(&pool, &new_set("Frigate", "Frigate")).await.unwrap();

    let value = AttributeValueRepo::attach(&pool, &new_value("Frigate", "Ghost", 1.0))
        .await
        .unwrap();
    assert!(value.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_attach_missing_set_rejected(pool: SqlitePool) {
    AttributeRepo::create(&pool, &new_attribute("Ship.Armor", "Ship")).await.unwrap();

    let result = AttributeValueRepo::attach(&pool, &new_value("Ghost", "Ship.Armor", 1.0)).await;
    assert!(result.is_err(), "foreign key should reject an unknown set");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_set_attribute_pair_rejected(pool: SqlitePool) {
    AttributeRepo::create(&pool, &new_attribute("Ship.Armor", "Ship")).await.unwrap();
    AttributeSetRepo::create(&pool, &new_set("Frigate", "Frigate")).await.unwrap();
    AttributeValueRepo::attach(&pool, &new_value("Frigate", "Ship.Armor", 1.0))
        .await
        .unwrap();

    let result = AttributeValueRepo::attach(&pool, &new_value("Frigate", "Ship.Armor", 2.0)).await;
    assert!(result.is_err(), "an attribute appears at most once per set");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_delete_blocked_by_foreign_key(pool: SqlitePool) {
    AttributeRepo::create(&pool, &new_attribute("Ship.Armor", "Ship")).await.unwrap();
    AttributeSetRepo::create(&pool, &new_set("Frigate", "Frigate")).await.unwrap();
    AttributeValueRepo::attach(&pool, &new_value("Frigate", "Ship.Armor", 1.0))
        .await
        .unwrap();

    let result = sqlx::query("DELETE FROM attributes WHERE id = 'Ship.Armor'")
        .execute(&pool)
        .await;
    assert!(result.is_err(), "a referenced attribute cannot be deleted directly");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_delete_value(pool: SqlitePool) {
    AttributeRepo::create(&pool, &new_attribute("Ship.Armor", "Ship")).await.unwrap();
    AttributeSetRepo::create(&pool, &new_set("Frigate", "Frigate")).await.unwrap();
    let value = AttributeValueRepo::attach(&pool, &new_value("Frigate", "Ship.Armor", 1.0))
        .await
        .unwrap()
        .unwrap();

    let updated = AttributeValueRepo::update(
        &pool,
        value.id,
        &UpdateAttributeValue {
            base_value: Some(5.0),
            max_value: Some(10.0),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.base_value, 5.0);
    assert_eq!(updated.max_value, 10.0);
    assert_eq!(updated.min_value, value.min_value);

    assert!(AttributeValueRepo::delete(&pool, value.id).await.unwrap());
    assert!(!AttributeValueRepo::delete(&pool, value.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_summary_views(pool: SqlitePool) {
    for (id, category) in [("Ship.Armor", "Ship"), ("Ship.Speed", "Ship"), ("Gun.Damage", "Gun")] {
        AttributeRepo::create(&pool, &new_attribute(id, category)).await.unwrap();
    }
    AttributeSetRepo::create(&pool, &new_set("Frigate", "Frigate")).await.unwrap();
    AttributeSetRepo::create(&pool, &new_set("Empty", "Empty")).await.unwrap();
    for attribute_id in ["Ship.Armor", "Ship.Speed", "Gun.Damage"] {
        AttributeValueRepo::attach(&pool, &new_value("Frigate", attribute_id, 1.0))
            .await
            .unwrap();
    }

    let ship = SummaryRepo::attribute_usage(&pool, Some("Ship")).await.unwrap();
    assert_eq!(ship.len(), 2);
    assert!(ship.iter().all(|u| u.set_count == 1 && u.value_count == 1));

    let all = SummaryRepo::attribute_usage(&pool, None).await.unwrap();
    assert_eq!(all.len(), 3);

    let summaries = SummaryRepo::attribute_set_summaries(&pool).await.unwrap();
    let frigate = summaries.iter().find(|s| s.attribute_set_id == "Frigate").unwrap();
    assert_eq!(frigate.attribute_count, 3);
    assert_eq!(frigate.category_count, 2);
    let empty = summaries.iter().find(|s| s.attribute_set_id == "Empty").unwrap();
    assert_eq!(empty.attribute_count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_inverted_bounds_rejected(pool: SqlitePool) {
    AttributeRepo::create(&pool, &new_attribute("Ship.Armor", "Ship")).await.unwrap();
    AttributeSetRepo::create(&pool, &new_set("Frigate", "Frigate")).await.unwrap();
    let value = AttributeValueRepo::attach(&pool, &new_value("Frigate", "Ship.Armor", 1.0))
        .await
        .unwrap()
        .unwrap();

    let result = AttributeValueRepo::update(
        &pool,
        value.id,
        &UpdateAttributeValue {
            min_value: Some(50.0),
            max_value: Some(10.0),
            ..Default::default()
        },
    )
    .await;
    assert!(result.is_err(), "min above max should violate the bounds check");
}
