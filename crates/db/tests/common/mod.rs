//! Shared fixtures for the repository and engine integration tests.

#![allow(dead_code)]

use attrdb_db::models::attribute::{Attribute, CreateAttribute};
use attrdb_db::models::attribute_set::{AttributeSet, CreateAttributeSet};
use attrdb_db::models::attribute_value::{AttributeValue, CreateAttributeValue};
use attrdb_db::repositories::{AttributeRepo, AttributeSetRepo, AttributeValueRepo};
use attrdb_db::{AttributeCatalog, CatalogConfig};
use sqlx::SqlitePool;

/// Wrap the per-test pool in a catalog with default settings.
pub fn catalog(pool: &SqlitePool) -> AttributeCatalog {
    AttributeCatalog::from_pool(pool.clone(), CatalogConfig::new("test.db"))
}

/// Same as [`catalog`] with an explicit configuration.
pub fn catalog_with(pool: &SqlitePool, configure: impl FnOnce(&mut CatalogConfig)) -> AttributeCatalog {
    let mut config = CatalogConfig::new("test.db");
    configure(&mut config);
    AttributeCatalog::from_pool(pool.clone(), config)
}

pub async fn add_attribute(pool: &SqlitePool, id: &str, category: &str) -> Attribute {
    AttributeRepo::create(
        pool,
        &CreateAttribute {
            id: id.to_string(),
            category: category.to_string(),
            description: Some(format!("{id} description")),
        },
    )
    .await
    .unwrap()
}

pub async fn add_set(pool: &SqlitePool, id: &str) -> AttributeSet {
    AttributeSetRepo::create(
        pool,
        &CreateAttributeSet {
            id: id.to_string(),
            name: format!("{id} name"),
            description: None,
        },
    )
    .await
    .unwrap()
}

pub async fn attach(pool: &SqlitePool, set_id: &str, attribute_id: &str, base_value: f64) -> AttributeValue {
    AttributeValueRepo::attach(
        pool,
        &CreateAttributeValue {
            attribute_set_id: set_id.to_string(),
            attribute_id: attribute_id.to_string(),
            base_value,
            min_value: None,
            max_value: None,
            comment: None,
        },
    )
    .await
    .unwrap()
    .expect("attribute should exist")
}

/// Every row of the three core tables, in a stable order.
#[derive(Debug, PartialEq)]
pub struct Snapshot {
    pub attributes: Vec<Attribute>,
    pub attribute_sets: Vec<AttributeSet>,
    pub values: Vec<AttributeValue>,
}

pub async fn snapshot(pool: &SqlitePool) -> Snapshot {
    Snapshot {
        attributes: AttributeRepo::list(pool).await.unwrap(),
        attribute_sets: AttributeSetRepo::list(pool).await.unwrap(),
        values: AttributeValueRepo::list(pool).await.unwrap(),
    }
}

/// Assert that no value references a missing parent and every denormalized
/// category matches its attribute.
pub async fn assert_integrity(pool: &SqlitePool) {
    let (dangling,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM attribute_values v \
         LEFT JOIN attributes a ON a.id = v.attribute_id \
         LEFT JOIN attribute_sets s ON s.id = v.attribute_set_id \
         WHERE a.id IS NULL OR s.id IS NULL",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    assert_eq!(dangling, 0, "attribute values must not reference missing parents");

    let (mismatched,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM attribute_values v \
         JOIN attributes a ON a.id = v.attribute_id \
         WHERE v.attribute_category <> a.category",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    assert_eq!(mismatched, 0, "denormalized categories must match their attribute");
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
