//! Dependency resolution: read-only discovery of what references a set of
//! attribute identifiers.
//!
//! Every function takes a `&mut SqliteConnection` so it can run either on a
//! pooled connection (previews) or inside an open write transaction
//! (re-validation before a cascade). Id lists are bound parameter by
//! parameter in chunks below SQLite's bind-variable limit.

use std::collections::{BTreeMap, BTreeSet};

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::models::attribute::Attribute;
use crate::models::attribute_set::AttributeSet;

/// Upper bound on ids bound into a single `IN (...)` list.
const ID_CHUNK_SIZE: usize = 500;

/// Provides the read-only dependency queries used by the identity engine.
pub struct DependencyRepo;

impl DependencyRepo {
    /// All attributes whose `category` equals `category`, ordered by id.
    pub async fn find_attributes_by_category(
        conn: &mut SqliteConnection,
        category: &str,
    ) -> Result<Vec<Attribute>, sqlx::Error> {
        sqlx::query_as::<_, Attribute>(
            "SELECT id, category, description FROM attributes \
             WHERE category = ? ORDER BY id",
        )
        .bind(category)
        .fetch_all(conn)
        .await
    }

    /// Look up a single attribute.
    pub async fn find_attribute_by_id(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<Attribute>, sqlx::Error> {
        sqlx::query_as::<_, Attribute>(
            "SELECT id, category, description FROM attributes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Look up a single attribute set.
    pub async fn find_attribute_set_by_id(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<AttributeSet>, sqlx::Error> {
        sqlx::query_as::<_, AttributeSet>(
            "SELECT id, name, description FROM attribute_sets WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Distinct attribute sets owning at least one value that references any
    /// of `attribute_ids`, ordered by set id.
    ///
    /// Returns an empty list without querying when `attribute_ids` is empty.
    pub async fn find_referencing_attribute_sets(
        conn: &mut SqliteConnection,
        attribute_ids: &[String],
    ) -> Result<Vec<AttributeSet>, sqlx::Error> {
        let mut sets = BTreeMap::new();

        for chunk in attribute_ids.chunks(ID_CHUNK_SIZE) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "SELECT s.id, s.name, s.description FROM attribute_sets s \
                 WHERE s.id IN (SELECT v.attribute_set_id FROM attribute_values v \
                 WHERE v.attribute_id IN (",
            );
            push_id_list(&mut builder, chunk);
            builder.push("))");

            let rows = builder
                .build_query_as::<AttributeSet>()
                .fetch_all(&mut *conn)
                .await?;
            for set in rows {
                sets.insert(set.id.clone(), set);
            }
        }

        Ok(sets.into_values().collect())
    }

    /// Number of attribute values referencing any of `attribute_ids`.
    ///
    /// Returns `0` without querying when `attribute_ids` is empty.
    pub async fn count_attribute_values(
        conn: &mut SqliteConnection,
        attribute_ids: &[String],
    ) -> Result<i64, sqlx::Error> {
        let mut total = 0;

        // A repeated id split across chunks would be counted once per chunk.
        let distinct = distinct_ids(attribute_ids);
        for chunk in distinct.chunks(ID_CHUNK_SIZE) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "SELECT COUNT(*) FROM attribute_values WHERE attribute_id IN (",
            );
            push_id_list(&mut builder, chunk);
            builder.push(")");

            let (count,): (i64,) = builder.build_query_as().fetch_one(&mut *conn).await?;
            total += count;
        }

        Ok(total)
    }

    /// The subset of `ids` that exist in `attributes`, ordered by id.
    ///
    /// Returns an empty list without querying when `ids` is empty.
    pub async fn find_existing_attribute_ids(
        conn: &mut SqliteConnection,
        ids: &[String],
    ) -> Result<Vec<String>, sqlx::Error> {
        let mut existing = Vec::new();

        for chunk in ids.chunks(ID_CHUNK_SIZE) {
            let mut builder = QueryBuilder::<Sqlite>::new("SELECT id FROM attributes WHERE id IN (");
            push_id_list(&mut builder, chunk);
            builder.push(")");

            let rows: Vec<(String,)> = builder.build_query_as().fetch_all(&mut *conn).await?;
            existing.extend(rows.into_iter().map(|(id,)| id));
        }

        existing.sort();
        existing.dedup();
        Ok(existing)
    }

    /// Number of values owned by an attribute set.
    pub async fn count_set_values(
        conn: &mut SqliteConnection,
        attribute_set_id: &str,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM attribute_values WHERE attribute_set_id = ?")
                .bind(attribute_set_id)
                .fetch_one(conn)
                .await?;
        Ok(count)
    }
}

/// `ids` sorted with repeats removed.
fn distinct_ids(ids: &[String]) -> Vec<String> {
    ids.iter().collect::<BTreeSet<_>>().into_iter().cloned().collect()
}

/// Append `?, ?, ...` for `ids`, binding each one.
pub(crate) fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[String]) {
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.clone());
    }
}
