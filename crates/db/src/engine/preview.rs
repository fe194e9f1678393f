//! Change preview builder.
//!
//! Turns a [`ChangeRequest`] into a [`ChangePreview`]: which attributes,
//! attribute sets and values a rename would touch, and whether it can be
//! applied. Performs no writes. Validation problems are reported through
//! the preview, never as `Err`; only query failures are errors.

use attrdb_core::change::{detect_collision, plan_remap, target_ids, ChangeKind, ChangeRequest};
use attrdb_core::identity::{validate_identifier, RemapStrategy};
use sqlx::SqliteConnection;

use crate::models::change_preview::{ChangePreview, SetRenamePreview};
use crate::repositories::DependencyRepo;

pub struct PreviewBuilder;

impl PreviewBuilder {
    /// Compute the impact of `request`.
    ///
    /// - Category rename: every attribute in `old_category`.
    /// - Attribute rename: the attribute with `old_id`, if it exists.
    /// - No-op: an empty, valid preview.
    ///
    /// An empty affected set yields an empty, valid preview. Otherwise the
    /// planned ids are checked against existing attributes and against each
    /// other; a clash marks the preview invalid with a message naming the
    /// conflicting id.
    pub async fn preview_change(
        conn: &mut SqliteConnection,
        request: &ChangeRequest,
        strategy: RemapStrategy,
    ) -> Result<ChangePreview, sqlx::Error> {
        let preview = ChangePreview::empty(request);

        let attributes = match request.kind() {
            ChangeKind::NoOp => return Ok(preview),
            ChangeKind::CategoryRename => {
                DependencyRepo::find_attributes_by_category(&mut *conn, &request.old_category)
                    .await?
            }
            ChangeKind::AttributeRename => {
                DependencyRepo::find_attribute_by_id(&mut *conn, &request.old_id)
                    .await?
                    .into_iter()
                    .collect()
            }
        };

        if attributes.is_empty() {
            return Ok(preview);
        }

        let ids: Vec<String> = attributes.iter().map(|a| a.id.clone()).collect();
        let attribute_sets = DependencyRepo::find_referencing_attribute_sets(&mut *conn, &ids).await?;
        let value_count = DependencyRepo::count_attribute_values(&mut *conn, &ids).await?;
        let remaps = plan_remap(request, ids.iter().map(String::as_str), strategy);

        let preview = preview.with_impact(attributes, attribute_sets, value_count, remaps);

        if let Err(message) = request.validate_target() {
            return Ok(preview.invalid(message));
        }

        let existing =
            DependencyRepo::find_existing_attribute_ids(&mut *conn, &target_ids(preview.remaps()))
                .await?;

        Ok(match detect_collision(preview.remaps(), &existing) {
            Some(collision) => {
                tracing::debug!(conflict = collision.conflicting_id(), "Rename blocked by collision");
                preview.invalid(collision.message())
            }
            None => preview,
        })
    }

    /// Compute the impact of renaming attribute set `old_id` to `new_id`.
    ///
    /// A missing set yields an empty, valid preview.
    pub async fn preview_set_rename(
        conn: &mut SqliteConnection,
        old_id: &str,
        new_id: &str,
    ) -> Result<SetRenamePreview, sqlx::Error> {
        let preview = SetRenamePreview::new(old_id, new_id);

        let Some(attribute_set) = DependencyRepo::find_attribute_set_by_id(&mut *conn, old_id).await?
        else {
            return Ok(preview);
        };

        let value_count = DependencyRepo::count_set_values(&mut *conn, old_id).await?;
        let preview = preview.with_impact(attribute_set, value_count);

        if old_id == new_id {
            return Ok(preview);
        }
        if let Err(message) = validate_identifier("Attribute set id", new_id) {
            return Ok(preview.invalid(message));
        }
        if DependencyRepo::find_attribute_set_by_id(&mut *conn, new_id)
            .await?
            .is_some()
        {
            return Ok(preview.invalid(format!(
                "Cannot rename attribute set '{old_id}' to '{new_id}': \
                 an attribute set with id '{new_id}' already exists"
            )));
        }

        Ok(preview)
    }
}
