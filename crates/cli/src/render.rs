//! Plain-text rendering for command output.

use std::fmt::Write;

use attrdb_db::engine::{ChangeOutcome, DeleteOutcome};
use attrdb_db::models::attribute::CategorySummary;
use attrdb_db::models::attribute_set::AttributeSet;
use attrdb_db::models::change_preview::{ChangePreview, SetRenamePreview};
use attrdb_db::models::summary::AttributeSetSummary;
use serde::Serialize;

pub fn json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn preview(preview: &ChangePreview) -> String {
    let mut out = preview.summary();
    for remap in preview.remaps() {
        if remap.keeps_id() {
            let _ = write!(out, "\n  {} (category only)", remap.old_id);
        } else {
            let _ = write!(out, "\n  {} -> {}", remap.old_id, remap.new_id);
        }
    }
    if !preview.affected_attribute_sets().is_empty() {
        out.push_str("\nReferenced by:");
        out.push_str(&set_lines(preview.affected_attribute_sets()));
    }
    out
}

pub fn set_preview(preview: &SetRenamePreview) -> String {
    preview.summary()
}

pub fn change_outcome(outcome: &ChangeOutcome) -> String {
    format!(
        "Applied: {} renamed, {} value(s) repointed",
        outcome.renamed, outcome.values_repointed
    )
}

pub fn delete_outcome(outcome: &DeleteOutcome) -> String {
    format!(
        "Deleted: {} attribute(s), {} attribute set(s), {} value(s)",
        outcome.attributes_deleted, outcome.attribute_sets_deleted, outcome.values_deleted
    )
}

/// Impact of removing `ids`, shown before a delete and by `usage`.
pub fn usage(ids: &[String], sets: &[AttributeSet], value_count: i64) -> String {
    let mut out = format!(
        "{} attribute(s) referenced by {} attribute set(s) with {} value(s)",
        ids.len(),
        sets.len(),
        value_count
    );
    out.push_str(&set_lines(sets));
    out
}

pub fn categories(categories: &[CategorySummary]) -> String {
    if categories.is_empty() {
        return "No categories".to_string();
    }
    let width = categories.iter().map(|c| c.category.len()).max().unwrap_or(0);
    categories
        .iter()
        .map(|c| format!("{:<width$}  {}", c.category, c.attribute_count))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn sets(summaries: &[AttributeSetSummary]) -> String {
    if summaries.is_empty() {
        return "No attribute sets".to_string();
    }
    let width = summaries
        .iter()
        .map(|s| s.attribute_set_id.len())
        .max()
        .unwrap_or(0);
    summaries
        .iter()
        .map(|s| {
            format!(
                "{:<width$}  {}  ({} attribute(s), {} categor{})",
                s.attribute_set_id,
                s.name,
                s.attribute_count,
                s.category_count,
                if s.category_count == 1 { "y" } else { "ies" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn set_lines(sets: &[AttributeSet]) -> String {
    sets.iter()
        .map(|s| format!("\n  {} ({})", s.id, s.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_aligned() {
        let rendered = categories(&[
            CategorySummary {
                category: "Gun".into(),
                attribute_count: 1,
            },
            CategorySummary {
                category: "Vessel".into(),
                attribute_count: 12,
            },
        ]);
        assert_eq!(rendered, "Gun     1\nVessel  12");
    }

    #[test]
    fn empty_listings() {
        assert_eq!(categories(&[]), "No categories");
        assert_eq!(sets(&[]), "No attribute sets");
    }

    #[test]
    fn usage_lists_sets() {
        let rendered = usage(
            &["Ship.Armor".to_string()],
            &[AttributeSet {
                id: "Frigate".into(),
                name: "Light Frigate".into(),
                description: None,
            }],
            2,
        );
        assert_eq!(
            rendered,
            "1 attribute(s) referenced by 1 attribute set(s) with 2 value(s)\n  Frigate (Light Frigate)"
        );
    }

    #[test]
    fn set_summary_pluralizes_categories() {
        let rendered = sets(&[AttributeSetSummary {
            attribute_set_id: "Frigate".into(),
            name: "Frigate".into(),
            attribute_count: 3,
            category_count: 1,
        }]);
        assert_eq!(rendered, "Frigate  Frigate  (3 attribute(s), 1 category)");
    }

    #[test]
    fn outcomes() {
        assert_eq!(
            change_outcome(&ChangeOutcome {
                renamed: 2,
                values_repointed: 3,
            }),
            "Applied: 2 renamed, 3 value(s) repointed"
        );
        assert_eq!(
            delete_outcome(&DeleteOutcome::default()),
            "Deleted: 0 attribute(s), 0 attribute set(s), 0 value(s)"
        );
    }
}
