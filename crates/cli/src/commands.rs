//! Subcommand handlers. Each one drives the catalog facade and prints the
//! result; confirmation prompts are skipped with `--yes`.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use attrdb_core::change::ChangeRequest;
use attrdb_core::error::CoreError;
use attrdb_core::identity::{validate_identifier, AttributeKey};
use attrdb_core::values::{is_within_bounds, validate_bounds, DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE};
use attrdb_db::models::attribute::CreateAttribute;
use attrdb_db::models::attribute_set::CreateAttributeSet;
use attrdb_db::models::attribute_value::CreateAttributeValue;
use attrdb_db::models::change_preview::ChangePreview;
use attrdb_db::repositories::{AttributeRepo, AttributeSetRepo, AttributeValueRepo, SummaryRepo};
use attrdb_db::AttributeCatalog;

use crate::args::{Commands, RenameArgs};
use crate::render;

/// Output options shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
}

pub async fn run(command: Commands, catalog: &AttributeCatalog, output: Output) -> anyhow::Result<()> {
    match command {
        Commands::Init => {
            catalog.health_check().await?;
            println!(
                "Database ready at {}",
                catalog.config().database_path.display()
            );
        }
        Commands::Preview(rename) => {
            let preview = preview_rename(catalog, &rename).await?;
            if output.json {
                println!("{}", render::json(&preview)?);
            } else {
                println!("{}", render::preview(&preview));
            }
        }
        Commands::Rename { rename, yes } => rename_cmd(catalog, &rename, yes, output).await?,
        Commands::RenameSet { old_id, new_id, yes } => {
            let preview = catalog.preview_set_rename(&old_id, &new_id).await?;
            if output.json {
                println!("{}", render::json(&preview)?);
            } else {
                println!("{}", render::set_preview(&preview));
            }
            if let Some(message) = preview.error_message() {
                bail!("{message}");
            }
            if !preview.has_changes() || !confirmed(yes, "Rename attribute set?")? {
                return Ok(());
            }
            let outcome = catalog.apply_set_rename(&preview).await?;
            println!("{}", render::change_outcome(&outcome));
        }
        Commands::DeleteCategory { category, yes } => {
            let ids: Vec<String> = AttributeRepo::list_by_category(catalog.pool(), &category)
                .await?
                .into_iter()
                .map(|a| a.id)
                .collect();
            if ids.is_empty() {
                println!("Category '{category}' has no attributes");
                return Ok(());
            }
            show_usage(catalog, &ids).await?;
            if confirmed(yes, &format!("Delete category '{category}'?"))? {
                let outcome = catalog.delete_category(&category).await?;
                println!("{}", render::delete_outcome(&outcome));
            }
        }
        Commands::DeleteAttribute { id, yes } => {
            show_usage(catalog, std::slice::from_ref(&id)).await?;
            if confirmed(yes, &format!("Delete attribute '{id}'?"))? {
                let outcome = catalog.delete_attribute(&id).await?;
                println!("{}", render::delete_outcome(&outcome));
            }
        }
        Commands::DeleteSet { id, yes } => {
            let values = AttributeValueRepo::list_by_set(catalog.pool(), &id).await?;
            println!("Attribute set '{id}' holds {} value(s)", values.len());
            if confirmed(yes, &format!("Delete attribute set '{id}'?"))? {
                let outcome = catalog.delete_attribute_set(&id).await?;
                println!("{}", render::delete_outcome(&outcome));
            }
        }
        Commands::Usage { ids } => {
            if output.json {
                let usage = SummaryRepo::attribute_usage(catalog.pool(), None).await?;
                let selected: Vec<_> = usage
                    .into_iter()
                    .filter(|u| ids.contains(&u.attribute_id))
                    .collect();
                println!("{}", render::json(&selected)?);
            } else {
                show_usage(catalog, &ids).await?;
            }
        }
        Commands::Categories => {
            let categories = AttributeRepo::list_categories(catalog.pool()).await?;
            if output.json {
                println!("{}", render::json(&categories)?);
            } else {
                println!("{}", render::categories(&categories));
            }
        }
        Commands::Sets => {
            let summaries = SummaryRepo::attribute_set_summaries(catalog.pool()).await?;
            if output.json {
                println!("{}", render::json(&summaries)?);
            } else {
                println!("{}", render::sets(&summaries));
            }
        }
        Commands::AddAttribute {
            id,
            category,
            description,
        } => {
            validate_identifier("Attribute id", &id).map_err(CoreError::Validation)?;
            let Some(category) = category.or_else(|| AttributeKey::parse(&id).category) else {
                bail!("Attribute id '{id}' has no category prefix; pass --category");
            };
            validate_identifier("Category", &category).map_err(CoreError::Validation)?;
            let attribute = AttributeRepo::create(
                catalog.pool(),
                &CreateAttribute {
                    id,
                    category,
                    description,
                },
            )
            .await
            .context("Failed to create attribute")?;
            println!("Created attribute {} in {}", attribute.id, attribute.category);
        }
        Commands::AddSet {
            id,
            name,
            description,
        } => {
            validate_identifier("Attribute set id", &id).map_err(CoreError::Validation)?;
            let set = AttributeSetRepo::create(
                catalog.pool(),
                &CreateAttributeSet {
                    id,
                    name,
                    description,
                },
            )
            .await
            .context("Failed to create attribute set")?;
            println!("Created attribute set {} ({})", set.id, set.name);
        }
        Commands::Attach {
            set_id,
            attribute_id,
            base,
            min,
            max,
            comment,
        } => {
            validate_bounds(
                min.unwrap_or(DEFAULT_MIN_VALUE),
                max.unwrap_or(DEFAULT_MAX_VALUE),
            )?;
            let value = AttributeValueRepo::attach(
                catalog.pool(),
                &CreateAttributeValue {
                    attribute_set_id: set_id,
                    attribute_id: attribute_id.clone(),
                    base_value: base,
                    min_value: min,
                    max_value: max,
                    comment,
                },
            )
            .await
            .context("Failed to attach attribute")?
            .ok_or(CoreError::NotFound {
                entity: "attribute",
                id: attribute_id,
            })?;
            println!(
                "Attached {} to {} (base {})",
                value.attribute_id, value.attribute_set_id, value.base_value
            );
            if !is_within_bounds(value.base_value, value.min_value, value.max_value) {
                println!(
                    "Note: base {} lies outside [{}, {}]",
                    value.base_value, value.min_value, value.max_value
                );
            }
        }
    }
    Ok(())
}

/// Build the request for `rename` and preview it.
///
/// An attribute rename keeps the attribute's current category; an unknown
/// attribute id yields an empty preview.
async fn preview_rename(catalog: &AttributeCatalog, rename: &RenameArgs) -> anyhow::Result<ChangePreview> {
    let request = if rename.category {
        ChangeRequest::rename_category(&rename.old, &rename.new)
    } else {
        let category = AttributeRepo::find_by_id(catalog.pool(), &rename.old)
            .await?
            .map(|a| a.category)
            .unwrap_or_default();
        ChangeRequest::rename_attribute(&rename.old, &rename.new, category)
    };
    Ok(catalog.preview_rename(&request).await?)
}

async fn rename_cmd(
    catalog: &AttributeCatalog,
    rename: &RenameArgs,
    yes: bool,
    output: Output,
) -> anyhow::Result<()> {
    let preview = preview_rename(catalog, rename).await?;
    if output.json {
        println!("{}", render::json(&preview)?);
    } else {
        println!("{}", render::preview(&preview));
    }

    if let Some(message) = preview.error_message() {
        bail!("{message}");
    }
    if !preview.has_changes() || !confirmed(yes, "Apply this change?")? {
        return Ok(());
    }

    let outcome = catalog.apply_change(&preview).await?;
    println!("{}", render::change_outcome(&outcome));
    Ok(())
}

async fn show_usage(catalog: &AttributeCatalog, ids: &[String]) -> anyhow::Result<()> {
    let sets = catalog.get_referencing_attribute_sets(ids).await?;
    let value_count = catalog.get_attribute_value_count(ids).await?;
    println!("{}", render::usage(ids, &sets, value_count));
    Ok(())
}

/// Ask on stdin unless `yes` was given. Anything but `y`/`yes` declines.
fn confirmed(yes: bool, prompt: &str) -> io::Result<bool> {
    if yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let accepted = is_yes(&answer);
    if !accepted {
        println!("Cancelled");
    }
    Ok(accepted)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
