use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "attrdb")]
#[command(about = "Preview and apply identity changes in a game attribute database", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database file (overrides ATTRDB_DATABASE)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Print previews and reports as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Create the database (if missing) and apply migrations
    Init,

    /// Show what a rename would touch without changing anything
    Preview(RenameArgs),

    /// Preview a rename, confirm, then apply it
    #[command(alias = "mv")]
    Rename {
        #[command(flatten)]
        rename: RenameArgs,

        /// Apply without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Rename an attribute set, repointing all of its values
    RenameSet {
        old_id: String,
        new_id: String,

        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every attribute in a category and all values referencing them
    DeleteCategory {
        category: String,

        #[arg(short, long)]
        yes: bool,
    },

    /// Delete an attribute and all values referencing it
    DeleteAttribute {
        id: String,

        #[arg(short, long)]
        yes: bool,
    },

    /// Delete an attribute set and all of its values
    DeleteSet {
        id: String,

        #[arg(short, long)]
        yes: bool,
    },

    /// Show which attribute sets reference the given attributes
    Usage {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// List categories with their attribute counts
    Categories,

    /// List attribute sets with their attribute counts
    Sets,

    /// Create an attribute
    AddAttribute {
        id: String,

        /// Defaults to the id's prefix ("Ship" for "Ship.Armor")
        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Create an attribute set
    AddSet {
        id: String,

        #[arg(short, long)]
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Attach an attribute to a set with concrete values
    Attach {
        set_id: String,
        attribute_id: String,

        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        base: f64,

        #[arg(long, allow_negative_numbers = true)]
        min: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        max: Option<f64>,

        #[arg(long)]
        comment: Option<String>,
    },
}

/// Source and target of a rename.
///
/// Without `--category` the operands are attribute ids; with it they are
/// category names.
#[derive(Args, Debug, PartialEq)]
pub struct RenameArgs {
    pub old: String,
    pub new: String,

    /// Rename a whole category instead of one attribute
    #[arg(short, long)]
    pub category: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("attrdb").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parses_category_rename() {
        let cli = parse(&["rename", "--category", "Ship", "Vessel", "--yes"]);
        assert_eq!(
            cli.command,
            Commands::Rename {
                rename: RenameArgs {
                    old: "Ship".into(),
                    new: "Vessel".into(),
                    category: true,
                },
                yes: true,
            }
        );
    }

    #[test]
    fn parses_attribute_preview_with_global_flags() {
        let cli = parse(&["preview", "Gun.Damage", "Gun.DamageOutput", "--json", "-d", "game.db"]);
        assert!(cli.json);
        assert_eq!(cli.database, Some(PathBuf::from("game.db")));
        assert_eq!(
            cli.command,
            Commands::Preview(RenameArgs {
                old: "Gun.Damage".into(),
                new: "Gun.DamageOutput".into(),
                category: false,
            })
        );
    }

    #[test]
    fn rename_alias() {
        let cli = parse(&["mv", "A.X", "A.Y"]);
        assert!(matches!(cli.command, Commands::Rename { yes: false, .. }));
    }

    #[test]
    fn usage_requires_ids() {
        assert!(Cli::try_parse_from(["attrdb", "usage"]).is_err());
        let cli = parse(&["usage", "Ship.Armor", "Ship.Speed"]);
        assert_eq!(
            cli.command,
            Commands::Usage {
                ids: vec!["Ship.Armor".into(), "Ship.Speed".into()],
            }
        );
    }

    #[test]
    fn attach_accepts_negative_bounds() {
        let cli = parse(&["attach", "Frigate", "Ship.Armor", "--base", "10", "--min", "-5"]);
        assert_eq!(
            cli.command,
            Commands::Attach {
                set_id: "Frigate".into(),
                attribute_id: "Ship.Armor".into(),
                base: 10.0,
                min: Some(-5.0),
                max: None,
                comment: None,
            }
        );
    }

    #[test]
    fn delete_commands_default_to_confirmation() {
        let cli = parse(&["delete-category", "Ship"]);
        assert_eq!(
            cli.command,
            Commands::DeleteCategory {
                category: "Ship".into(),
                yes: false,
            }
        );
    }

    #[test]
    fn add_attribute_category_is_optional() {
        let cli = parse(&["add-attribute", "Ship.Armor"]);
        assert_eq!(
            cli.command,
            Commands::AddAttribute {
                id: "Ship.Armor".into(),
                category: None,
                description: None,
            }
        );
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["attrdb"]).is_err());
    }
}
