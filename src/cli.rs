//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for kopistart using clap's derive macros.

use clap::{Parser, Subcommand, ValueEnum};

use crate::services::ImportMode;
use crate::storage::{CatalogKind, Role};

/// KopiStart - coffee education service
#[derive(Parser)]
#[command(name = "kopistart")]
#[command(version)]
#[command(about = "Coffee catalog, glossary and barista course service", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage catalog collections (beans, techniques, tools, glossary)
    Catalog {
        #[command(subcommand)]
        action: CatalogCommands,
    },

    /// Inspect course content
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Show learner progress
    Participants {
        /// Write CSV to this file instead of printing a table
        #[arg(long)]
        csv: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create an account
    Add {
        email: String,

        /// Display name (defaults to the part before '@')
        #[arg(long)]
        name: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Create with role admin
        #[arg(long)]
        admin: bool,
    },

    /// List accounts
    List,

    /// Change an account's role
    SetRole {
        email: String,

        #[arg(value_parser = parse_role)]
        role: Role,
    },

    /// Delete an account and its course progress
    Remove { email: String },
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List entries of a collection
    List {
        #[arg(value_parser = parse_kind)]
        kind: CatalogKind,

        /// Case-insensitive search
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Export a collection as JSON
    Export {
        #[arg(value_parser = parse_kind)]
        kind: CatalogKind,

        /// Output file path (default: stdout)
        file_path: Option<String>,
    },

    /// Import a collection from JSON
    Import {
        #[arg(value_parser = parse_kind)]
        kind: CatalogKind,

        file_path: String,

        /// How to handle ids that already exist
        #[arg(long, value_enum, default_value_t = CliImportMode::Skip)]
        mode: CliImportMode,
    },

    /// Replace a collection with the built-in seed data
    Reset {
        #[arg(value_parser = parse_kind)]
        kind: CatalogKind,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Seed every empty collection
    Seed,
}

#[derive(Subcommand)]
pub enum CourseCommands {
    /// Print chapters and materials
    Outline,

    /// Validate a course-structure JSON file
    Validate { file_path: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate a sample config file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliImportMode {
    Skip,
    Overwrite,
    Error,
}

impl From<CliImportMode> for ImportMode {
    fn from(mode: CliImportMode) -> Self {
        match mode {
            CliImportMode::Skip => ImportMode::Skip,
            CliImportMode::Overwrite => ImportMode::Overwrite,
            CliImportMode::Error => ImportMode::Error,
        }
    }
}

fn parse_kind(s: &str) -> Result<CatalogKind, String> {
    s.parse()
        .map_err(|_| format!("unknown collection '{}' (beans, techniques, tools, glossary)", s))
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse()
        .map_err(|_| format!("unknown role '{}' (user, admin)", s))
}
