//! CLI interface module
//!
//! One-shot management commands that work directly against storage.

pub mod commands;

use std::fmt;

use crate::cli::{CatalogCommands, Commands, ConfigCommands, CourseCommands, UserCommands};
use crate::runtime::lifetime::startup::build_services;
use commands::{
    add_user, catalog_export, catalog_import, catalog_list, catalog_reset, catalog_seed,
    config_generate, course_outline, course_validate, list_users, participants_report,
    remove_user, set_user_role,
};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::KopiError> for CliError {
    fn from(err: crate::errors::KopiError) -> Self {
        use crate::errors::KopiError;
        match err {
            KopiError::Serialization(_) | KopiError::InvalidContent(_) => {
                CliError::ParseError(err.message().to_string())
            }
            KopiError::DatabaseConfig(_)
            | KopiError::DatabaseConnection(_)
            | KopiError::DatabaseOperation(_) => CliError::StorageError(err.message().to_string()),
            _ => CliError::CommandError(err.message().to_string()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    let config = crate::config::get_config();

    // Commands that need no storage
    match &cmd {
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => return config_generate(output_path.clone(), *force),
        Commands::Course {
            action: CourseCommands::Validate { file_path },
        } => return course_validate(file_path),
        Commands::Course {
            action: CourseCommands::Outline,
        } => return course_outline(config.course.content_path.as_deref()),
        Commands::Serve => {
            return Err(CliError::CommandError(
                "serve is not a management command".to_string(),
            ));
        }
        _ => {}
    }

    let services = build_services(&config)
        .await
        .map_err(|e| CliError::StorageError(format!("{:#}", e)))?;

    match cmd {
        Commands::User { action } => match action {
            UserCommands::Add {
                email,
                name,
                password,
                admin,
            } => add_user(&services, email, name, password, admin).await,
            UserCommands::List => list_users(&services).await,
            UserCommands::SetRole { email, role } => set_user_role(&services, email, role).await,
            UserCommands::Remove { email } => remove_user(&services, email).await,
        },

        Commands::Catalog { action } => match action {
            CatalogCommands::List { kind, search } => catalog_list(&services, kind, search).await,
            CatalogCommands::Export { kind, file_path } => {
                catalog_export(&services, kind, file_path).await
            }
            CatalogCommands::Import {
                kind,
                file_path,
                mode,
            } => catalog_import(&services, kind, file_path, mode.into()).await,
            CatalogCommands::Reset { kind, yes } => catalog_reset(&services, kind, yes).await,
            CatalogCommands::Seed => catalog_seed(&services).await,
        },

        Commands::Participants { csv } => participants_report(&services, csv).await,

        Commands::Serve | Commands::Config { .. } | Commands::Course { .. } => {
            unreachable!("handled before storage is opened")
        }
    }
}
