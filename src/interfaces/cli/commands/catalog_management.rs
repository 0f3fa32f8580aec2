//! Catalog commands: list, export, import, reset, seed

use colored::Colorize;

use super::helpers::{confirm, truncate, with_catalog};
use crate::interfaces::cli::CliError;
use crate::services::{AppServices, CatalogRegistry, ImportMode, ImportResult};
use crate::storage::CatalogKind;

async fn list_kind<T: CatalogRegistry>(services: &AppServices, search: Option<&str>) -> usize {
    let items = T::service(services).search(search).await;
    for item in &items {
        let detail = item
            .search_fields()
            .into_iter()
            .skip(1)
            .find(|f| !f.is_empty())
            .unwrap_or_default();
        println!(
            "  {} {} {}",
            item.id().cyan(),
            item.title().bold(),
            truncate(detail, 60).dimmed()
        );
    }
    items.len()
}

pub async fn catalog_list(
    services: &AppServices,
    kind: CatalogKind,
    search: Option<String>,
) -> Result<(), CliError> {
    println!("{}", format!("{} entries:", kind).bold().green());
    let count = with_catalog!(kind, T => list_kind::<T>(services, search.as_deref()).await);

    if count == 0 {
        println!("{} No entries found", "ℹ".bold().blue());
    } else {
        println!();
        println!(
            "{} Total {} entries",
            "ℹ".bold().blue(),
            count.to_string().green()
        );
    }
    Ok(())
}

pub async fn catalog_export(
    services: &AppServices,
    kind: CatalogKind,
    file_path: Option<String>,
) -> Result<(), CliError> {
    let json = with_catalog!(kind, T => T::service(services).export_pretty().await)?;

    match file_path {
        Some(path) => {
            std::fs::write(&path, json)
                .map_err(|e| CliError::CommandError(format!("Failed to write {}: {}", path, e)))?;
            println!(
                "{} Exported {} to {}",
                "✓".bold().green(),
                kind,
                path.blue()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn print_import_result(result: &ImportResult) {
    println!(
        "{} Imported {}, skipped {}, failed {}",
        "✓".bold().green(),
        result.success.to_string().green(),
        result.skipped.to_string().yellow(),
        result.failed.to_string().red()
    );
    for err in &result.errors {
        println!(
            "  {} #{} {} {}",
            "✗".red(),
            err.index,
            err.id.as_deref().unwrap_or("-").cyan(),
            err.message
        );
    }
}

pub async fn catalog_import(
    services: &AppServices,
    kind: CatalogKind,
    file_path: String,
    mode: ImportMode,
) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(&file_path)
        .map_err(|e| CliError::CommandError(format!("Failed to read {}: {}", file_path, e)))?;

    let result = with_catalog!(kind, T => T::service(services).import_str(&raw, mode).await)?;
    print_import_result(&result);
    Ok(())
}

pub async fn catalog_reset(
    services: &AppServices,
    kind: CatalogKind,
    yes: bool,
) -> Result<(), CliError> {
    if !yes && !confirm(&format!("Replace all {} with the built-in data?", kind))? {
        println!("{}", "Aborted.".red());
        return Ok(());
    }

    let restored = with_catalog!(kind, T => T::service(services).reset_to_seed().await)?;
    println!(
        "{} {} reset, {} entries restored",
        "✓".bold().green(),
        kind,
        restored
    );
    Ok(())
}

pub async fn catalog_seed(services: &AppServices) -> Result<(), CliError> {
    let seeded = services.seed_empty_collections().await?;
    if seeded == 0 {
        println!("{} All collections already have data", "ℹ".bold().blue());
    } else {
        println!("{} Seeded {} entries", "✓".bold().green(), seeded);
    }
    Ok(())
}
