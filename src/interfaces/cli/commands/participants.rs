//! Learner progress report

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::AppServices;

pub async fn participants_report(
    services: &AppServices,
    csv: Option<String>,
) -> Result<(), CliError> {
    if let Some(path) = csv {
        let data = services.participants.export_csv().await?;
        std::fs::write(&path, data)
            .map_err(|e| CliError::CommandError(format!("Failed to write {}: {}", path, e)))?;
        println!("{} Participants written to {}", "✓".bold().green(), path.blue());
        return Ok(());
    }

    let rows = services.participants.rows().await?;
    if rows.is_empty() {
        println!("{} No participants yet", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Participants:".bold().green());
    for row in &rows {
        let progress = format!("{:>5.1}%", row.progress);
        let progress = if row.completed == row.total {
            progress.green()
        } else {
            progress.yellow()
        };
        println!(
            "  {} {} {} {}/{} {}",
            row.email.cyan(),
            row.name,
            progress,
            row.completed,
            row.total,
            row.status_label.dimmed()
        );
    }
    Ok(())
}
