//! Shared CLI helpers

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::interfaces::cli::CliError;

/// Runs `$body` with `$T` bound to the item type of a `CatalogKind`.
macro_rules! with_catalog {
    ($kind:expr, $T:ident => $body:expr) => {
        match $kind {
            $crate::storage::CatalogKind::Beans => {
                type $T = $crate::storage::Bean;
                $body
            }
            $crate::storage::CatalogKind::Techniques => {
                type $T = $crate::storage::Technique;
                $body
            }
            $crate::storage::CatalogKind::Tools => {
                type $T = $crate::storage::Tool;
                $body
            }
            $crate::storage::CatalogKind::Glossary => {
                type $T = $crate::storage::GlossaryTerm;
                $body
            }
        }
    };
}

pub(crate) use with_catalog;

/// 交互确认，默认否
pub fn confirm(prompt: &str) -> Result<bool, CliError> {
    print!("{} {}", prompt.yellow(), "[y/N] ".yellow());
    io::stdout()
        .flush()
        .map_err(|e| CliError::CommandError(e.to_string()))?;

    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .map_err(|e| CliError::CommandError(e.to_string()))?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// 截断过长文本，用于表格输出
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}
