//! Learner overview for admins.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::course::progression::{self, Progress};
use crate::course::{CourseContent, format_indonesian_date};
use crate::errors::{KopiError, Result};
use crate::storage::{Role, SeaOrmStorage, User};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParticipantStatus {
    Completed,
    InChapter {
        chapter_id: String,
        chapter_title: String,
        /// 1-based chapter number
        position: usize,
    },
}

impl ParticipantStatus {
    /// Label shown in the admin table ("Selesai" / "Bab 2").
    pub fn label(&self) -> String {
        match self {
            ParticipantStatus::Completed => "Selesai".to_string(),
            ParticipantStatus::InChapter { position, .. } => format!("Bab {}", position),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub completed: usize,
    pub total: usize,
    pub progress: f64,
    pub status: ParticipantStatus,
    pub status_label: String,
    pub joined_at: DateTime<Utc>,
}

/// CSV shape of a participant row
#[derive(Debug, Serialize)]
struct ParticipantCsvRow<'a> {
    id: &'a str,
    name: &'a str,
    email: &'a str,
    completed: usize,
    total: usize,
    progress: String,
    status: &'a str,
    joined_on: String,
}

#[derive(Clone)]
pub struct ParticipantService {
    storage: Arc<SeaOrmStorage>,
    content: Arc<CourseContent>,
}

impl ParticipantService {
    pub fn new(storage: Arc<SeaOrmStorage>, content: Arc<CourseContent>) -> Self {
        Self { storage, content }
    }

    /// One row per learner (role `user`), in registration order.
    pub async fn rows(&self) -> Result<Vec<ParticipantRow>> {
        let users = self.storage.list_users().await?;
        let mut by_user: HashMap<String, Progress> = HashMap::new();
        for c in self.storage.list_all_completions().await? {
            by_user.entry(c.user_id).or_default().mark_completed(c.material_id);
        }

        let empty = Progress::new();
        Ok(users
            .into_iter()
            .filter(|u| u.role == Role::User)
            .map(|u| {
                let progress = by_user.get(&u.id).unwrap_or(&empty);
                build_row(&self.content, u, progress)
            })
            .collect())
    }

    pub async fn export_csv(&self) -> Result<String> {
        rows_to_csv(&self.rows().await?)
    }
}

fn build_row(content: &CourseContent, user: User, progress: &Progress) -> ParticipantRow {
    let total = content.total_materials();
    let completed = progress.completed_in(content);
    let status = match progression::current_chapter(content, progress) {
        Some((index, chapter)) if !progression::is_course_completed(content, progress) => {
            ParticipantStatus::InChapter {
                chapter_id: chapter.id.clone(),
                chapter_title: chapter.title.clone(),
                position: index + 1,
            }
        }
        _ => ParticipantStatus::Completed,
    };

    ParticipantRow {
        id: user.id,
        name: user.name,
        email: user.email,
        completed,
        total,
        progress: progression::percentage(completed, total),
        status_label: status.label(),
        status,
        joined_at: user.created_at,
    }
}

pub fn rows_to_csv(rows: &[ParticipantRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(ParticipantCsvRow {
                id: &row.id,
                name: &row.name,
                email: &row.email,
                completed: row.completed,
                total: row.total,
                progress: format!("{:.0}", row.progress),
                status: &row.status_label,
                joined_on: format_indonesian_date(row.joined_at),
            })
            .map_err(|e| KopiError::serialization(format!("CSV: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| KopiError::serialization(format!("CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| KopiError::serialization(format!("CSV: {}", e)))
}
