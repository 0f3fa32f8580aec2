//! Course orchestration: progress lookup, material access, quiz submission and
//! certificates for one learner.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::course::progression::{self, MaterialState, Progress, ProgressionPolicy};
use crate::course::quiz::{self, QuizQuestionView};
use crate::course::{Certificate, ChapterProgress, CourseContent, CourseProgress, MaterialRef};
use crate::errors::{KopiError, Result};
use crate::storage::{MaterialCompletion, SeaOrmStorage, User};

#[derive(Debug, Clone, Deserialize)]
pub struct QuizSubmission {
    /// One entry per question, in order; `null` for unanswered
    pub answers: Vec<Option<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialLink {
    pub chapter_id: String,
    pub material_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialView {
    pub chapter_id: String,
    pub chapter_title: String,
    pub id: String,
    pub title: String,
    pub content: String,
    pub position: usize,
    pub state: MaterialState,
    pub question_count: usize,
    pub best_score: Option<f64>,
    pub next: Option<MaterialLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub chapter_id: String,
    pub material_id: String,
    pub title: String,
    pub passing_score: f64,
    pub questions: Vec<QuizQuestionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizOutcome {
    pub material_id: String,
    pub correct: usize,
    pub total: usize,
    pub score: f64,
    pub passing_score: f64,
    pub passed: bool,
    /// Material state after this attempt
    pub state: MaterialState,
    pub newly_completed: bool,
    pub best_score: Option<f64>,
    /// Material unlocked by passing, if any
    pub next: Option<MaterialLink>,
    pub course_completed: bool,
}

#[derive(Clone)]
pub struct CourseService {
    storage: Arc<SeaOrmStorage>,
    content: Arc<CourseContent>,
    passing_score: f64,
    policy: ProgressionPolicy,
}

impl CourseService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        content: Arc<CourseContent>,
        passing_score: f64,
        policy: ProgressionPolicy,
    ) -> Self {
        Self {
            storage,
            content,
            passing_score,
            policy,
        }
    }

    pub fn content(&self) -> &CourseContent {
        &self.content
    }

    pub fn passing_score(&self) -> f64 {
        self.passing_score
    }

    async fn load_progress(&self, user_id: &str) -> Result<(Progress, Vec<MaterialCompletion>)> {
        let completions = self.storage.list_completions(user_id).await?;
        let progress = completions.iter().map(|c| c.material_id.clone()).collect();
        Ok((progress, completions))
    }

    pub async fn progress(&self, user_id: &str) -> Result<Progress> {
        Ok(self.load_progress(user_id).await?.0)
    }

    pub async fn overview(&self, user: &User) -> Result<CourseProgress> {
        let progress = self.progress(&user.id).await?;
        Ok(progression::course_progress(
            &self.content,
            &progress,
            self.policy,
        ))
    }

    pub async fn chapter(&self, user: &User, chapter_id: &str) -> Result<ChapterProgress> {
        let (index, _) = self
            .content
            .chapter(chapter_id)
            .ok_or_else(|| KopiError::not_found(format!("Bab '{}' tidak ditemukan", chapter_id)))?;
        let progress = self.progress(&user.id).await?;
        progression::chapter_view(&self.content, index, &progress, self.policy)
            .ok_or_else(|| KopiError::not_found(format!("Bab '{}' tidak ditemukan", chapter_id)))
    }

    fn locate(&self, chapter_id: &str, material_id: &str) -> Result<MaterialRef<'_>> {
        self.content.material(chapter_id, material_id).ok_or_else(|| {
            KopiError::not_found(format!(
                "Materi '{}' tidak ditemukan di bab '{}'",
                material_id, chapter_id
            ))
        })
    }

    fn state_of(&self, found: &MaterialRef<'_>, progress: &Progress) -> MaterialState {
        progression::effective_material_state(
            &self.content,
            found.chapter_index,
            found.index,
            progress,
            self.policy,
        )
    }

    fn ensure_unlocked(&self, state: MaterialState, material_id: &str) -> Result<()> {
        if state == MaterialState::Locked {
            return Err(KopiError::material_locked(format!(
                "Materi '{}' masih terkunci. Selesaikan materi sebelumnya terlebih dahulu.",
                material_id
            )));
        }
        Ok(())
    }

    fn next_link(&self, material_id: &str) -> Option<MaterialLink> {
        progression::next_material(&self.content, material_id).map(|(chapter, material)| {
            MaterialLink {
                chapter_id: chapter.id.clone(),
                material_id: material.id.clone(),
                title: material.title.clone(),
            }
        })
    }

    pub async fn material(
        &self,
        user: &User,
        chapter_id: &str,
        material_id: &str,
    ) -> Result<MaterialView> {
        let found = self.locate(chapter_id, material_id)?;
        let (progress, completions) = self.load_progress(&user.id).await?;
        let state = self.state_of(&found, &progress);
        self.ensure_unlocked(state, material_id)?;

        Ok(MaterialView {
            chapter_id: found.chapter.id.clone(),
            chapter_title: found.chapter.title.clone(),
            id: found.material.id.clone(),
            title: found.material.title.clone(),
            content: found.material.content.clone(),
            position: found.index + 1,
            state,
            question_count: found.material.quiz.len(),
            best_score: best_score(&completions, material_id),
            next: self.next_link(material_id),
        })
    }

    pub async fn quiz(&self, user: &User, chapter_id: &str, material_id: &str) -> Result<QuizView> {
        let found = self.locate(chapter_id, material_id)?;
        let progress = self.progress(&user.id).await?;
        self.ensure_unlocked(self.state_of(&found, &progress), material_id)?;

        Ok(QuizView {
            chapter_id: found.chapter.id.clone(),
            material_id: found.material.id.clone(),
            title: found.material.title.clone(),
            passing_score: self.passing_score,
            questions: quiz::questions_for_learner(found.material),
        })
    }

    /// Scores an attempt. Passing completes the material; failing leaves
    /// progress untouched.
    pub async fn submit_quiz(
        &self,
        user: &User,
        chapter_id: &str,
        material_id: &str,
        submission: QuizSubmission,
    ) -> Result<QuizOutcome> {
        let found = self.locate(chapter_id, material_id)?;
        let (mut progress, completions) = self.load_progress(&user.id).await?;
        let state = self.state_of(&found, &progress);
        self.ensure_unlocked(state, material_id)?;

        let score = quiz::score(&found.material.quiz, &submission.answers)?;
        let passed = score.passed(self.passing_score);
        let mut best = best_score(&completions, material_id);
        let mut newly_completed = false;

        if passed {
            let record = self
                .storage
                .record_completion(&user.id, material_id, score.score, Utc::now())
                .await?;
            newly_completed = record.newly_completed;
            best = Some(record.completion.score);
            progress.mark_completed(material_id);
        }

        info!(
            "Quiz submitted: user={} material={} score={:.1} passed={}",
            user.id, material_id, score.score, passed
        );

        Ok(QuizOutcome {
            material_id: material_id.to_string(),
            correct: score.correct,
            total: score.total,
            score: score.score,
            passing_score: self.passing_score,
            passed,
            state: self.state_of(&found, &progress),
            newly_completed,
            best_score: best,
            next: if passed {
                self.next_link(material_id)
            } else {
                None
            },
            course_completed: progression::is_course_completed(&self.content, &progress),
        })
    }

    pub async fn certificate(&self, user: &User) -> Result<Certificate> {
        let (progress, completions) = self.load_progress(&user.id).await?;
        if !progression::is_course_completed(&self.content, &progress) {
            return Err(KopiError::certificate_locked(
                "Selesaikan semua materi untuk membuka sertifikat.",
            ));
        }

        let issued_at = latest_completion(&self.content, &completions).unwrap_or_else(Utc::now);
        Ok(Certificate::new(user.name.clone(), issued_at))
    }

    pub async fn reset_progress(&self, user: &User) -> Result<u64> {
        let removed = self.storage.reset_progress(&user.id).await?;
        info!("Progress reset for {} ({} completions)", user.id, removed);
        Ok(removed)
    }
}

fn best_score(completions: &[MaterialCompletion], material_id: &str) -> Option<f64> {
    completions
        .iter()
        .find(|c| c.material_id == material_id)
        .map(|c| c.score)
}

/// Latest completion among materials still present in the course.
pub fn latest_completion(
    content: &CourseContent,
    completions: &[MaterialCompletion],
) -> Option<DateTime<Utc>> {
    completions
        .iter()
        .filter(|c| content.contains_material(&c.material_id))
        .map(|c| c.completed_at)
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn completion(material: &str, day: u32) -> MaterialCompletion {
        MaterialCompletion {
            user_id: "user-1".into(),
            material_id: material.into(),
            score: 100.0,
            completed_at: Utc.with_ymd_and_hms(2026, 10, day, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_latest_completion_ignores_removed_materials() {
        let content = crate::course::content::test_support::sample_course();
        let completions = vec![completion("m1", 3), completion("m5", 9), completion("gone", 20)];
        let latest = latest_completion(&content, &completions).unwrap();
        assert_eq!(latest, Utc.with_ymd_and_hms(2026, 10, 9, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_quiz_submission_accepts_nulls() {
        let sub: QuizSubmission = serde_json::from_str(r#"{"answers":["A",null,"B"]}"#).unwrap();
        assert_eq!(sub.answers.len(), 3);
        assert!(sub.answers[1].is_none());
    }
}
