//! Course service tests
//!
//! Material locking, quiz scoring, certificate unlock and the participant
//! report against the built-in course.

use std::sync::{Arc, Once};

use kopistart::config::{CourseConfig, DatabaseConfig, init_config};
use kopistart::course::progression::{ChapterState, MaterialState};
use kopistart::errors::KopiError;
use kopistart::seed;
use kopistart::services::{AppServices, ParticipantStatus, QuizSubmission};
use kopistart::storage::{Role, StorageFactory, User};
use tempfile::TempDir;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_services_with(course_config: CourseConfig) -> (AppServices, TempDir) {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("course.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..Default::default()
    };

    let storage = StorageFactory::create_with(&config)
        .await
        .expect("Failed to create storage");
    let content = seed::course_content().expect("built-in course should load");
    let services = AppServices::new(storage, Arc::new(content), &course_config);

    (services, temp_dir)
}

async fn create_services() -> (AppServices, TempDir) {
    create_services_with(CourseConfig::default()).await
}

async fn learner(services: &AppServices, email: &str) -> User {
    services
        .users
        .create_user("Sari Barista", email, "rahasia123", Role::User)
        .await
        .expect("Failed to create learner")
}

fn correct_answers(services: &AppServices, chapter: &str, material: &str) -> QuizSubmission {
    let found = services
        .course
        .content()
        .material(chapter, material)
        .expect("material should exist");
    QuizSubmission {
        answers: found
            .material
            .quiz
            .iter()
            .map(|q| Some(q.answer.clone()))
            .collect(),
    }
}

fn wrong_answers(services: &AppServices, chapter: &str, material: &str) -> QuizSubmission {
    let found = services
        .course
        .content()
        .material(chapter, material)
        .expect("material should exist");
    QuizSubmission {
        answers: vec![None; found.material.quiz.len()],
    }
}

/// Passes every material of the course in order.
async fn complete_course(services: &AppServices, user: &User) {
    let outline: Vec<(String, String)> = services
        .course
        .content()
        .chapters
        .iter()
        .flat_map(|c| c.materials.iter().map(move |m| (c.id.clone(), m.id.clone())))
        .collect();

    for (chapter, material) in outline {
        let outcome = services
            .course
            .submit_quiz(
                user,
                &chapter,
                &material,
                correct_answers(services, &chapter, &material),
            )
            .await
            .unwrap();
        assert!(outcome.passed);
    }
}

#[cfg(test)]
mod progression_tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_learner_overview() {
        let (services, _dir) = create_services().await;
        let user = learner(&services, "sari@kopi.id").await;

        let overview = services.course.overview(&user).await.unwrap();
        assert_eq!(overview.completed, 0);
        assert_eq!(overview.total, services.course.content().total_materials());
        assert!(!overview.certificate_unlocked);
        assert_eq!(overview.current_chapter.as_deref(), Some("bab-1"));

        let first = &overview.chapters[0];
        assert_eq!(first.state, ChapterState::InProgress);
        assert_eq!(first.materials[0].state, MaterialState::Unlocked);
        assert_eq!(first.materials[1].state, MaterialState::Locked);
        assert_eq!(overview.chapters[1].state, ChapterState::Locked);
    }

    #[tokio::test]
    async fn test_locked_material_is_rejected() {
        let (services, _dir) = create_services().await;
        let user = learner(&services, "sari@kopi.id").await;

        let err = services
            .course
            .material(&user, "bab-1", "materi-1-2")
            .await
            .unwrap_err();
        assert!(matches!(err, KopiError::MaterialLocked(_)));

        let err = services
            .course
            .submit_quiz(
                &user,
                "bab-1",
                "materi-1-2",
                correct_answers(&services, "bab-1", "materi-1-2"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, KopiError::MaterialLocked(_)));
    }

    #[tokio::test]
    async fn test_unknown_chapter_and_material() {
        let (services, _dir) = create_services().await;
        let user = learner(&services, "sari@kopi.id").await;

        assert!(matches!(
            services.course.chapter(&user, "bab-99").await,
            Err(KopiError::NotFound(_))
        ));
        assert!(matches!(
            services.course.material(&user, "bab-1", "materi-9-9").await,
            Err(KopiError::NotFound(_))
        ));
        assert!(matches!(
            services.course.material(&user, "bab-2", "materi-1-1").await,
            Err(KopiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_first_material_of_later_chapter_is_open_by_default() {
        let (services, _dir) = create_services().await;
        let user = learner(&services, "sari@kopi.id").await;

        let view = services
            .course
            .material(&user, "bab-2", "materi-2-1")
            .await
            .unwrap();
        assert_eq!(view.state, MaterialState::Unlocked);
        assert_eq!(view.position, 1);
    }

    #[tokio::test]
    async fn test_sequential_chapters_lock_later_chapters() {
        let (services, _dir) = create_services_with(CourseConfig {
            sequential_chapters: true,
            ..Default::default()
        })
        .await;
        let user = learner(&services, "sari@kopi.id").await;

        let err = services
            .course
            .material(&user, "bab-2", "materi-2-1")
            .await
            .unwrap_err();
        assert!(matches!(err, KopiError::MaterialLocked(_)));
    }

    #[tokio::test]
    async fn test_quiz_view_hides_answers() {
        let (services, _dir) = create_services().await;
        let user = learner(&services, "sari@kopi.id").await;

        let quiz = services
            .course
            .quiz(&user, "bab-1", "materi-1-1")
            .await
            .unwrap();
        assert_eq!(quiz.passing_score, 75.0);
        assert!(!quiz.questions.is_empty());

        let json = serde_json::to_value(&quiz).unwrap();
        assert!(json["questions"][0].get("answer").is_none());
    }
}

#[cfg(test)]
mod quiz_tests {
    use super::*;

    #[tokio::test]
    async fn test_passing_unlocks_next_material() {
        let (services, _dir) = create_services().await;
        let user = learner(&services, "sari@kopi.id").await;

        let outcome = services
            .course
            .submit_quiz(
                &user,
                "bab-1",
                "materi-1-1",
                correct_answers(&services, "bab-1", "materi-1-1"),
            )
            .await
            .unwrap();

        assert!(outcome.passed);
        assert_eq!(outcome.score, 100.0);
        assert!(outcome.newly_completed);
        assert_eq!(outcome.state, MaterialState::Completed);
        assert_eq!(
            outcome.next.as_ref().map(|n| n.material_id.as_str()),
            Some("materi-1-2")
        );

        let next = services
            .course
            .material(&user, "bab-1", "materi-1-2")
            .await
            .unwrap();
        assert_eq!(next.state, MaterialState::Unlocked);
    }

    #[tokio::test]
    async fn test_failing_leaves_progress_untouched() {
        let (services, _dir) = create_services().await;
        let user = learner(&services, "sari@kopi.id").await;

        let outcome = services
            .course
            .submit_quiz(
                &user,
                "bab-1",
                "materi-1-1",
                wrong_answers(&services, "bab-1", "materi-1-1"),
            )
            .await
            .unwrap();

        assert!(!outcome.passed);
        assert_eq!(outcome.correct, 0);
        assert_eq!(outcome.state, MaterialState::Unlocked);
        assert!(outcome.next.is_none());
        assert!(outcome.best_score.is_none());
        assert_eq!(services.course.overview(&user).await.unwrap().completed, 0);
    }

    #[tokio::test]
    async fn test_three_of_four_passes_at_threshold() {
        let (services, _dir) = create_services().await;
        let user = learner(&services, "sari@kopi.id").await;

        let mut submission = correct_answers(&services, "bab-1", "materi-1-1");
        assert_eq!(submission.answers.len(), 4);
        submission.answers[3] = Some("bukan jawaban".to_string());

        let outcome = services
            .course
            .submit_quiz(&user, "bab-1", "materi-1-1", submission)
            .await
            .unwrap();
        assert_eq!(outcome.correct, 3);
        assert_eq!(outcome.score, 75.0);
        assert!(outcome.passed);
    }

    #[tokio::test]
    async fn test_wrong_answer_count_is_rejected() {
        let (services, _dir) = create_services().await;
        let user = learner(&services, "sari@kopi.id").await;

        let err = services
            .course
            .submit_quiz(
                &user,
                "bab-1",
                "materi-1-1",
                QuizSubmission {
                    answers: vec![Some("Ethiopia".to_string())],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, KopiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_retake_keeps_best_score() {
        let (services, _dir) = create_services().await;
        let user = learner(&services, "sari@kopi.id").await;

        services
            .course
            .submit_quiz(
                &user,
                "bab-1",
                "materi-1-1",
                correct_answers(&services, "bab-1", "materi-1-1"),
            )
            .await
            .unwrap();

        let retake = services
            .course
            .submit_quiz(
                &user,
                "bab-1",
                "materi-1-1",
                wrong_answers(&services, "bab-1", "materi-1-1"),
            )
            .await
            .unwrap();

        assert!(!retake.passed);
        assert_eq!(retake.state, MaterialState::Completed);
        assert_eq!(retake.best_score, Some(100.0));
        assert!(!retake.newly_completed);
    }
}

#[cfg(test)]
mod certificate_tests {
    use super::*;

    #[tokio::test]
    async fn test_certificate_locked_until_complete() {
        let (services, _dir) = create_services().await;
        let user = learner(&services, "sari@kopi.id").await;

        let err = services.course.certificate(&user).await.unwrap_err();
        assert!(matches!(err, KopiError::CertificateLocked(_)));
    }

    #[tokio::test]
    async fn test_certificate_after_full_course() {
        let (services, _dir) = create_services().await;
        let user = learner(&services, "sari@kopi.id").await;

        complete_course(&services, &user).await;

        let overview = services.course.overview(&user).await.unwrap();
        assert!(overview.certificate_unlocked);
        assert_eq!(overview.percentage, 100.0);

        let certificate = services.course.certificate(&user).await.unwrap();
        assert_eq!(certificate.recipient, "Sari Barista");
        assert!(!certificate.issued_on.is_empty());
    }

    #[tokio::test]
    async fn test_reset_progress_relocks_certificate() {
        let (services, _dir) = create_services().await;
        let user = learner(&services, "sari@kopi.id").await;

        complete_course(&services, &user).await;
        let removed = services.course.reset_progress(&user).await.unwrap();

        assert_eq!(removed as usize, services.course.content().total_materials());
        assert!(matches!(
            services.course.certificate(&user).await,
            Err(KopiError::CertificateLocked(_))
        ));
    }
}

#[cfg(test)]
mod participant_tests {
    use super::*;

    #[tokio::test]
    async fn test_rows_exclude_admins() {
        let (services, _dir) = create_services().await;

        services
            .users
            .create_user("Admin", "admin@kopi.id", "rahasia123", Role::Admin)
            .await
            .unwrap();
        let sari = learner(&services, "sari@kopi.id").await;
        let budi = learner(&services, "budi@kopi.id").await;

        complete_course(&services, &sari).await;
        services
            .course
            .submit_quiz(
                &budi,
                "bab-1",
                "materi-1-1",
                correct_answers(&services, "bab-1", "materi-1-1"),
            )
            .await
            .unwrap();

        let rows = services.participants.rows().await.unwrap();
        assert_eq!(rows.len(), 2);

        let sari_row = rows.iter().find(|r| r.email == "sari@kopi.id").unwrap();
        assert_eq!(sari_row.status, ParticipantStatus::Completed);
        assert_eq!(sari_row.status_label, "Selesai");
        assert_eq!(sari_row.progress, 100.0);

        let budi_row = rows.iter().find(|r| r.email == "budi@kopi.id").unwrap();
        assert_eq!(budi_row.completed, 1);
        assert_eq!(budi_row.status_label, "Bab 1");
    }

    #[tokio::test]
    async fn test_csv_export_has_header_and_rows() {
        let (services, _dir) = create_services().await;
        learner(&services, "sari@kopi.id").await;

        let csv = services.participants.export_csv().await.unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.contains("email"));
        assert!(lines.next().unwrap().contains("sari@kopi.id"));
        assert!(lines.next().is_none());
    }
}
