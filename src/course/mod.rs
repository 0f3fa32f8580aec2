//! Course domain: content model, material progression, quiz scoring and the
//! completion certificate.
//!
//! Everything in here is pure and synchronous; persistence of progress lives in
//! `storage`, orchestration in `services::CourseService`.

pub mod certificate;
pub mod content;
pub mod progression;
pub mod quiz;

pub use certificate::{COURSE_TITLE, Certificate, ISSUER, format_indonesian_date};
pub use content::{Chapter, CourseContent, Material, MaterialRef, Question};
pub use progression::{
    ChapterProgress, ChapterState, CourseProgress, MaterialProgress, MaterialState, Progress,
    ProgressionPolicy,
};
pub use quiz::{QuizQuestionView, QuizScore};

/// Minimum quiz score (percent) that completes a material.
pub const PASSING_SCORE: f64 = 75.0;
