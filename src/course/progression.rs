//! Material and chapter progression.
//!
//! A material is unlocked when it is the first of its chapter or the material
//! right before it has been completed. Completion always wins over locking, so
//! content edits never hide work a learner already finished.

use std::collections::HashSet;

use serde::Serialize;

use super::content::{Chapter, CourseContent};

/// Set of completed material ids for one learner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    completed: HashSet<String>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, material_id: &str) -> bool {
        self.completed.contains(material_id)
    }

    /// Returns true when the material was not completed before.
    pub fn mark_completed(&mut self, material_id: impl Into<String>) -> bool {
        self.completed.insert(material_id.into())
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Number of completed materials that still exist in `content`.
    pub fn completed_in(&self, content: &CourseContent) -> usize {
        content
            .material_ids()
            .filter(|id| self.is_completed(id))
            .count()
    }
}

impl<S: Into<String>> FromIterator<S> for Progress {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            completed: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MaterialState {
    Locked,
    Unlocked,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChapterState {
    Locked,
    InProgress,
    Completed,
}

/// Extra gating applied on top of the per-chapter rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressionPolicy {
    /// First material of a chapter stays locked until the previous chapter
    /// is completed.
    pub sequential_chapters: bool,
}

impl ProgressionPolicy {
    pub fn from_config(config: &crate::config::CourseConfig) -> Self {
        Self {
            sequential_chapters: config.sequential_chapters,
        }
    }
}

/// State of `chapter.materials[index]` under the per-chapter rule only.
pub fn material_state(chapter: &Chapter, index: usize, progress: &Progress) -> MaterialState {
    let Some(material) = chapter.materials.get(index) else {
        return MaterialState::Locked;
    };
    if progress.is_completed(&material.id) {
        return MaterialState::Completed;
    }
    if index == 0 || progress.is_completed(&chapter.materials[index - 1].id) {
        MaterialState::Unlocked
    } else {
        MaterialState::Locked
    }
}

/// A chapter with no materials counts as completed.
pub fn is_chapter_completed(chapter: &Chapter, progress: &Progress) -> bool {
    chapter
        .materials
        .iter()
        .all(|m| progress.is_completed(&m.id))
}

/// Material state with the course-wide policy applied.
pub fn effective_material_state(
    content: &CourseContent,
    chapter_index: usize,
    index: usize,
    progress: &Progress,
    policy: ProgressionPolicy,
) -> MaterialState {
    let Some(chapter) = content.chapters.get(chapter_index) else {
        return MaterialState::Locked;
    };
    let state = material_state(chapter, index, progress);
    if state == MaterialState::Unlocked
        && index == 0
        && policy.sequential_chapters
        && !previous_chapter_completed(content, chapter_index, progress)
    {
        return MaterialState::Locked;
    }
    state
}

fn previous_chapter_completed(
    content: &CourseContent,
    chapter_index: usize,
    progress: &Progress,
) -> bool {
    chapter_index == 0 || is_chapter_completed(&content.chapters[chapter_index - 1], progress)
}

/// A chapter is locked while the one before it is incomplete. This is
/// reported regardless of policy; only materials consult the policy.
pub fn chapter_state(
    content: &CourseContent,
    chapter_index: usize,
    progress: &Progress,
) -> ChapterState {
    let Some(chapter) = content.chapters.get(chapter_index) else {
        return ChapterState::Locked;
    };
    if is_chapter_completed(chapter, progress) {
        ChapterState::Completed
    } else if !previous_chapter_completed(content, chapter_index, progress) {
        ChapterState::Locked
    } else {
        ChapterState::InProgress
    }
}

pub fn percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialProgress {
    pub id: String,
    pub title: String,
    /// 1-based position inside the chapter.
    pub position: usize,
    pub state: MaterialState,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterProgress {
    pub id: String,
    pub title: String,
    pub description: String,
    pub state: ChapterState,
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
    pub materials: Vec<MaterialProgress>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseProgress {
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
    pub certificate_unlocked: bool,
    /// First chapter that is not yet completed.
    pub current_chapter: Option<String>,
    pub chapters: Vec<ChapterProgress>,
}

pub fn chapter_view(
    content: &CourseContent,
    chapter_index: usize,
    progress: &Progress,
    policy: ProgressionPolicy,
) -> Option<ChapterProgress> {
    let chapter = content.chapters.get(chapter_index)?;
    let materials: Vec<MaterialProgress> = chapter
        .materials
        .iter()
        .enumerate()
        .map(|(i, m)| MaterialProgress {
            id: m.id.clone(),
            title: m.title.clone(),
            position: i + 1,
            state: effective_material_state(content, chapter_index, i, progress, policy),
        })
        .collect();
    let completed = materials
        .iter()
        .filter(|m| m.state == MaterialState::Completed)
        .count();
    let total = materials.len();

    Some(ChapterProgress {
        id: chapter.id.clone(),
        title: chapter.title.clone(),
        description: chapter.description.clone(),
        state: chapter_state(content, chapter_index, progress),
        completed,
        total,
        percentage: percentage(completed, total),
        materials,
    })
}

pub fn course_progress(
    content: &CourseContent,
    progress: &Progress,
    policy: ProgressionPolicy,
) -> CourseProgress {
    let chapters: Vec<ChapterProgress> = (0..content.chapters.len())
        .filter_map(|i| chapter_view(content, i, progress, policy))
        .collect();
    let completed = chapters.iter().map(|c| c.completed).sum();
    let total = content.total_materials();

    CourseProgress {
        completed,
        total,
        percentage: percentage(completed, total),
        certificate_unlocked: is_course_completed(content, progress),
        current_chapter: current_chapter(content, progress).map(|(_, c)| c.id.clone()),
        chapters,
    }
}

/// True when every material of a non-empty course is completed.
pub fn is_course_completed(content: &CourseContent, progress: &Progress) -> bool {
    let total = content.total_materials();
    total > 0 && progress.completed_in(content) == total
}

pub fn current_chapter<'a>(
    content: &'a CourseContent,
    progress: &Progress,
) -> Option<(usize, &'a Chapter)> {
    content
        .chapters
        .iter()
        .enumerate()
        .find(|(_, c)| !is_chapter_completed(c, progress))
}

/// Next material after `material_id` in course order, crossing chapters.
pub fn next_material<'a>(
    content: &'a CourseContent,
    material_id: &str,
) -> Option<(&'a Chapter, &'a super::Material)> {
    let mut flat = content
        .chapters
        .iter()
        .flat_map(|c| c.materials.iter().map(move |m| (c, m)));
    flat.find(|(_, m)| m.id == material_id)?;
    flat.next()
}

#[cfg(test)]
mod tests {
    use super::super::content::test_support::sample_course;
    use super::*;

    const SEQUENTIAL: ProgressionPolicy = ProgressionPolicy {
        sequential_chapters: true,
    };

    #[test]
    fn test_first_material_always_unlocked() {
        let course = sample_course();
        let progress = Progress::new();
        assert_eq!(
            material_state(&course.chapters[0], 0, &progress),
            MaterialState::Unlocked
        );
        assert_eq!(
            material_state(&course.chapters[1], 0, &progress),
            MaterialState::Unlocked
        );
        assert_eq!(
            material_state(&course.chapters[0], 1, &progress),
            MaterialState::Locked
        );
    }

    #[test]
    fn test_completing_previous_unlocks_next() {
        let course = sample_course();
        let progress: Progress = ["m1"].into_iter().collect();
        let chapter = &course.chapters[0];
        assert_eq!(material_state(chapter, 0, &progress), MaterialState::Completed);
        assert_eq!(material_state(chapter, 1, &progress), MaterialState::Unlocked);
        assert_eq!(material_state(chapter, 2, &progress), MaterialState::Locked);
    }

    #[test]
    fn test_completed_wins_over_locked() {
        let course = sample_course();
        // m3 done without m2, e.g. after content was reordered
        let progress: Progress = ["m3"].into_iter().collect();
        assert_eq!(
            material_state(&course.chapters[0], 2, &progress),
            MaterialState::Completed
        );
    }

    #[test]
    fn test_out_of_range_material_is_locked() {
        let course = sample_course();
        assert_eq!(
            material_state(&course.chapters[0], 9, &Progress::new()),
            MaterialState::Locked
        );
    }

    #[test]
    fn test_sequential_chapters_lock_next_chapter() {
        let course = sample_course();
        let progress: Progress = ["m1", "m2"].into_iter().collect();
        assert_eq!(
            effective_material_state(&course, 1, 0, &progress, SEQUENTIAL),
            MaterialState::Locked
        );
        assert_eq!(chapter_state(&course, 1, &progress), ChapterState::Locked);
        assert_eq!(
            effective_material_state(&course, 1, 0, &progress, ProgressionPolicy::default()),
            MaterialState::Unlocked
        );

        let progress: Progress = ["m1", "m2", "m3"].into_iter().collect();
        assert_eq!(
            effective_material_state(&course, 1, 0, &progress, SEQUENTIAL),
            MaterialState::Unlocked
        );
        assert_eq!(chapter_state(&course, 0, &progress), ChapterState::Completed);
        assert_eq!(chapter_state(&course, 1, &progress), ChapterState::InProgress);
    }

    #[test]
    fn test_course_progress_counts() {
        let course = sample_course();
        let progress: Progress = ["m1", "m2", "m4", "stale-id"].into_iter().collect();
        let view = course_progress(&course, &progress, ProgressionPolicy::default());
        assert_eq!(view.completed, 3);
        assert_eq!(view.total, 5);
        assert!((view.percentage - 60.0).abs() < f64::EPSILON);
        assert!(!view.certificate_unlocked);
        assert_eq!(view.current_chapter.as_deref(), Some("bab-1"));
        assert_eq!(view.chapters[1].completed, 1);
        assert_eq!(view.chapters[1].materials[1].state, MaterialState::Unlocked);
    }

    #[test]
    fn test_course_completed_unlocks_certificate() {
        let course = sample_course();
        let progress: Progress = course.material_ids().collect();
        assert!(is_course_completed(&course, &progress));
        let view = course_progress(&course, &progress, ProgressionPolicy::default());
        assert!(view.certificate_unlocked);
        assert!(view.current_chapter.is_none());
        assert!((view.percentage - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_course_is_never_completed() {
        let course = CourseContent { chapters: vec![] };
        assert!(!is_course_completed(&course, &Progress::new()));
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn test_next_material_crosses_chapters() {
        let course = sample_course();
        let (chapter, material) = next_material(&course, "m3").expect("m4 follows m3");
        assert_eq!(chapter.id, "bab-2");
        assert_eq!(material.id, "m4");
        assert!(next_material(&course, "m5").is_none());
        assert!(next_material(&course, "nope").is_none());
    }
}
