//! Course content model and its validation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::{KopiError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub quiz: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub materials: Vec<Material>,
}

/// A material located inside the course, with its chapter.
#[derive(Debug, Clone, Copy)]
pub struct MaterialRef<'a> {
    pub chapter_index: usize,
    pub chapter: &'a Chapter,
    pub index: usize,
    pub material: &'a Material,
}

/// The whole course, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseContent {
    pub chapters: Vec<Chapter>,
}

impl CourseContent {
    /// Parse `{"chapters": [...]}` and validate it.
    pub fn from_json(raw: &str) -> Result<Self> {
        let content: CourseContent = serde_json::from_str(raw)
            .map_err(|e| KopiError::invalid_content(format!("course JSON: {}", e)))?;
        content.validate()?;
        Ok(content)
    }

    /// Checks id uniqueness and quiz well-formedness.
    pub fn validate(&self) -> Result<()> {
        let mut chapter_ids = HashSet::new();
        let mut material_ids = HashSet::new();

        for chapter in &self.chapters {
            if chapter.id.trim().is_empty() {
                return Err(KopiError::invalid_content("chapter with empty id"));
            }
            if !chapter_ids.insert(chapter.id.as_str()) {
                return Err(KopiError::invalid_content(format!(
                    "duplicate chapter id '{}'",
                    chapter.id
                )));
            }

            for material in &chapter.materials {
                if material.id.trim().is_empty() {
                    return Err(KopiError::invalid_content(format!(
                        "material with empty id in chapter '{}'",
                        chapter.id
                    )));
                }
                if !material_ids.insert(material.id.as_str()) {
                    return Err(KopiError::invalid_content(format!(
                        "duplicate material id '{}'",
                        material.id
                    )));
                }
                if material.quiz.is_empty() {
                    return Err(KopiError::invalid_content(format!(
                        "material '{}' has no quiz questions",
                        material.id
                    )));
                }
                for (i, q) in material.quiz.iter().enumerate() {
                    if !q.options.iter().any(|o| o == &q.answer) {
                        return Err(KopiError::invalid_content(format!(
                            "material '{}' question {}: answer is not one of the options",
                            material.id,
                            i + 1
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter(&self, chapter_id: &str) -> Option<(usize, &Chapter)> {
        self.chapters
            .iter()
            .enumerate()
            .find(|(_, c)| c.id == chapter_id)
    }

    /// Looks a material up by chapter and material id; the material must
    /// belong to that chapter.
    pub fn material(&self, chapter_id: &str, material_id: &str) -> Option<MaterialRef<'_>> {
        let (chapter_index, chapter) = self.chapter(chapter_id)?;
        chapter
            .materials
            .iter()
            .enumerate()
            .find(|(_, m)| m.id == material_id)
            .map(|(index, material)| MaterialRef {
                chapter_index,
                chapter,
                index,
                material,
            })
    }

    pub fn contains_material(&self, material_id: &str) -> bool {
        self.material_ids().any(|id| id == material_id)
    }

    pub fn material_ids(&self) -> impl Iterator<Item = &str> {
        self.chapters
            .iter()
            .flat_map(|c| c.materials.iter().map(|m| m.id.as_str()))
    }

    pub fn total_materials(&self) -> usize {
        self.chapters.iter().map(|c| c.materials.len()).sum()
    }
}
