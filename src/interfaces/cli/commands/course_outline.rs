//! Course content commands

use colored::Colorize;

use crate::course::CourseContent;
use crate::interfaces::cli::CliError;
use crate::seed;

fn print_outline(content: &CourseContent) {
    for (ci, chapter) in content.chapters().iter().enumerate() {
        println!(
            "{} {}",
            format!("Bab {}", ci + 1).bold().green(),
            chapter.title.bold()
        );
        for (mi, material) in chapter.materials.iter().enumerate() {
            println!(
                "  {}. {} {} {}",
                mi + 1,
                material.id.cyan(),
                material.title,
                format!("({} soal)", material.quiz.len()).dimmed()
            );
        }
    }
    println!();
    println!(
        "{} {} chapters, {} materials",
        "ℹ".bold().blue(),
        content.chapters().len(),
        content.total_materials()
    );
}

/// Print the configured (or built-in) course
pub fn course_outline(content_path: Option<&str>) -> Result<(), CliError> {
    let content = seed::load_course(content_path)?;
    print_outline(&content);
    Ok(())
}

/// Validate a course-structure file without touching storage
pub fn course_validate(file_path: &str) -> Result<(), CliError> {
    let content = seed::load_course(Some(file_path))?;
    println!(
        "{} {} is valid: {} chapters, {} materials",
        "✓".bold().green(),
        file_path.blue(),
        content.chapters().len(),
        content.total_materials()
    );
    Ok(())
}
