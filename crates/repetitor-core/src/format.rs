use crate::types::LessonRecord;

/// Format a lesson record as human-readable markdown
pub fn format_lesson_readable(lesson: &LessonRecord) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", lesson.title));

    // Meta info
    output.push_str(&format!(
        "**Concept:** {} | **Grade:** {} | **Difficulty:** {} | **Duration:** {:.0} min\n\n",
        lesson.concept, lesson.grade_level, lesson.difficulty, lesson.duration_minutes
    ));

    // Key points
    if !lesson.key_points.is_empty() {
        output.push_str("## Key Points\n\n");
        for point in &lesson.key_points {
            output.push_str(&format!("• {}\n", point));
        }
        output.push('\n');
    }

    // Examples
    if !lesson.examples.is_empty() {
        output.push_str("## Examples\n\n");
        for (i, example) in lesson.examples.iter().enumerate() {
            output.push_str(&format!("### Example {}\n\n", i + 1));
            output.push_str(&format!("**Problem:** {}\n\n", example.problem));
            output.push_str(&format!("**Solution:** {}\n\n", example.solution));
        }
    }

    // Practice problems
    if !lesson.practice_problems.is_empty() {
        output.push_str("## Practice\n\n");
        for (i, problem) in lesson.practice_problems.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, problem.question));
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fallback_lesson;

    #[test]
    fn readable_summary_covers_core_sections() {
        let lesson = fallback_lesson("Fractions", "elementary");
        let readable = format_lesson_readable(&lesson);
        assert!(readable.contains("# Introduction to Fractions"));
        assert!(readable.contains("## Key Points"));
        assert!(readable.contains("## Practice"));
    }
}
