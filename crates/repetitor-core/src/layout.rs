use std::path::{Path, PathBuf};

/// Reduce a topic to a filesystem-safe slug: lowercase, whitespace becomes
/// underscores, everything else non-alphanumeric is dropped. Deterministic,
/// so the same topic always maps to the same artifact names and different
/// topics keep their intermediate files apart.
pub fn sanitize_topic(topic: &str) -> String {
    let slug: String = topic
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if slug.is_empty() {
        "lesson".to_string()
    } else {
        slug
    }
}

/// Per-topic working directory under the output root. Holds the hand-off
/// file, the voiceover, and the renderer's media tree, so concurrent-looking
/// batch items never share mutable state.
pub fn get_topic_workdir(root: &Path, topic: &str) -> PathBuf {
    root.join(sanitize_topic(topic))
}

/// Audit copy of the lesson record, flat in the output root.
pub fn get_lesson_audit_path(root: &Path, topic: &str) -> PathBuf {
    root.join(format!("lesson_{}.json", sanitize_topic(topic)))
}

/// Voiceover audio inside the per-topic workdir.
pub fn get_voiceover_path(workdir: &Path) -> PathBuf {
    workdir.join("voiceover.mp3")
}

/// Final combined video, flat in the output root.
pub fn get_final_video_path(root: &Path, topic: &str) -> PathBuf {
    root.join(format!("final_{}.mp4", sanitize_topic(topic)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_replaces_spaces() {
        assert_eq!(sanitize_topic("Pythagorean Theorem"), "pythagorean_theorem");
        assert_eq!(sanitize_topic("  Mean, Median, Mode "), "mean_median_mode");
        assert_eq!(sanitize_topic("ratios & proportions"), "ratios__proportions");
    }

    #[test]
    fn slug_never_empty() {
        assert_eq!(sanitize_topic(""), "lesson");
        assert_eq!(sanitize_topic("???"), "lesson");
    }

    #[test]
    fn distinct_topics_get_distinct_paths() {
        let root = Path::new("out");
        assert_ne!(
            get_lesson_audit_path(root, "Fractions"),
            get_lesson_audit_path(root, "Decimals")
        );
        assert_eq!(
            get_final_video_path(root, "Prime Numbers"),
            PathBuf::from("out/final_prime_numbers.mp4")
        );
        assert_eq!(
            get_voiceover_path(&get_topic_workdir(root, "Prime Numbers")),
            PathBuf::from("out/prime_numbers/voiceover.mp3")
        );
    }
}
