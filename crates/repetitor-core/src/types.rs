use serde::{Deserialize, Serialize};

/// Structured lesson produced by the content synthesizer. Consumed twice:
/// the narrator script feeds the voiceover, the whole record feeds the
/// scene renderer through the hand-off file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonRecord {
    pub title: String,
    pub concept: String,
    pub grade_level: String,
    pub narrator_script: String,
    pub lyrics: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub examples: Vec<LessonExample>,
    #[serde(default)]
    pub manim_commands: Vec<String>,
    pub difficulty: String,
    pub duration_minutes: f64,
    #[serde(default)]
    pub practice_problems: Vec<PracticeProblem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonExample {
    pub problem: String,
    pub solution: String,
    pub visual_cue: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeProblem {
    pub question: String,
    pub answer: String,
}

/// Outcome of a batch run. Topics land in exactly one bucket, in the same
/// relative order they were submitted in.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}
