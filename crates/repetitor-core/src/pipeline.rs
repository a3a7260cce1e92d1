use std::{
    fmt,
    path::{Path, PathBuf},
};

use tokio::fs;

use crate::{
    combine, content,
    error::{RepetitorError, Result},
    layout, render,
    provider::Provider,
    render::Quality,
    types::{BatchResult, LessonRecord},
    voice::{self, VoiceConfig},
};

/// The four pipeline stages, in execution order. Synthesis cannot fail (it
/// falls back internally); every later stage is a hard gate for its topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Synthesize,
    Record,
    Render,
    Combine,
}

impl Stage {
    /// Progress message shown while the stage runs.
    pub fn describe(self) -> &'static str {
        match self {
            Stage::Synthesize => "Generating lesson content...",
            Stage::Record => "Recording narration...",
            Stage::Render => "Rendering animation...",
            Stage::Combine => "Combining audio and video...",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Synthesize => "synthesize",
            Stage::Record => "record",
            Stage::Render => "render",
            Stage::Combine => "combine",
        };
        write!(f, "{name}")
    }
}

/// Progress sink for pipeline and batch events. Default methods are no-ops
/// so callers only override what they surface.
pub trait StageReporter {
    fn topic_started(&mut self, _index: usize, _total: usize, _topic: &str) {}
    fn stage_started(&mut self, _topic: &str, _stage: Stage) {}
    fn stage_finished(&mut self, _topic: &str, _stage: Stage) {}
    fn stage_failed(&mut self, _topic: &str, _stage: Stage, _error: &RepetitorError) {}
    fn lesson_ready(&mut self, _topic: &str, _lesson: &LessonRecord) {}
    fn topic_succeeded(&mut self, _topic: &str, _video: &Path) {}
    fn topic_failed(&mut self, _topic: &str, _error: &RepetitorError) {}
}

/// Reporter that swallows everything.
pub struct SilentReporter;

impl StageReporter for SilentReporter {}

/// The stage operations the orchestrator sequences. The production
/// implementation shells out to the external collaborators; tests substitute
/// their own.
pub trait LessonStages {
    /// Total: always yields a well-formed record, falling back on failure.
    async fn synthesize(&self, topic: &str, grade_level: &str) -> LessonRecord;
    async fn record_narration(&self, text: &str, dest: &Path) -> Result<PathBuf>;
    async fn render_scene(&self, lesson: &LessonRecord, workdir: &Path) -> Result<PathBuf>;
    async fn combine_media(&self, video: &Path, audio: &Path, dest: &Path) -> Result<PathBuf>;
}

/// Production stages backed by the generation provider, ElevenLabs, manim
/// and ffmpeg.
pub struct ExternalStages {
    pub provider: Provider,
    pub voice: VoiceConfig,
    narration_key: String,
    scene_file: PathBuf,
    pub quality: Quality,
}

impl ExternalStages {
    /// Validates the narration credential up front; without it no topic can
    /// complete, so construction is the process-fatal configuration gate.
    pub fn new(
        provider: Provider,
        voice: VoiceConfig,
        scene_file: PathBuf,
        quality: Quality,
    ) -> Result<Self> {
        let narration_key = voice.validate_api_key()?;
        // manim runs with the per-topic workdir as cwd; the scene path has
        // to stay valid from there.
        let scene_file = std::fs::canonicalize(&scene_file).unwrap_or(scene_file);
        Ok(ExternalStages {
            provider,
            voice,
            narration_key,
            scene_file,
            quality,
        })
    }
}

impl LessonStages for ExternalStages {
    async fn synthesize(&self, topic: &str, grade_level: &str) -> LessonRecord {
        content::synthesize_lesson(topic, grade_level, &self.provider).await
    }

    async fn record_narration(&self, text: &str, dest: &Path) -> Result<PathBuf> {
        voice::record_voiceover(text, dest, &self.narration_key, &self.voice).await
    }

    async fn render_scene(&self, lesson: &LessonRecord, workdir: &Path) -> Result<PathBuf> {
        render::render_scene(lesson, &self.scene_file, workdir, self.quality).await
    }

    async fn combine_media(&self, video: &Path, audio: &Path, dest: &Path) -> Result<PathBuf> {
        combine::combine_media(video, audio, dest).await
    }
}

/// Save a lesson record to a file
pub async fn save_lesson(lesson: &LessonRecord, path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(lesson)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

/// Load a lesson record from a file
pub async fn load_lesson(path: &Path) -> Result<LessonRecord> {
    let json_content = fs::read_to_string(path).await?;
    let lesson: LessonRecord = serde_json::from_str(&json_content)?;
    Ok(lesson)
}

/// Run the full pipeline for one topic: synthesize, record, render, combine.
/// The first failing stage aborts the remaining ones; nothing is retried and
/// no partial recombination of leftover artifacts is attempted.
pub async fn run_lesson<S: LessonStages, R: StageReporter>(
    stages: &S,
    topic: &str,
    grade_level: &str,
    root: &Path,
    reporter: &mut R,
) -> Result<PathBuf> {
    let workdir = layout::get_topic_workdir(root, topic);
    fs::create_dir_all(&workdir).await?;

    // Stage 1: synthesize. Never fails; the audit copy is written next to
    // the final artifacts, the hand-off copy is the renderer's concern.
    reporter.stage_started(topic, Stage::Synthesize);
    let lesson = stages.synthesize(topic, grade_level).await;
    save_lesson(&lesson, &layout::get_lesson_audit_path(root, topic)).await?;
    reporter.stage_finished(topic, Stage::Synthesize);
    reporter.lesson_ready(topic, &lesson);

    // Stage 2: record narration.
    reporter.stage_started(topic, Stage::Record);
    let audio = gate(
        reporter,
        topic,
        Stage::Record,
        stages
            .record_narration(
                &lesson.narrator_script,
                &layout::get_voiceover_path(&workdir),
            )
            .await,
    )?;

    // Stage 3: render the silent animation.
    reporter.stage_started(topic, Stage::Render);
    let video = gate(
        reporter,
        topic,
        Stage::Render,
        stages.render_scene(&lesson, &workdir).await,
    )?;

    // Stage 4: mux.
    reporter.stage_started(topic, Stage::Combine);
    let final_video = gate(
        reporter,
        topic,
        Stage::Combine,
        stages
            .combine_media(
                &video,
                &audio,
                &layout::get_final_video_path(root, topic),
            )
            .await,
    )?;

    Ok(final_video)
}

fn gate<T>(
    reporter: &mut impl StageReporter,
    topic: &str,
    stage: Stage,
    result: Result<T>,
) -> Result<T> {
    match &result {
        Ok(_) => reporter.stage_finished(topic, stage),
        Err(error) => reporter.stage_failed(topic, stage, error),
    }
    result
}

/// Run the pipeline for every topic in order. One topic's failure never
/// stops the batch; each topic lands in exactly one bucket of the result.
pub async fn run_batch<S: LessonStages, R: StageReporter>(
    stages: &S,
    topics: &[String],
    grade_level: &str,
    root: &Path,
    reporter: &mut R,
) -> BatchResult {
    let mut result = BatchResult::default();
    let total = topics.len();

    for (index, topic) in topics.iter().enumerate() {
        reporter.topic_started(index, total, topic);
        match run_lesson(stages, topic, grade_level, root, reporter).await {
            Ok(video) => {
                reporter.topic_succeeded(topic, &video);
                result.succeeded.push(topic.clone());
            }
            Err(error) => {
                reporter.topic_failed(topic, &error);
                result.failed.push(topic.clone());
            }
        }
    }

    result
}
