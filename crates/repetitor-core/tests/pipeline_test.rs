use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use repetitor_core::{
    LessonRecord, LessonStages, RepetitorError, Result, SilentReporter, Stage, StageReporter,
    fallback_lesson, run_batch, run_lesson,
};

/// Scripted stand-in for the external collaborators. Counts invocations and
/// fails a chosen stage, optionally only for one topic.
struct ScriptedStages {
    fail_stage: Option<Stage>,
    fail_only_topic: Option<&'static str>,
    record_calls: AtomicUsize,
    render_calls: AtomicUsize,
    combine_calls: AtomicUsize,
}

impl ScriptedStages {
    fn passing() -> Self {
        ScriptedStages {
            fail_stage: None,
            fail_only_topic: None,
            record_calls: AtomicUsize::new(0),
            render_calls: AtomicUsize::new(0),
            combine_calls: AtomicUsize::new(0),
        }
    }

    fn failing_at(stage: Stage) -> Self {
        ScriptedStages {
            fail_stage: Some(stage),
            ..ScriptedStages::passing()
        }
    }

    fn failing_at_for(stage: Stage, topic: &'static str) -> Self {
        ScriptedStages {
            fail_stage: Some(stage),
            fail_only_topic: Some(topic),
            ..ScriptedStages::passing()
        }
    }

    fn should_fail(&self, stage: Stage, lesson_concept: &str) -> bool {
        self.fail_stage == Some(stage)
            && self
                .fail_only_topic
                .is_none_or(|topic| topic == lesson_concept)
    }
}

impl LessonStages for ScriptedStages {
    async fn synthesize(&self, topic: &str, grade_level: &str) -> LessonRecord {
        fallback_lesson(topic, grade_level)
    }

    async fn record_narration(&self, text: &str, dest: &Path) -> Result<PathBuf> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        // The fallback script embeds the topic, which is all the mock has to
        // key per-topic failures on.
        let failing = self
            .fail_only_topic
            .map(|topic| text.contains(topic))
            .unwrap_or(true);
        if self.fail_stage == Some(Stage::Record) && failing {
            return Err(RepetitorError::NarrationFailed {
                dest: dest.to_path_buf(),
                reason: "scripted failure".to_string(),
            });
        }
        std::fs::write(dest, b"audio")?;
        Ok(dest.to_path_buf())
    }

    async fn render_scene(&self, lesson: &LessonRecord, workdir: &Path) -> Result<PathBuf> {
        self.render_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail(Stage::Render, &lesson.concept) {
            return Err(RepetitorError::RenderingFailed {
                workdir: workdir.to_path_buf(),
                reason: "scripted failure".to_string(),
            });
        }
        let video = workdir.join("silent.mp4");
        std::fs::write(&video, b"video")?;
        Ok(video)
    }

    async fn combine_media(&self, video: &Path, _audio: &Path, dest: &Path) -> Result<PathBuf> {
        self.combine_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stage == Some(Stage::Combine) {
            return Err(RepetitorError::CombineFailed {
                output_path: dest.to_path_buf(),
                reason: "scripted failure".to_string(),
            });
        }
        assert!(video.exists(), "combine ran before render produced output");
        std::fs::write(dest, b"final")?;
        Ok(dest.to_path_buf())
    }
}

/// Reporter that remembers which stages failed.
#[derive(Default)]
struct RecordingReporter {
    failed_stages: Vec<(String, Stage)>,
}

impl StageReporter for RecordingReporter {
    fn stage_failed(&mut self, topic: &str, stage: Stage, _error: &RepetitorError) {
        self.failed_stages.push((topic.to_string(), stage));
    }
}

#[tokio::test]
async fn successful_run_yields_final_video_and_audit_file() {
    let root = tempfile::tempdir().unwrap();
    let stages = ScriptedStages::passing();

    let video = run_lesson(
        &stages,
        "Prime Numbers",
        "middle school",
        root.path(),
        &mut SilentReporter,
    )
    .await
    .unwrap();

    assert_eq!(video, root.path().join("final_prime_numbers.mp4"));
    assert!(video.exists());
    assert!(root.path().join("lesson_prime_numbers.json").exists());
    assert!(root.path().join("prime_numbers/voiceover.mp3").exists());
    assert_eq!(stages.record_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stages.render_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stages.combine_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn narration_failure_aborts_later_stages() {
    let root = tempfile::tempdir().unwrap();
    let stages = ScriptedStages::failing_at(Stage::Record);
    let mut reporter = RecordingReporter::default();

    let error = run_lesson(
        &stages,
        "Fractions",
        "middle school",
        root.path(),
        &mut reporter,
    )
    .await
    .unwrap_err();

    assert!(matches!(error, RepetitorError::NarrationFailed { .. }));
    assert_eq!(error.stage(), Some(Stage::Record));
    assert_eq!(stages.render_calls.load(Ordering::SeqCst), 0);
    assert_eq!(stages.combine_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        reporter.failed_stages,
        vec![("Fractions".to_string(), Stage::Record)]
    );
}

#[tokio::test]
async fn render_failure_aborts_combine() {
    let root = tempfile::tempdir().unwrap();
    let stages = ScriptedStages::failing_at(Stage::Render);

    let error = run_lesson(
        &stages,
        "Fractions",
        "middle school",
        root.path(),
        &mut SilentReporter,
    )
    .await
    .unwrap_err();

    assert_eq!(error.stage(), Some(Stage::Render));
    assert_eq!(stages.record_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stages.combine_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn batch_isolates_failures_and_preserves_order() {
    let root = tempfile::tempdir().unwrap();
    let stages = ScriptedStages::failing_at_for(Stage::Record, "Decimals");
    let topics = vec![
        "Fractions".to_string(),
        "Decimals".to_string(),
        "Prime Numbers".to_string(),
    ];

    let result = run_batch(
        &stages,
        &topics,
        "middle school",
        root.path(),
        &mut SilentReporter,
    )
    .await;

    assert_eq!(result.succeeded, vec!["Fractions", "Prime Numbers"]);
    assert_eq!(result.failed, vec!["Decimals"]);
    assert_eq!(result.total(), 3);
    assert!(!result.all_succeeded());
    // The failing middle topic did not stop the third from being attempted.
    assert_eq!(stages.record_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn batch_with_no_failures_fills_only_succeeded() {
    let root = tempfile::tempdir().unwrap();
    let stages = ScriptedStages::passing();
    let topics = vec!["Fractions".to_string(), "Decimals".to_string()];

    let result = run_batch(
        &stages,
        &topics,
        "elementary",
        root.path(),
        &mut SilentReporter,
    )
    .await;

    assert_eq!(result.succeeded, topics);
    assert!(result.failed.is_empty());
    assert!(result.all_succeeded());
}

#[tokio::test]
async fn lesson_round_trips_through_disk() {
    let root = tempfile::tempdir().unwrap();
    let path = root.path().join("lesson.json");
    let lesson = fallback_lesson("Ratios", "middle school");

    repetitor_core::save_lesson(&lesson, &path).await.unwrap();
    let loaded = repetitor_core::load_lesson(&path).await.unwrap();

    assert_eq!(loaded.title, lesson.title);
    assert_eq!(loaded.narrator_script, lesson.narrator_script);
    assert_eq!(loaded.practice_problems.len(), 1);
}
