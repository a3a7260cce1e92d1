use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tokio::{fs, process::Command};

use crate::{
    error::{RepetitorError, Result},
    types::LessonRecord,
};

/// Fixed filename the scene script reads inside its working directory.
pub const HANDOFF_FILE: &str = "lesson_content.json";

/// Scene class the render tool is asked to build.
pub const SCENE_NAME: &str = "LessonScene";

/// Manim quality presets. The preset decides both the CLI flag and the
/// resolution segment of the output directory, which is why output paths
/// have to be probed rather than assumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Quality {
    #[default]
    Low,
    Medium,
    High,
}

impl Quality {
    pub fn flag(self) -> &'static str {
        match self {
            Quality::Low => "-ql",
            Quality::Medium => "-qm",
            Quality::High => "-qh",
        }
    }

    pub fn media_segment(self) -> &'static str {
        match self {
            Quality::Low => "480p15",
            Quality::Medium => "720p30",
            Quality::High => "1080p60",
        }
    }

    fn all() -> [Quality; 3] {
        [Quality::Low, Quality::Medium, Quality::High]
    }
}

/// Color scheme handed to the scene script along with the lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
}

const BEGINNER_PALETTE: Palette = Palette {
    primary: "#83C167",   // manim GREEN
    secondary: "#A6CF8C", // GREEN_B
    accent: "#FFFF00",    // YELLOW
    background: "#0f0f23",
};

const INTERMEDIATE_PALETTE: Palette = Palette {
    primary: "#58C4DD",   // BLUE
    secondary: "#9CDCEB", // BLUE_B
    accent: "#FF862F",    // ORANGE
    background: "#0f0f23",
};

const ADVANCED_PALETTE: Palette = Palette {
    primary: "#9A72AC",   // PURPLE
    secondary: "#B189C6", // PURPLE_B
    accent: "#FC6255",    // RED
    background: "#0f0f23",
};

/// Map a difficulty label to its color scheme. Total: unknown or empty
/// labels take the advanced branch rather than failing the render.
pub fn palette_for(difficulty: &str) -> Palette {
    match difficulty.trim().to_lowercase().as_str() {
        "beginner" => BEGINNER_PALETTE,
        "intermediate" => INTERMEDIATE_PALETTE,
        _ => ADVANCED_PALETTE,
    }
}

/// Persist the hand-off file the scene script reads: the lesson record with
/// the selected palette alongside it. This file is the only channel between
/// the pipeline and the out-of-process renderer.
pub async fn write_handoff(lesson: &LessonRecord, path: &Path) -> Result<()> {
    let mut value = serde_json::to_value(lesson)?;
    value["palette"] = serde_json::to_value(palette_for(&lesson.difficulty))?;
    let pretty = serde_json::to_string_pretty(&value)?;
    fs::write(path, pretty).await?;
    Ok(())
}

/// Arguments for one manim invocation.
pub fn render_args(scene_file: &Path, quality: Quality) -> Vec<OsString> {
    vec![
        quality.flag().into(),
        scene_file.as_os_str().to_os_string(),
        SCENE_NAME.into(),
    ]
}

/// Ordered output locations to check after a render, configured quality
/// first. Manim nests output under media/videos/<script stem>/<resolution>.
pub fn candidate_output_paths(
    workdir: &Path,
    scene_file: &Path,
    quality: Quality,
) -> Vec<PathBuf> {
    let stem = scene_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "lesson_scene".to_string());

    let mut segments = vec![quality.media_segment()];
    segments.extend(
        Quality::all()
            .into_iter()
            .filter(|q| *q != quality)
            .map(Quality::media_segment),
    );

    segments
        .into_iter()
        .map(|segment| {
            workdir
                .join("media")
                .join("videos")
                .join(&stem)
                .join(segment)
                .join(format!("{SCENE_NAME}.mp4"))
        })
        .collect()
}

/// Pick the first candidate that exists on disk.
pub fn probe_render_output(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|path| path.exists()).cloned()
}

/// Render the silent lesson animation. Writes the hand-off file, invokes
/// manim with `workdir` as its working directory, then probes the known
/// output locations. No retry on failure; the caller decides what a failed
/// render means for the run.
pub async fn render_scene(
    lesson: &LessonRecord,
    scene_file: &Path,
    workdir: &Path,
    quality: Quality,
) -> Result<PathBuf> {
    write_handoff(lesson, &workdir.join(HANDOFF_FILE)).await?;

    let output = Command::new("manim")
        .args(render_args(scene_file, quality))
        .current_dir(workdir)
        .output()
        .await?;

    if !output.status.success() {
        return Err(RepetitorError::RenderingFailed {
            workdir: workdir.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let candidates = candidate_output_paths(workdir, scene_file, quality);
    probe_render_output(&candidates)
        .ok_or(RepetitorError::RenderOutputNotFound { searched: candidates })
}
