//! Repetitor Core Library
//!
//! Core functionality for turning a topic into a short educational video:
//! LLM-generated lesson content, ElevenLabs narration, manim-rendered
//! animation and an ffmpeg mux, sequenced with per-topic failure isolation.

pub mod combine;
pub mod content;
pub mod error;
pub mod format;
pub mod layout;
pub mod pipeline;
pub mod provider;
pub mod render;
pub mod types;
pub mod voice;

// Re-export commonly used items at crate root
pub use combine::{combine_media, mux_args};
pub use content::{fallback_lesson, lesson_prompt, parse_lesson, strip_code_fences, synthesize_lesson};
pub use error::{RepetitorError, Result};
pub use format::format_lesson_readable;
pub use layout::{
    get_final_video_path, get_lesson_audit_path, get_topic_workdir, get_voiceover_path,
    sanitize_topic,
};
pub use pipeline::{
    ExternalStages, LessonStages, SilentReporter, Stage, StageReporter, load_lesson, run_batch,
    run_lesson, save_lesson,
};
pub use provider::{Provider, ProviderConfig};
pub use render::{
    HANDOFF_FILE, Palette, Quality, SCENE_NAME, candidate_output_paths, palette_for,
    probe_render_output, render_scene, write_handoff,
};
pub use types::{BatchResult, LessonExample, LessonRecord, PracticeProblem};
pub use voice::{VoiceConfig, record_voiceover};
