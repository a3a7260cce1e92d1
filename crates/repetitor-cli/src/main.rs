use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;

use repetitor_core::{
    ExternalStages, LessonRecord, Provider, Quality, RepetitorError, Stage, StageReporter,
    VoiceConfig, format_lesson_readable, run_batch,
};

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    Grok,
    Openai,
    #[default]
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

/// CLI wrapper for Quality enum
#[derive(Clone, Default, ValueEnum)]
enum CliQuality {
    #[default]
    Low,
    Medium,
    High,
}

impl From<CliQuality> for Quality {
    fn from(cli: CliQuality) -> Self {
        match cli {
            CliQuality::Low => Quality::Low,
            CliQuality::Medium => Quality::Medium,
            CliQuality::High => Quality::High,
        }
    }
}

#[derive(Parser)]
#[command(name = "repetitor")]
#[command(
    about = "Turn topics into narrated educational videos: AI lesson content, ElevenLabs voiceover, manim animation"
)]
struct Cli {
    /// One or more lesson topics, processed in order
    #[arg(required = true)]
    topics: Vec<String>,

    /// Grade level applied to the whole batch
    #[arg(short, long, default_value = "middle school")]
    grade_level: String,

    /// AI provider for lesson generation
    #[arg(short, long, default_value = "gemini")]
    provider: CliProvider,

    /// Render quality preset
    #[arg(short, long, default_value = "low")]
    quality: CliQuality,

    /// Output directory for lesson files and videos
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Manim scene script invoked by the renderer
    #[arg(long, default_value = "scenes/lesson_scene.py")]
    scene: PathBuf,

    /// Print the full generated lesson after synthesis
    #[arg(long)]
    show_lesson: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Spinner-backed progress output, one line per stage.
struct ConsoleReporter {
    spinner: Option<ProgressBar>,
    show_lesson: bool,
}

impl ConsoleReporter {
    fn new(show_lesson: bool) -> Self {
        ConsoleReporter {
            spinner: None,
            show_lesson,
        }
    }

    fn finish_spinner(&mut self, message: String) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(message);
        }
    }
}

impl StageReporter for ConsoleReporter {
    fn topic_started(&mut self, index: usize, total: usize, topic: &str) {
        println!(
            "\n{} {}",
            style(format!("[{}/{}]", index + 1, total)).cyan().bold(),
            style(topic).bold()
        );
    }

    fn stage_started(&mut self, _topic: &str, stage: Stage) {
        self.spinner = Some(create_spinner(stage.describe()));
    }

    fn stage_finished(&mut self, _topic: &str, stage: Stage) {
        let label = match stage {
            Stage::Synthesize => "Lesson content generated",
            Stage::Record => "Narration recorded",
            Stage::Render => "Animation rendered",
            Stage::Combine => "Audio and video combined",
        };
        self.finish_spinner(format!("{} {}", style("✓").green().bold(), label));
    }

    fn stage_failed(&mut self, _topic: &str, stage: Stage, error: &RepetitorError) {
        self.finish_spinner(format!(
            "{} {} failed: {}",
            style("✗").red().bold(),
            stage,
            error
        ));
    }

    fn lesson_ready(&mut self, _topic: &str, lesson: &LessonRecord) {
        println!(
            "  {} {} ({}, {:.0} min)",
            style("Lesson:").dim(),
            lesson.title,
            lesson.difficulty,
            lesson.duration_minutes
        );
        if self.show_lesson {
            println!("\n{}", format_lesson_readable(lesson));
        }
    }

    fn topic_succeeded(&mut self, _topic: &str, video: &Path) {
        println!(
            "  {} {}",
            style("Saved:").dim(),
            style(video.display()).cyan()
        );
    }

    fn topic_failed(&mut self, _topic: &str, error: &RepetitorError) {
        // Stage failures were already reported by stage_failed; this covers
        // aborts outside the stage gates (filesystem errors and the like).
        if error.stage().is_none() {
            let message = format!("{} {}", style("✗").red().bold(), error);
            match self.spinner.take() {
                Some(spinner) => spinner.finish_with_message(message),
                None => println!("  {message}"),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let provider: Provider = cli.provider.into();

    println!(
        "\n{}  {}\n",
        style("repetitor").cyan().bold(),
        style("Lesson Video Maker").dim()
    );

    // A missing generation key is survivable (synthesis falls back to the
    // templated lesson), so it only warns.
    if provider.validate_api_key().is_err() {
        println!(
            "{} {} is not set, lessons will use fallback content",
            style("!").yellow().bold(),
            provider.config().env_var
        );
    }

    // Narration has no fallback: validate before any topic is attempted.
    let stages = match ExternalStages::new(
        provider,
        VoiceConfig::default(),
        cli.scene,
        cli.quality.into(),
    ) {
        Ok(stages) => stages,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    fs::create_dir_all(&cli.out).await?;

    let mut reporter = ConsoleReporter::new(cli.show_lesson);
    let result = run_batch(
        &stages,
        &cli.topics,
        &cli.grade_level,
        &cli.out,
        &mut reporter,
    )
    .await;

    // Batch summary
    println!("\n{}", style("─".repeat(60)).dim());
    println!(
        "{} {} succeeded, {} failed (of {})",
        style("Summary:").bold(),
        style(result.succeeded.len()).green(),
        style(result.failed.len()).red(),
        result.total()
    );
    for topic in &result.succeeded {
        println!("  {} {}", style("✓").green().bold(), topic);
    }
    for topic in &result.failed {
        println!("  {} {}", style("✗").red().bold(), topic);
    }

    if !result.all_succeeded() {
        std::process::exit(1);
    }

    Ok(())
}
