//! Clip command - the full video-to-clips pipeline.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::media_source::detect_source;
use crate::pipeline::Pipeline;

/// Arguments for the clip command, already resolved from the CLI surface.
pub struct ClipArgs {
    pub input: String,
    pub api_key: Option<String>,
    pub prompt: Option<String>,
    pub model: Option<String>,
    pub min_clips: Option<u32>,
    pub max_clips: Option<u32>,
    pub max_clip_seconds: Option<f64>,
    pub output: Option<String>,
}

/// Run the clip command.
pub async fn run_clip(args: ClipArgs, mut settings: Settings) -> anyhow::Result<()> {
    // Fold CLI overrides into the settings before the pipeline sees them
    if let Some(model) = &args.model {
        settings.selection.model = model.clone();
    }
    if let Some(min_clips) = args.min_clips {
        settings.selection.min_clips = min_clips;
    }
    if let Some(max_clips) = args.max_clips {
        settings.selection.max_clips = max_clips;
    }
    if let Some(max_clip_seconds) = args.max_clip_seconds {
        settings.selection.max_clip_seconds = max_clip_seconds;
    }
    if let Some(output) = &args.output {
        settings.general.output_dir = output.clone();
    }

    if settings.selection.min_clips > settings.selection.max_clips {
        anyhow::bail!(
            "--min-clips ({}) cannot exceed --max-clips ({})",
            settings.selection.min_clips,
            settings.selection.max_clips
        );
    }

    let source = detect_source(&args.input)
        .ok_or_else(|| anyhow::anyhow!("Could not recognize input: {}", args.input))?;
    preflight::check(source.source_type())?;

    let intent = args
        .prompt
        .clone()
        .unwrap_or_else(|| "the most interesting moments".to_string());

    Output::header("Klipp");
    Output::kv("Input", &args.input);
    Output::kv("Intent", &intent);

    let pipeline = Pipeline::new(settings, args.api_key)?;
    let result = pipeline.run(&args.input, &intent).await?;

    println!();
    if result.clips.is_empty() && result.failures.is_empty() {
        Output::warning("No usable clips were found in this video.");
        return Ok(());
    }

    Output::success(&format!(
        "Produced {} clip(s) from '{}'",
        result.clips.len(),
        result.title
    ));
    for output in &result.clips {
        Output::clip_info(
            &output.path.display().to_string(),
            output.clip.start,
            output.clip.end,
            output.caption_count,
            &output.clip.reason,
        );
    }

    if !result.failures.is_empty() {
        println!();
        Output::warning(&format!("{} clip(s) failed:", result.failures.len()));
        for failure in &result.failures {
            Output::error(&format!(
                "  [{:.0}s - {:.0}s]: {}",
                failure.clip.start, failure.clip.end, failure.error
            ));
        }
    }

    Ok(())
}
