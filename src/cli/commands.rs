//! Subcommand handlers and the convert command.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};

use super::args::{Args, ConfigAction};
use super::enums::Backend;
use img_to_ascii::ascii::compensate_height;
use img_to_ascii::config::{default_path, Config, DEFAULT_CONFIG};
use img_to_ascii::decode::load_image;
use img_to_ascii::pipeline::{Pipeline, PipelineConfig};
use img_to_ascii::renderer::{render_rendering, write_metrics};

/// Everything the convert command needs after merging flags and file.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub pipeline: PipelineConfig,
    pub colors: bool,
    pub keep_alpha: bool,
    pub render: bool,
    pub metrics: bool,
}

/// Merge command-line flags over the config file.
pub fn resolve_settings(args: &Args, config: &Config) -> Result<RunSettings> {
    let mut pipeline = config.pipeline_config()?;

    if let Some(width) = args.width {
        pipeline.width = width;
    }
    if let Some(height) = args.height {
        pipeline.height = height;
    }
    if let Some(edges) = args.edges_override() {
        pipeline.edges = edges;
    }
    if let Some(hue) = args.hue_override() {
        pipeline.hue = hue;
    }
    if let Some(threads) = args.threads {
        pipeline.threads = threads;
    }
    if let Some(charset) = args.charset {
        pipeline.ramp = charset.into();
    }

    let accel = args.accel_override();
    if let Some(backend) = args.edge_backend.or(accel) {
        pipeline.edge_backend = backend.into();
    }
    match args.color_backend.or(accel) {
        Some(backend) => pipeline.color_backend = backend.into(),
        // Hue mode switches the accelerated HSV path on unless a backend was named.
        None if pipeline.hue && config.backends.color.is_none() => {
            pipeline.color_backend = Backend::Accelerated.into();
        }
        None => {}
    }

    Ok(RunSettings {
        pipeline,
        colors: args.colors_override().unwrap_or_else(|| config.colors()),
        keep_alpha: args.keep_alpha,
        render: !args.no_render,
        metrics: args.metrics,
    })
}

/// Decode, convert and print one image.
pub fn convert<W: Write>(image: &Path, settings: &RunSettings, out: &mut W) -> Result<()> {
    let started = Instant::now();
    let source = load_image(image, settings.keep_alpha)?;
    log::debug!("decode took {:?}", started.elapsed());

    let pipeline = Pipeline::new(settings.pipeline.clone());
    let rendering = pipeline
        .run(&source)
        .with_context(|| format!("failed to convert {}", image.display()))?;

    if settings.render {
        render_rendering(out, &rendering, settings.colors).context("failed to write output")?;
    }
    if settings.metrics {
        write_metrics(out, &rendering.timings).context("failed to write metrics")?;
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) -> Result<()> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&config_path))?;
            let p = config.pipeline_config()?;
            println!("Current configuration:");
            println!(
                "  Size: {}x{} (grid height {})",
                p.width,
                p.height,
                compensate_height(p.height)
            );
            println!("  Colors: {}", if config.colors() { "yes" } else { "no" });
            println!("  Charset: {}", p.ramp.name());
            println!("  Edges: {}", if p.edges { "yes" } else { "no" });
            println!("  Hue: {}", if p.hue { "yes" } else { "no" });
            println!("  Threads: {}", p.threads);
            println!("  Edge backend: {}", p.edge_backend);
            println!("  Color backend: {}", p.color_backend);
            println!(
                "  Hue band: [{}, {}) above saturation {}",
                p.hue_policy.band_start, p.hue_policy.band_end, p.hue_policy.saturation_threshold
            );
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            if config_path.exists() {
                bail!(
                    "config file already exists: {} (use 'img-to-ascii config show' to view it)",
                    config_path.display()
                );
            }

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create config directory {}", parent.display())
                })?;
            }

            std::fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("failed to write {}", config_path.display()))?;
            println!("Created config file: {}", config_path.display());
        }
    }
    Ok(())
}
