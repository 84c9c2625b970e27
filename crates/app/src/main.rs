//! Scribble - native harness for the sketch canvas
//!
//! Replays a stroke script through the same drawing surface the browser uses,
//! preprocesses the result, optionally dumps the canvas and classifier input as
//! PNG, and classifies the drawing when model weights are given.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueHint};
use image::RgbaImage;
use painting::{DrawingSurface, Preprocessed, Preprocessor};
use scribble_classifier::{ClassificationDispatcher, CnnClassifier, CnnConfig, Prediction};
use scribble_config::CanvasConfig;
use scribble_ipc::{CanvasToUi, to_json};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod script;

use script::{load_script, replay};

#[derive(Debug, Parser)]
#[command(author, version, about = "Replay strokes on the Scribble canvas and classify the drawing")]
struct Cli {
    /// Stroke script (JSON list of {"stroke": [[x, y], ...]}, "undo", "clear")
    #[arg(long, value_hint = ValueHint::FilePath)]
    strokes: PathBuf,

    /// Canvas config JSON (defaults to $SCRIBBLE_CONFIG, then built-in values)
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Classifier weights (safetensors)
    #[arg(long, value_hint = ValueHint::FilePath)]
    model: Option<PathBuf>,

    /// Write the rendered canvas as PNG
    #[arg(long, value_hint = ValueHint::FilePath)]
    dump_canvas: Option<PathBuf>,

    /// Write the classifier input as PNG
    #[arg(long, value_hint = ValueHint::FilePath)]
    dump_input: Option<PathBuf>,

    /// Print the prediction as a canvas-to-UI JSON message
    #[arg(long)]
    json: bool,

    /// Log per-event detail
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = config::config_path(cli.config.as_deref());
    let config = config::load_config(config_path.as_deref())?;

    let drawing = draw(&cli, &config)?;

    let Some(model_path) = &cli.model else {
        match &drawing {
            Preprocessed::Empty => println!("Drawing is empty"),
            Preprocessed::Ready { bounds, .. } => println!(
                "Drawing bounds: x {}..={}, y {}..={} (no model given)",
                bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max
            ),
        }
        return Ok(());
    };

    let model = load_model(model_path, &config)?;
    let prediction = ClassificationDispatcher::new()
        .classify(&model, &drawing)
        .await
        .ok_or_else(|| anyhow!("Classifier is not ready"))?;
    report(&prediction, &config, cli.json)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Replay the script and produce the classifier input, writing any dumps
fn draw(cli: &Cli, config: &CanvasConfig) -> Result<Preprocessed> {
    let steps = load_script(&cli.strokes)?;
    let mut surface = DrawingSurface::from_config(config).context("Invalid canvas size")?;
    let summary = replay(&mut surface, &steps);
    info!(
        "Replayed {} steps: {} renders, {} classification requests, {} undo levels",
        summary.steps,
        summary.renders,
        summary.classify_requests,
        surface.undo_count()
    );

    if let Some(path) = &cli.dump_canvas {
        save_canvas(&surface, path)?;
    }

    let drawing = Preprocessor::from_config(config).prepare(surface.buffer());
    if let Some(path) = &cli.dump_input {
        match drawing.image() {
            Some(image) => {
                image
                    .to_gray_image()
                    .save(path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Wrote classifier input to {}", path.display());
            }
            None => info!("Drawing is empty, not writing {}", path.display()),
        }
    }
    Ok(drawing)
}

fn save_canvas(surface: &DrawingSurface, path: &Path) -> Result<()> {
    let image = RgbaImage::from_raw(surface.width(), surface.height(), surface.rgba_bytes())
        .ok_or_else(|| anyhow!("Canvas buffer has the wrong size"))?;
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote canvas to {}", path.display());
    Ok(())
}

fn load_model(path: &Path, config: &CanvasConfig) -> Result<CnnClassifier> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read model {}", path.display()))?;
    CnnClassifier::from_safetensors(bytes, CnnConfig::from(config))
        .with_context(|| format!("Failed to load model {}", path.display()))
}

fn report(prediction: &Prediction, config: &CanvasConfig, json: bool) -> Result<()> {
    let update = prediction.to_update(config);
    if json {
        println!("{}", to_json(&CanvasToUi::Prediction(update))?);
        return Ok(());
    }

    println!("Prediction: {} ({:?})", update.label, update.source);
    for (index, score) in update.scores.iter().enumerate() {
        println!("  {:>8}  {:>10.4}", config.label(index), score);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("scribble-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "scribble",
            "--strokes",
            "digit.json",
            "--dump-input",
            "input.png",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.strokes, PathBuf::from("digit.json"));
        assert_eq!(cli.dump_input, Some(PathBuf::from("input.png")));
        assert!(cli.model.is_none());
        assert!(cli.json);

        assert!(Cli::try_parse_from(["scribble"]).is_err());
    }

    #[test]
    fn test_draw_writes_dumps() {
        let strokes = temp_path("strokes.json");
        let canvas = temp_path("canvas.png");
        let input = temp_path("input.png");
        std::fs::write(&strokes, r#"[{"stroke": [[100, 100], [200, 200]]}]"#).unwrap();

        let cli = Cli::try_parse_from([
            OsStr::new("scribble"),
            OsStr::new("--strokes"),
            strokes.as_os_str(),
            OsStr::new("--dump-canvas"),
            canvas.as_os_str(),
            OsStr::new("--dump-input"),
            input.as_os_str(),
        ])
        .unwrap();
        let drawing = draw(&cli, &CanvasConfig::default()).unwrap();
        assert!(!drawing.is_empty());

        let canvas_image = image::open(&canvas).unwrap();
        assert_eq!((canvas_image.width(), canvas_image.height()), (512, 512));
        let input_image = image::open(&input).unwrap();
        assert_eq!((input_image.width(), input_image.height()), (28, 28));

        for path in [strokes, canvas, input] {
            std::fs::remove_file(path).unwrap();
        }
    }

    #[test]
    fn test_empty_script_skips_input_dump() {
        let strokes = temp_path("empty.json");
        let input = temp_path("empty-input.png");
        std::fs::write(&strokes, "[]").unwrap();

        let cli = Cli {
            strokes: strokes.clone(),
            config: None,
            model: None,
            dump_canvas: None,
            dump_input: Some(input.clone()),
            json: false,
            verbose: false,
        };
        assert!(draw(&cli, &CanvasConfig::default()).unwrap().is_empty());
        assert!(!input.exists());

        std::fs::remove_file(strokes).unwrap();
    }
}
