#![deny(unsafe_code)]
//! CLI binary for the pixgrid sampling engine.
//!
//! Subcommands:
//! - `noise` renders fractal Perlin noise through a gradient to PNG
//! - `gradient` renders a horizontal gradient strip to PNG
//! - `modes` prints every wrap, interpolation and easing name
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

mod error;
mod snapshot;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use pixgrid_core::{
    AutoGradientParams, ColorGradient, Easing, GradientWrap, Grid, InterpolationMode, Perlin,
    Random, Rgba, Seed, WrapMode,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "pixgrid", about = "Pixel grid sampling and noise CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every command that colors values through a gradient.
#[derive(Args)]
struct GradientArgs {
    /// Comma-separated hex colors spaced evenly over [0, 1].
    #[arg(short, long, value_delimiter = ',', default_value = "#000000,#ffffff")]
    colors: Vec<String>,

    /// Auto-gradient parameters as a JSON object; replaces `--colors`.
    #[arg(long)]
    auto: Option<String>,

    /// Easing between evenly spaced colors.
    #[arg(short, long, default_value = "linear")]
    easing: Easing,

    /// Wrap rule for values outside the gradient (overrides `wrap` in `--auto`).
    #[arg(long)]
    gradient_wrap: Option<GradientWrap>,
}

#[derive(Subcommand)]
enum Command {
    /// Render fractal Perlin noise through a gradient and write a PNG.
    Noise {
        /// Image width in pixels.
        #[arg(short = 'W', long, default_value_t = 256)]
        width: usize,

        /// Image height in pixels.
        #[arg(short = 'H', long, default_value_t = 256)]
        height: usize,

        /// Seed for the permutation table: a number or any phrase.
        #[arg(long, default_value = "0")]
        seed: String,

        /// Noise octaves.
        #[arg(short, long, default_value_t = 4)]
        layers: u32,

        /// Frequency multiplier between octaves.
        #[arg(long, default_value_t = 2.0)]
        freq_factor: f64,

        /// Amplitude multiplier between octaves.
        #[arg(long, default_value_t = 0.5)]
        amp_factor: f64,

        /// Noise-space distance per pixel.
        #[arg(short, long, default_value_t = 0.02)]
        scale: f64,

        /// Smoothly shrink the noise by this factor before coloring.
        #[arg(long)]
        shrink: Option<f64>,

        /// Wrap mode used while shrinking.
        #[arg(long, default_value = "clamp")]
        wrap: WrapMode,

        /// Interpolation mode used while shrinking.
        #[arg(long, default_value = "bilinear")]
        interpolation: InterpolationMode,

        #[command(flatten)]
        gradient: GradientArgs,

        /// Output file path.
        #[arg(short, long, default_value = "noise.png")]
        output: PathBuf,
    },
    /// Render a horizontal gradient strip and write a PNG.
    Gradient {
        /// Strip width in pixels.
        #[arg(short = 'W', long, default_value_t = 512)]
        width: usize,

        /// Strip height in pixels.
        #[arg(short = 'H', long, default_value_t = 32)]
        height: usize,

        /// Gradient input at the left edge.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        from: f64,

        /// Gradient input at the right edge.
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        to: f64,

        #[command(flatten)]
        gradient: GradientArgs,

        /// Output file path.
        #[arg(short, long, default_value = "gradient.png")]
        output: PathBuf,
    },
    /// List wrap modes, interpolation modes, gradient wraps and easings.
    Modes,
}

/// Builds the gradient described by the shared options.
fn build_gradient(args: &GradientArgs) -> Result<ColorGradient, CliError> {
    let mut gradient = match &args.auto {
        Some(raw) => {
            let params: serde_json::Value = serde_json::from_str(raw)
                .map_err(|e| CliError::Input(format!("invalid --auto JSON: {e}")))?;
            ColorGradient::auto(&AutoGradientParams::from_json(&params)?)?
        }
        None => {
            let colors = args
                .colors
                .iter()
                .map(|c| Rgba::from_hex(c))
                .collect::<Result<Vec<_>, _>>()?;
            ColorGradient::uniform(
                colors,
                args.easing,
                args.gradient_wrap.unwrap_or_default(),
            )?
        }
    };
    if let Some(wrap) = args.gradient_wrap {
        gradient.set_wrap_mode(wrap);
    }
    Ok(gradient)
}

/// Value at column `x` of a strip running from `from` to `to`.
fn strip_value(x: usize, width: usize, from: f64, to: f64) -> f64 {
    let span = width.saturating_sub(1).max(1) as f64;
    from + (to - from) * x as f64 / span
}

fn names<T: ToString>(items: &[T]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Modes => {
            let wraps = names(&WrapMode::ALL);
            let interpolations = names(&InterpolationMode::ALL);
            let gradient_wraps = names(GradientWrap::ALL);
            let easings = names(Easing::ALL);
            if cli.json {
                let info = serde_json::json!({
                    "wrap": wraps,
                    "interpolation": interpolations,
                    "gradient_wrap": gradient_wraps,
                    "easing": easings,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Wrap modes:");
                println!("  {}", wraps.join(", "));
                println!("Interpolation modes:");
                println!("  {}", interpolations.join(", "));
                println!("Gradient wraps:");
                println!("  {}", gradient_wraps.join(", "));
                println!("Easings:");
                println!("  {}", easings.join(", "));
            }
        }
        Command::Noise {
            width,
            height,
            seed,
            layers,
            freq_factor,
            amp_factor,
            scale,
            shrink,
            wrap,
            interpolation,
            gradient,
            output,
        } => {
            let seed = Seed::from(seed.as_str());
            let gradient = build_gradient(&gradient)?;
            let perlin = Perlin::new(&mut Random::from_seed(&seed));

            let mut noise = Grid::from_fn(width, height, |c| {
                perlin.fractal(
                    c.x as f64 * scale,
                    c.y as f64 * scale,
                    layers,
                    freq_factor,
                    amp_factor,
                )
            })?
            .with_wrap_mode(wrap)
            .with_interpolation_mode(interpolation)?;
            if let Some(factor) = shrink {
                noise = noise.scale_smooth(factor, factor)?;
            }

            let image = noise.colorize(&gradient);
            snapshot::write_png(&image, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "command": "noise",
                    "width": image.width(),
                    "height": image.height(),
                    "seed": seed.value(),
                    "layers": layers,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered noise ({}x{}, {layers} layers, seed {seed}) -> {}",
                    image.width(),
                    image.height(),
                    output.display()
                );
            }
        }
        Command::Gradient {
            width,
            height,
            from,
            to,
            gradient,
            output,
        } => {
            let gradient = build_gradient(&gradient)?;
            let strip = Grid::from_fn(width, height, |c| strip_value(c.x, width, from, to))?;
            let image = strip.colorize(&gradient);
            snapshot::write_png(&image, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "command": "gradient",
                    "width": width,
                    "height": height,
                    "keyframes": gradient.keyframes().len(),
                    "wrap": gradient.wrap_mode().name(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered gradient ({width}x{height}, {} keyframes) -> {}",
                    gradient.keyframes().len(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
