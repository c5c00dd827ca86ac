#![deny(unsafe_code)]
//! Headless renderer for the motes particle effects.
//!
//! Subcommands:
//! - `render <effect>`: drive an effect through its animator for N frames and
//!   write a PNG (optionally one per frame)
//! - `list`: print available effects and field presets

mod error;

use clap::{ArgAction, Args, Parser, Subcommand};
use error::CliError;
use motes_core::{Animator, DeviceClass, ManualScheduler, Seed, SimError, Simulation};
use motes_engines::raster::Raster;
use motes_engines::snapshot::{load_image, write_png};
use motes_engines::EffectKind;
use motes_field::FieldConfig;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info, Level};

#[derive(Parser)]
#[command(name = "motes", about = "Headless renderer for motes particle effects")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log verbosity: -v info, -vv debug, -vvv trace.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an effect for N frames and write a PNG snapshot.
    Render(RenderArgs),
    /// List available effects and field presets.
    List,
}

#[derive(Args)]
struct RenderArgs {
    /// Effect name ("field" or "reveal"). Not needed with --scene.
    effect: Option<String>,

    /// Surface width in pixels (the reveal effect uses the image size).
    #[arg(short = 'W', long, default_value_t = 1280)]
    width: usize,

    /// Surface height in pixels.
    #[arg(short = 'H', long, default_value_t = 720)]
    height: usize,

    /// Number of animation frames to run.
    #[arg(short = 'n', long, default_value_t = 120)]
    frames: usize,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Device tier ("constrained"/"mobile" or "standard"/"desktop").
    /// Derived from the width when omitted.
    #[arg(short, long)]
    device: Option<String>,

    /// Effect parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Source image for the reveal effect (PNG or JPEG).
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Scene file (JSON seed); replaces effect, size, seed, device,
    /// params and frames.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Output file path.
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Also write every frame as frame_NNNNN.png into this directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,
}

/// Outcome of a render, reported on stdout.
#[derive(Debug)]
struct RenderReport {
    seed: Seed,
    particles: usize,
    frames_written: usize,
}

/// Builds the run description from a scene file or from the flags.
fn parse_seed(args: &RenderArgs) -> Result<Seed, CliError> {
    if let Some(path) = &args.scene {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
        return serde_json::from_str(&text)
            .map_err(|e| CliError::Input(format!("invalid scene {}: {e}", path.display())));
    }

    let effect = args
        .effect
        .as_deref()
        .ok_or_else(|| CliError::Input("an effect name or --scene is required".into()))?;
    let params: serde_json::Value = serde_json::from_str(&args.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let device = args
        .device
        .as_deref()
        .map(|name| {
            DeviceClass::from_name(name)
                .ok_or_else(|| CliError::Input(format!("unknown device class: {name}")))
        })
        .transpose()?;

    let mut s = Seed::new(effect, args.width, args.height, args.seed);
    s.params = params;
    s.frames = args.frames;
    s.device = device;
    Ok(s)
}

/// Drives one effect through a manually clocked animator and writes PNGs.
fn render(
    mut seed: Seed,
    image: Option<&Path>,
    output: &Path,
    frames_dir: Option<&Path>,
) -> Result<RenderReport, CliError> {
    let mut effect = EffectKind::from_seed(&seed)?;

    match (image, effect.as_reveal_mut()) {
        (Some(path), Some(reveal)) => {
            let img = load_image(path)?;
            reveal.load(&img);
            seed.width = img.width();
            seed.height = img.height();
        }
        (None, Some(_)) => {
            return Err(CliError::Input(format!(
                "effect {} needs --image",
                seed.effect
            )))
        }
        (Some(_), None) => {
            return Err(CliError::Input(format!(
                "effect {} does not take --image",
                seed.effect
            )))
        }
        (None, None) => {}
    }
    seed.validate()?;

    let mut raster = Raster::new(seed.width, seed.height)?;
    if let Some(dir) = frames_dir {
        std::fs::create_dir_all(dir)?;
    }

    let clock = ManualScheduler::new();
    let warmup = effect.warmup();
    let particles = effect.particle_count();
    let mut anim = Animator::new(effect, clock.clone());
    anim.start_after(warmup)?;
    info!(
        effect = %seed.effect,
        particles,
        warmup_ms = warmup.as_millis() as u64,
        "animation scheduled; warm-up is skipped when rendering headless"
    );

    let mut frames_written = 0;
    for i in 0..seed.frames {
        let handle = clock
            .fire_next()
            .ok_or_else(|| SimError::Scheduler("no frame pending".into()))?;
        anim.tick(handle)?;
        anim.paint(&mut raster);
        if let Some(dir) = frames_dir {
            write_png(&raster, &dir.join(format!("frame_{i:05}.png")))?;
            frames_written += 1;
        }
    }
    if seed.frames == 0 {
        anim.paint(&mut raster);
    }
    debug!(frames = anim.frames(), "render loop finished");
    anim.dispose();

    write_png(&raster, output)?;
    Ok(RenderReport {
        seed,
        particles,
        frames_written,
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let effects = EffectKind::list_effects();
            let presets = FieldConfig::preset_names();
            if cli.json {
                let info = serde_json::json!({
                    "effects": effects,
                    "presets": presets,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Effects:");
                for name in effects {
                    println!("  {name}");
                }
                println!("Field presets:");
                println!("  {}", presets.join(", "));
            }
        }
        Command::Render(args) => {
            let seed = parse_seed(&args)?;
            let output = &args.output;
            let report = render(
                seed,
                args.image.as_deref(),
                output,
                args.frames_dir.as_deref(),
            )?;

            if cli.json {
                let info = serde_json::json!({
                    "seed": report.seed,
                    "particles": report.particles,
                    "frames_written": report.frames_written,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let s = &report.seed;
                eprintln!(
                    "rendered {} ({}x{}, {} particles, {} frames, seed {}) -> {}",
                    s.effect,
                    s.width,
                    s.height,
                    report.particles,
                    s.frames,
                    s.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
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
