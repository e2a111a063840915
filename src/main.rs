// main.rs
// Headless neutralization runner: H⁺ + OH⁻ -> H₂O in the unit square
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

use neutralization_sim::app::{self, format_table, Fanout, LogReporter, Reporter};
use neutralization_sim::config::{Preset, SimConfig, PARTICLES_PER_MOL};
use neutralization_sim::init_config::{InitConfig, ParticlesSection, TitrationSection};
use neutralization_sim::io::{self as sim_io, JsonlExporter};

#[derive(Parser)]
#[command(name = "neutralization_sim", version, about = "Particle model of an acid-base neutralization")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one simulation to completion
    Run(RunArgs),
    /// Write an example run file
    Config {
        /// Output TOML file
        output: PathBuf,
    },
    /// List parameter presets
    Presets,
}

#[derive(Args)]
struct RunArgs {
    /// Run file (TOML); flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of H⁺ particles
    #[arg(long, allow_negative_numbers = true)]
    acid: Option<i64>,
    /// Number of OH⁻ particles
    #[arg(long, allow_negative_numbers = true)]
    base: Option<i64>,

    /// Acid concentration in mol/L (titration mode)
    #[arg(long, requires = "acid_volume_ml", allow_negative_numbers = true)]
    acid_concentration: Option<f64>,
    /// Acid volume in mL (titration mode)
    #[arg(long, allow_negative_numbers = true)]
    acid_volume_ml: Option<f64>,
    /// Base concentration in mol/L (titration mode)
    #[arg(long, requires = "base_volume_ml", allow_negative_numbers = true)]
    base_concentration: Option<f64>,
    /// Base volume in mL (titration mode)
    #[arg(long, allow_negative_numbers = true)]
    base_volume_ml: Option<f64>,
    /// Particles per mol for titration mode
    #[arg(long, default_value_t = PARTICLES_PER_MOL)]
    particles_per_mol: f64,

    /// Parameter preset (classic, star, pulse, simplified)
    #[arg(long)]
    preset: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Pause between frames in milliseconds (0 for as fast as possible)
    #[arg(long)]
    frame_delay_ms: Option<u64>,

    /// Log the table every N ticks (reaction ticks are always logged)
    #[arg(long, default_value_t = 1)]
    table_every: u64,
    /// Write every frame as JSON lines (gzip if the name ends in .gz)
    #[arg(long)]
    export: Option<PathBuf>,
    /// Save the final run state as JSON (gzip if the name ends in .gz)
    #[arg(long)]
    save: Option<PathBuf>,
    /// Resume a run saved with --save instead of starting a new one
    #[arg(long, conflicts_with_all = ["acid", "base", "acid_concentration", "base_concentration"])]
    resume: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Config { output } => write_example(output),
        Command::Presets => {
            list_presets();
            Ok(())
        }
    }
}

fn write_example(output: PathBuf) -> Result<()> {
    let text = InitConfig::example().to_toml_string()?;
    std::fs::write(&output, text).with_context(|| format!("writing {}", output.display()))?;
    println!("Run file written: {}", output.display());
    Ok(())
}

fn list_presets() {
    for preset in Preset::ALL {
        let cfg = SimConfig::from_preset(preset);
        println!(
            "{:<12} shape={:?} effect {} -> {} (+{}/tick)",
            preset.name(),
            cfg.effect_shape,
            cfg.effect_min_size,
            cfg.effect_max_size,
            cfg.effect_growth_rate
        );
    }
}

/// Fold command-line flags over the run file.
fn resolve(args: &RunArgs) -> Result<InitConfig> {
    let mut init = match &args.config {
        Some(path) => InitConfig::load_from_file(path)
            .with_context(|| format!("loading run file {}", path.display()))?,
        None => InitConfig::default(),
    };

    if let Some(name) = &args.preset {
        let Some(preset) = Preset::from_name(name) else {
            bail!("unknown preset '{}'", name);
        };
        init.simulation.preset = Some(preset);
    }

    let counts = (args.acid, args.base);
    let titration = (
        args.acid_concentration,
        args.acid_volume_ml,
        args.base_concentration,
        args.base_volume_ml,
    );
    match (counts, titration) {
        ((Some(acid), Some(base)), (None, None, None, None)) => {
            init.particles = Some(ParticlesSection { acid, base });
            init.titration = None;
        }
        ((None, None), (Some(ac), Some(av), Some(bc), Some(bv))) => {
            init.titration = Some(TitrationSection {
                acid_concentration: ac,
                acid_volume_ml: av,
                base_concentration: bc,
                base_volume_ml: bv,
                particles_per_mol: Some(args.particles_per_mol),
            });
            init.particles = None;
        }
        ((None, None), (None, None, None, None)) => {}
        _ => bail!("give --acid and --base, or all four titration flags"),
    }

    if args.seed.is_some() {
        init.run.seed = args.seed;
    }
    if args.max_ticks.is_some() {
        init.run.max_ticks = args.max_ticks;
    }
    if args.frame_delay_ms.is_some() {
        init.run.frame_delay_ms = args.frame_delay_ms;
    }
    Ok(init)
}

fn run(args: RunArgs) -> Result<()> {
    let log_reporter = LogReporter::new(args.table_every);
    let mut exporter = match &args.export {
        Some(path) => Some(
            JsonlExporter::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => None,
    };

    let driver = match &args.resume {
        Some(path) => {
            let saved = sim_io::load_run(path).with_context(|| format!("loading {}", path.display()))?;
            let run = saved.into_run(args.seed)?;
            let mut driver = app::Driver::new(run.config.clone(), reporter(log_reporter, exporter.as_mut()))
                .with_frame_delay(Duration::from_millis(args.frame_delay_ms.unwrap_or(0)));
            if let Some(max) = args.max_ticks {
                driver = driver.with_max_ticks(max);
            }
            driver.start_run(run)?;
            driver.run_to_completion()?;
            driver
        }
        None => {
            let settings = resolve(&args)?.settings()?;
            app::run(&settings, reporter(log_reporter, exporter.as_mut()))?
        }
    };

    if let Some(completion) = driver.completion() {
        println!(
            "Finished after {} ticks ({:?}), {} pairs reacted",
            completion.ticks, completion.reason, completion.total_reacted
        );
        print!("{}", format_table(&completion.counts));
    }
    if let Some(path) = &args.save {
        if let Some(run) = driver.run() {
            sim_io::save_run(path, run).with_context(|| format!("saving {}", path.display()))?;
            info!("run state saved to {}", path.display());
        }
    }
    drop(driver);

    if let Some(exporter) = exporter {
        let path = exporter.path().to_path_buf();
        let lines = exporter.finish()?;
        info!("{} frames exported to {}", lines, path.display());
    }
    Ok(())
}

fn reporter<'a>(log: LogReporter, exporter: Option<&'a mut JsonlExporter>) -> Box<dyn Reporter + 'a> {
    match exporter {
        Some(exporter) => Box::new(Fanout(log, exporter)),
        None => Box::new(log),
    }
}
