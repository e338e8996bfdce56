use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use stride_core::batch::{parse_plan, preview};
use stride_core::zones::{configured_windows, zone_window};
use stride_core::*;

#[derive(Parser)]
#[command(name = "stride")]
#[command(about = "Compile coaching plans into platform workouts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Speed window (m/s) for a pace like 4:36 or a configured zone like MP
    Pace {
        pace: String,

        /// Seconds per km either side of the pace
        #[arg(long)]
        margin: Option<u32>,
    },

    /// List the configured training zones
    Zones,

    /// Compile a workout or plan file into upload documents
    Compile {
        file: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check a workout or plan file for problems the compiler would paper over
    Validate { file: PathBuf },

    /// Show a plan summary without uploading
    Preview { file: PathBuf },

    /// Compile and queue every workout of a plan in the outbox
    Upload {
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Refuse workouts that fail validation
        #[arg(long)]
        strict: bool,

        /// Outbox file (defaults to <data-dir>/outbox.jsonl)
        #[arg(long)]
        outbox: Option<PathBuf>,

        /// Report CSV (defaults to <data-dir>/uploads.csv)
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    stride_core::logging::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    match cli.command {
        Commands::Pace { pace, margin } => cmd_pace(&config, &pace, margin),
        Commands::Zones => cmd_zones(&config),
        Commands::Compile { file, pretty } => cmd_compile(&file, pretty),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Preview { file } => cmd_preview(&file),
        Commands::Upload {
            file,
            yes,
            strict,
            outbox,
            report,
        } => cmd_upload(&config, &file, yes, strict, outbox, report),
    }
}

fn cmd_pace(config: &Config, pace: &str, margin: Option<u32>) -> Result<()> {
    let window = zone_window(config, pace, margin)?;
    let margin = margin.unwrap_or(config.paces.default_margin_sec);

    println!("{} ±{}s/km", pace, margin);
    println!("  targetValueOne: {:.4} m/s (slowest)", window.min_speed);
    println!("  targetValueTwo: {:.4} m/s (fastest)", window.max_speed);
    Ok(())
}

fn cmd_zones(config: &Config) -> Result<()> {
    println!("Zones (±{}s/km):", config.paces.default_margin_sec);
    for (name, pace, window) in configured_windows(config)? {
        println!(
            "  {:<8} {:>5}/km  {:.4} - {:.4} m/s",
            name, pace, window.min_speed, window.max_speed
        );
    }
    Ok(())
}

/// A file holding either one workout object or a plan array
enum Input {
    Single(AbstractWorkout),
    Plan(Vec<PlannedWorkout>),
}

fn read_input(path: &Path) -> Result<Input> {
    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    if value.is_object() {
        Ok(Input::Single(serde_json::from_value(value)?))
    } else {
        Ok(Input::Plan(parse_plan(&contents)?))
    }
}

fn workouts_of(input: &Input) -> Vec<&AbstractWorkout> {
    match input {
        Input::Single(workout) => vec![workout],
        Input::Plan(plan) => plan.iter().map(|p| &p.workout).collect(),
    }
}

fn cmd_compile(file: &Path, pretty: bool) -> Result<()> {
    let input = read_input(file)?;
    let documents: Vec<CompiledWorkout> = workouts_of(&input)
        .into_iter()
        .map(compile_workout)
        .collect();

    let output = match (&input, pretty) {
        (Input::Single(_), false) => serde_json::to_string(&documents[0])?,
        (Input::Single(_), true) => serde_json::to_string_pretty(&documents[0])?,
        (Input::Plan(_), false) => serde_json::to_string(&documents)?,
        (Input::Plan(_), true) => serde_json::to_string_pretty(&documents)?,
    };
    println!("{}", output);
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<()> {
    let input = read_input(file)?;
    let workouts = workouts_of(&input);

    let mut total = 0;
    for workout in &workouts {
        let errors = validate_workout(workout);
        if errors.is_empty() {
            println!("✓ {}", workout.workout_name);
        } else {
            println!("✗ {}", workout.workout_name);
            for error in &errors {
                println!("  - {}", error);
            }
            total += errors.len();
        }
    }

    if total > 0 {
        return Err(Error::InvalidPlan(format!(
            "{} problem(s) in {}",
            total,
            file.display()
        )));
    }
    println!("\nAll {} workouts are valid.", workouts.len());
    Ok(())
}

fn cmd_preview(file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)?;
    let plan = parse_plan(&contents)?;
    println!("{}", preview(&plan));
    Ok(())
}

fn cmd_upload(
    config: &Config,
    file: &Path,
    yes: bool,
    strict: bool,
    outbox: Option<PathBuf>,
    report: Option<PathBuf>,
) -> Result<()> {
    let contents = std::fs::read_to_string(file)?;
    let plan = parse_plan(&contents)?;

    println!("{}", preview(&plan));

    if !yes && !confirm("\nReady to upload this plan? [y/N]: ")? {
        println!("Cancelled.");
        return Ok(());
    }

    let outbox_path = outbox.unwrap_or_else(|| config.outbox_path());
    let report_path = report.unwrap_or_else(|| config.data.data_dir.join("uploads.csv"));

    tracing::info!("Uploading {} workouts to {:?}", plan.len(), outbox_path);
    let mut platform = OutboxPlatform::new(&outbox_path);
    let policy = UploadPolicy {
        max_attempts: config.upload.max_attempts,
        strict,
    };

    let batch = upload_plan(&mut platform, &plan, &policy);
    stride_core::report::append_report_csv(&batch, &report_path)?;

    println!("\n{}", batch.summary());
    println!("\n  Outbox: {}", outbox_path.display());
    println!("  Report: {}", report_path.display());
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}
