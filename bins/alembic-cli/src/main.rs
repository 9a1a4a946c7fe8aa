//! alembic-cli: command-line distillation calculator.
//!
//! Runs the same calculations as the bot and reads/writes the same settings
//! file, so constants set here are seen by the bot and vice versa.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

use alembic_core::fractions::{calculate_fractions, validate_batch};
use alembic_core::interp::LookupTable;
use alembic_core::report::BatchReport;
use alembic_core::settings::{SettingsStore, UserConstants, UserId};
use alembic_core::speed::SpeedModel;
use alembic_core::strength::distillate_strength;
use alembic_core::tables::{get_correction_table, get_liquid_table, get_vapor_table};
use alembic_store::{default_settings_path, JsonFileStore};

/// Fractional distillation calculator.
#[derive(Parser)]
#[command(name = "alembic-cli")]
#[command(version, about = "Distillate strength, cut volumes and collection rates.")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Settings file (default: <data dir>/alembic/user_data.json).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// User whose constants are read or written.
    #[arg(long, global = true, default_value_t = 0, allow_negative_numbers = true)]
    user: i64,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Distillate strength at 20 °C from still temperatures.
    Strength(StrengthArgs),
    /// Heads, body, pre-tails and tails volumes for a batch.
    Fractions(FractionsArgs),
    /// Recommended collection rate.
    Speed(SpeedArgs),
    /// Batch report from the saved constants.
    Report,
    /// Show or change the saved constants.
    Constants {
        #[command(subcommand)]
        action: ConstantsAction,
    },
    /// Print an equilibrium or correction table.
    Tables {
        #[arg(value_enum, default_value = "vapor")]
        table: TableKind,
    },
}

#[derive(Args)]
struct StrengthArgs {
    /// Cube (liquid) temperature, °C.
    cube_temp: f64,
    /// Vapor temperature at the still head, °C.
    vapor_temp: f64,
    /// Distillate temperature when measured, °C.
    distillate_temp: f64,
}

#[derive(Args)]
struct FractionsArgs {
    /// Batch volume, liters.
    volume: f64,
    /// Batch strength, % v/v.
    strength: f64,
}

#[derive(Args)]
struct SpeedArgs {
    /// Raw spirit charge (banded model) or batch volume (flat model), liters.
    volume: f64,

    /// Rate model (banded or flat).
    #[arg(long, default_value = "banded")]
    model: SpeedModel,

    /// Cube volume in liters (default: from the saved constants).
    #[arg(long)]
    cube_volume: Option<f64>,
}

#[derive(Subcommand)]
enum ConstantsAction {
    /// Show the constants in use.
    Show,
    /// Save new constants.
    Set(SetConstantsArgs),
}

#[derive(Args)]
struct SetConstantsArgs {
    /// Cube volume, liters (20-100).
    cube_volume: f64,
    /// Heads, % of batch.
    head_percentage: f64,
    /// Body, % of batch.
    body_percentage: f64,
    /// Pre-tails, % of batch.
    pre_tail_percentage: f64,
    /// Tails, % of batch.
    tail_percentage: f64,
    /// Average head strength, % (76-95).
    average_head_strength: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum TableKind {
    Liquid,
    Vapor,
    Correction,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.log_format);

    let settings_path = cli.global.settings.clone().unwrap_or_else(default_settings_path);
    let store = JsonFileStore::open(settings_path);
    debug!(path = %store.path().display(), users = store.len(), "using settings file");

    let output = run(cli.command, &cli.global, &store)?;
    println!("{output}");
    Ok(())
}

fn run(command: Commands, global: &GlobalArgs, store: &dyn SettingsStore) -> Result<String> {
    let user = UserId(global.user);
    match command {
        Commands::Strength(args) => strength(args, global.json),
        Commands::Fractions(args) => fractions(args, store.resolve(user), global.json),
        Commands::Speed(args) => speed(args, store.resolve(user), global.json),
        Commands::Report => report(store, user, global.json),
        Commands::Constants { action } => match action {
            ConstantsAction::Show => constants_show(store, user, global.json),
            ConstantsAction::Set(args) => constants_set(args, store, user),
        },
        Commands::Tables { table } => Ok(tables(table)),
    }
}

fn to_json(value: &impl serde::Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to encode JSON output")
}

/// Distillate strength normalised to 20 °C.
fn strength(args: StrengthArgs, json: bool) -> Result<String> {
    let reading = distillate_strength(args.cube_temp, args.vapor_temp, args.distillate_temp)
        .context("Cannot compute distillate strength")?;
    if json {
        return to_json(&reading);
    }
    Ok(format!(
        "Cube liquid:  {:.2}%\n\
         Vapor:        {:.2}%\n\
         Correction:   {:+.2}\n\
         Strength at 20 °C: {:.2}%",
        reading.liquid_pct, reading.vapor_pct, reading.correction, reading.corrected_pct
    ))
}

fn fractions(args: FractionsArgs, constants: UserConstants, json: bool) -> Result<String> {
    validate_batch(args.volume, args.strength).context("Invalid batch")?;
    let f = calculate_fractions(args.volume, args.strength, &constants);
    if json {
        return to_json(&f);
    }
    Ok(format!(
        "Absolute alcohol:            {:.2} L\n\
         Heads (by volume):           {:.2} L\n\
         Heads (by absolute alcohol): {:.2} L\n\
         Body:                        {:.2} L\n\
         Pre-tails:                   {:.2} L\n\
         Tails:                       {:.2} L",
        f.absolute_alcohol, f.heads_by_volume, f.heads_by_alcohol, f.body, f.pre_tails, f.tails
    ))
}

fn speed(args: SpeedArgs, constants: UserConstants, json: bool) -> Result<String> {
    let cube_volume = args.cube_volume.unwrap_or(constants.cube_volume);
    let (min_rate, max_rate) = args
        .model
        .rates(cube_volume, args.volume)
        .context("Cannot compute collection rate")?;
    if json {
        return to_json(&serde_json::json!({
            "model": args.model,
            "cube_volume": cube_volume,
            "min_rate": min_rate,
            "max_rate": max_rate,
        }));
    }
    Ok(format!(
        "Minimum collection rate: {min_rate:.2} L/h\nMaximum collection rate: {max_rate:.2} L/h"
    ))
}

fn report(store: &dyn SettingsStore, user: UserId, json: bool) -> Result<String> {
    let Some(constants) = store.load(user) else {
        anyhow::bail!("No saved constants for user {user}. Set them with `constants set`.");
    };
    let r = BatchReport::build(&constants).context("Saved constants are out of range")?;
    if json {
        return to_json(&r);
    }
    Ok(format!(
        "Raw spirit:  {:.2} L (cube {} L)\n\
         Heads:       {:.2} L\n\
         Body:        {:.2} L\n\
         Pre-tails:   {:.2} L\n\
         Tails:       {:.2} L\n\
         Rate:        {:.2}-{:.2} L/h",
        r.raw_spirit_volume,
        r.constants.cube_volume,
        r.heads,
        r.body,
        r.pre_tails,
        r.tails,
        r.min_rate,
        r.max_rate
    ))
}

fn constants_show(store: &dyn SettingsStore, user: UserId, json: bool) -> Result<String> {
    let saved = store.load(user);
    let c = saved.unwrap_or_default();
    if json {
        return to_json(&c);
    }
    let source = if saved.is_some() { "saved" } else { "defaults" };
    Ok(format!(
        "Constants for user {user} ({source}):\n\
         cube_volume            {}\n\
         head_percentage        {}\n\
         body_percentage        {}\n\
         pre_tail_percentage    {}\n\
         tail_percentage        {}\n\
         average_head_strength  {}",
        c.cube_volume,
        c.head_percentage,
        c.body_percentage,
        c.pre_tail_percentage,
        c.tail_percentage,
        c.average_head_strength
    ))
}

fn constants_set(args: SetConstantsArgs, store: &dyn SettingsStore, user: UserId) -> Result<String> {
    let constants = UserConstants::from_values([
        args.cube_volume,
        args.head_percentage,
        args.body_percentage,
        args.pre_tail_percentage,
        args.tail_percentage,
        args.average_head_strength,
    ])
    .context("Invalid constants")?;
    store
        .save(user, constants)
        .context("Failed to save constants")?;
    Ok(format!("Constants saved for user {user}."))
}

fn tables(kind: TableKind) -> String {
    let (table, header): (&LookupTable, &str) = match kind {
        TableKind::Liquid => (get_liquid_table(), "temp °C   liquid %"),
        TableKind::Vapor => (get_vapor_table(), "temp °C   vapor %"),
        TableKind::Correction => (get_correction_table(), "temp °C   correction"),
    };
    let mut out = String::from(header);
    for (key, value) in table.iter() {
        out.push_str(&format!("\n{key:>7.2}   {value:>6.2}"));
    }
    out
}

/// Warnings and above on stderr by default, so stdout carries only results.
fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
