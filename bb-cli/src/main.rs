use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use bb_core::rack::standard_rack;
use bb_core::{RulesLoader, Shot, Simulation, TableRules};

/// Rack a billiard table, strike the cue ball and run until every ball stops.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Rule set name; "standard" uses the compiled-in reference table
    #[arg(short, long, default_value = "standard")]
    rules: String,

    /// Directory holding rule set YAML files
    #[arg(long)]
    rules_dir: Option<PathBuf>,

    /// Stroke direction in degrees, measured from +x toward +y
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    angle: f64,

    /// Stroke strength (impulse magnitude), limited to 0..=500
    #[arg(short, long, default_value_t = 350.0)]
    strength: f64,

    /// Stop with an error if the table is still moving after this many ticks
    #[arg(long, default_value_t = 20_000)]
    max_ticks: usize,

    /// Print a YAML snapshot of every ball each N ticks
    #[arg(long)]
    trace: Option<usize>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_rules(args: &Args) -> Result<TableRules> {
    if args.rules == "standard" && args.rules_dir.is_none() {
        return Ok(TableRules::standard());
    }

    let dir = args
        .rules_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("rules"));
    let rules = RulesLoader::new(&dir)
        .load(&args.rules)
        .with_context(|| format!("failed to load rule set '{}' from {}", args.rules, dir.display()))?;
    Ok(rules)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let rules = load_rules(&args)?;
    info!("using rule set '{}'", rules.name);

    let balls = standard_rack(&rules);
    let mut table = Simulation::new(rules, balls).context("invalid starting layout")?;

    let shot = Shot::from_angle(args.angle, args.strength).clamped();
    table.apply_impulse(0, shot.impulse())?;

    let ticks = match args.trace {
        Some(every) if every > 0 => {
            let mut ticks = 0;
            while table.any_moving() {
                if ticks == args.max_ticks {
                    anyhow::bail!("table still moving after {} ticks", ticks);
                }
                table.tick();
                ticks += 1;
                if ticks % every == 0 {
                    println!("# tick {}", ticks);
                    print!("{}", serde_yaml::to_string(&table.snapshot())?);
                }
            }
            ticks
        }
        _ => table.run_until_rest(args.max_ticks)?,
    };

    println!(
        "# at rest after {} ticks ({:.2}s)",
        ticks,
        ticks as f64 * table.rules().tick
    );
    print!("{}", serde_yaml::to_string(&table.snapshot())?);

    Ok(())
}
