use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use olympic_bracket_sim::play_offs::PairingStrategy;
use olympic_bracket_sim::{Seeder, Simulation, TournamentConfig};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "olympic-bracket-sim", about = "Simulates a group stage and knockout tournament", author, version, long_about = None)]
struct Args {
    #[clap(default_value = "groups.json", help = "JSON file with the teams of every group")]
    input: PathBuf,
    #[clap(long, short = 's', action = ArgAction::Set, help = "Set random seed (any string)")]
    seed: Option<String>,
    #[clap(long, short = 'b', action = ArgAction::SetTrue, help = "Backtrack when the quarter-final draw reaches a dead end")]
    backtracking: bool,
    #[clap(long, short = 'j', action = ArgAction::SetTrue, help = "Print the results as JSON")]
    json: bool,
    #[clap(long, short = 'l', action = ArgAction::Set, default_value = "warn", help = "Set log level")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{l} - {m}\n")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(args.log_level))?;
    log4rs::init_config(config)?;

    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("couldn't read {}", args.input.display()))?;
    let tournament = TournamentConfig::from_json(&input)
        .with_context(|| format!("couldn't parse {}", args.input.display()))?;

    let seed = match args.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>().to_string();
            // Printed regardless of the log level, so that the run can be replayed
            eprintln!("seed: {seed}");
            seed
        }
    };
    info!("using seed {seed}");

    let pairing_strategy = if args.backtracking {
        PairingStrategy::Backtracking
    } else {
        PairingStrategy::FailFast
    };

    let report = Simulation::new(&tournament)
        .pairing_strategy(pairing_strategy)
        .evaluate(Seeder::from(seed.as_str()))
        .with_context(|| format!("simulation failed (seed {seed})"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    Ok(())
}
