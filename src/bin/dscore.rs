//! CLI entry point for the `dscore` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use discourse_score::cli::commands;
use discourse_score::config::{load_config, EngineConfig};
use discourse_score::types::{Direction, Location, LocationType, Placement, ScoreError};

#[derive(Parser)]
#[command(
    name = "dscore",
    about = "Informed-vote scoring, reply ranking and attention calibration"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Engine configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable info-level logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty snapshot file
    Create {
        /// Path to the snapshot file to create
        file: PathBuf,
    },
    /// Add a post or reply
    Post {
        /// Path to the snapshot file
        file: PathBuf,
        /// Post ID
        post_id: u64,
        /// Parent post ID (makes this a reply)
        #[arg(long)]
        parent: Option<u64>,
        /// Quality score used as ranking tie-break
        #[arg(long, default_value = "0.0")]
        score: f64,
    },
    /// Record a vote
    Vote {
        /// Path to the snapshot file
        file: PathBuf,
        /// Voter ID
        voter_id: u64,
        /// Target post ID
        target_id: u64,
        /// Direction: up, down, neutral
        direction: String,
        /// Note shown to the voter
        #[arg(long)]
        note: Option<u64>,
        /// Location type the target was displayed in
        #[arg(long)]
        location: Option<String>,
        /// One-based rank of the display slot
        #[arg(long, default_value = "1")]
        rank: u32,
        /// The slot was chosen at random (exploration)
        #[arg(long)]
        exploration: bool,
        /// Vote time (Unix microseconds); defaults to now
        #[arg(long)]
        timestamp: Option<u64>,
    },
    /// Display information about a snapshot
    Info {
        /// Path to the snapshot file
        file: PathBuf,
    },
    /// Show the ranked reply tree under a post
    Rank {
        /// Path to the snapshot file
        file: PathBuf,
        /// Post ID
        post_id: u64,
    },
    /// Show informed and uninformed approval of a post
    Probability {
        /// Path to the snapshot file
        file: PathBuf,
        /// Post ID
        post_id: u64,
    },
    /// Show the effect of a reply on a target post
    Effect {
        /// Path to the snapshot file
        file: PathBuf,
        /// Target post ID
        target_id: u64,
        /// Reply post ID
        reply_id: u64,
    },
    /// Show the critical thread below a post
    Thread {
        /// Path to the snapshot file
        file: PathBuf,
        /// Post ID
        post_id: u64,
    },
    /// Show calibrated vote shares per display location
    Attention {
        /// Path to the snapshot file
        file: PathBuf,
        /// Restrict to one location type
        #[arg(long)]
        location: Option<String>,
        /// Rank within the location type
        #[arg(long, default_value = "1")]
        rank: u32,
    },
}

fn parse_location(name: &str, rank: u32) -> Location {
    let location_type = match LocationType::from_name(name) {
        Some(lt) => lt,
        None => {
            eprintln!("Invalid location type: {}", name);
            process::exit(3);
        }
    };
    match Location::new(location_type, rank) {
        Ok(loc) => loc,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(3);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(2);
            }
        },
        None => EngineConfig::default(),
    };

    let result = match cli.command {
        Commands::Create { file } => commands::cmd_create(&file),
        Commands::Post {
            file,
            post_id,
            parent,
            score,
        } => commands::cmd_post(&file, post_id, parent, score, json),
        Commands::Vote {
            file,
            voter_id,
            target_id,
            direction,
            note,
            location,
            rank,
            exploration,
            timestamp,
        } => {
            let dir = match Direction::from_name(&direction) {
                Some(d) => d,
                None => {
                    eprintln!("Invalid direction: {}", direction);
                    process::exit(3);
                }
            };
            let placement = location.map(|name| {
                let loc = parse_location(&name, rank);
                if exploration {
                    Placement::exploration(loc)
                } else {
                    Placement::ranked(loc)
                }
            });
            commands::cmd_vote(
                &file, &config, voter_id, target_id, dir, note, placement, timestamp, json,
            )
        }
        Commands::Info { file } => commands::cmd_info(&file, &config, json),
        Commands::Rank { file, post_id } => commands::cmd_rank(&file, &config, post_id, json),
        Commands::Probability { file, post_id } => {
            commands::cmd_probability(&file, &config, post_id, json)
        }
        Commands::Effect {
            file,
            target_id,
            reply_id,
        } => commands::cmd_effect(&file, &config, target_id, reply_id, json),
        Commands::Thread { file, post_id } => commands::cmd_thread(&file, &config, post_id, json),
        Commands::Attention {
            file,
            location,
            rank,
        } => {
            let loc = location.map(|name| parse_location(&name, rank));
            commands::cmd_attention(&file, &config, loc, json)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            ScoreError::Io(_) => 1,
            ScoreError::Json(_) | ScoreError::Toml(_) => 2,
            ScoreError::PostNotFound(_) | ScoreError::ParentNotFound { .. } => 4,
            _ => 5,
        };
        process::exit(code);
    }
}
