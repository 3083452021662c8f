// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for single games and batch simulation
// ═══════════════════════════════════════════════════════════════════════

use clap::{Parser, Subcommand};
use pechenka_agents::Agent;
use pechenka_engine::{Game, GameOptions};
use pechenka_tournament::{drive, make_agents, player_ids, run_batch, AgentKind, BatchConfig, RunError};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;


#[derive(Parser)]
#[command(name = "pechenka-runner", about = "Pechenka hidden-role card game simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game with automated players
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, default_value_t = 4)]
        players: usize,
        /// Agent type: "random", "heuristic" or "mixed"
        #[arg(short, long, default_value = "random")]
        agent: AgentKind,
        /// Rounds to play; defaults to one per player
        #[arg(short, long)]
        rounds: Option<u32>,
        /// Print the final JSON snapshot
        #[arg(long)]
        dump: bool,
        /// Emit engine events through tracing: lifecycle at info, each
        /// card and resolution at debug (raise with RUST_LOG=debug)
        #[arg(long)]
        log: bool,
    },
    /// Run many seeded games in parallel
    Batch {
        #[arg(short, long, default_value_t = 100)]
        games: u32,
        #[arg(short, long, default_value_t = 4)]
        players: usize,
        /// Agent type: "random", "heuristic" or "mixed"
        #[arg(short, long, default_value = "random")]
        agent: AgentKind,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long)]
        rounds: Option<u32>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Play { seed, players, agent, rounds, dump, log } => cmd_play(seed, players, agent, rounds, dump, log),
        Commands::Batch { games, players, agent, seed, rounds, json } => {
            cmd_batch(games, players, agent, seed, rounds, json);
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Game error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` directives when they parse, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn cmd_play(
    seed: u64,
    player_count: usize,
    agent: AgentKind,
    rounds: Option<u32>,
    dump: bool,
    log: bool,
) -> Result<(), RunError> {
    println!("=== Pechenka ===\n");
    println!("Running single game: seed={}, players={}, agent={:?}\n", seed, player_count, agent);

    let ids = player_ids(player_count);
    let mut agents = make_agents(agent, &ids, seed);
    let options = GameOptions { seed: Some(seed), max_rounds: rounds, enable_logging: log };
    let mut game = Game::new(ids.iter().cloned(), options)?;
    let decisions = drive(&mut game, &mut agents, 10_000)?;
    let result = game.end_game();

    println!("Game finished after {} rounds, {} decisions.", game.current_round(), decisions);
    println!("  Winner: {} with {} coins", result.winner, result.winner_coins);
    println!();
    println!("  Final standings:");
    for (score, agent) in result.final_scores.iter().zip(&agents) {
        println!("    {:4} {:10} -- coins: {}", score.id, agent.name(), score.coins);
    }

    if dump {
        println!();
        println!("{}", game.serialize()?);
    }
    Ok(())
}

fn cmd_batch(games: u32, players: usize, agent: AgentKind, seed: u64, rounds: Option<u32>, json: bool) {
    let config = BatchConfig {
        games,
        players,
        agent,
        base_seed: seed,
        max_rounds: rounds,
        ..Default::default()
    };
    let summary = run_batch(&config);

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("could not encode summary: {}", e),
        }
        return;
    }

    println!("=== Batch: {} games, {} players, agent={:?} ===\n", games, players, agent);
    for (seed, message) in &summary.errors {
        eprintln!("Game seed {}: ERROR -- {}", seed, message);
    }
    println!("--- Summary ({} completed, {} errors) ---", summary.completed, summary.errors.len());
    for seat in &summary.seats {
        let pct = if summary.completed > 0 { seat.wins as f64 / summary.completed as f64 * 100.0 } else { 0.0 };
        println!(
            "  {:4}: {:>4} wins ({:.1}%), mean coins {:.2}",
            seat.player_id, seat.wins, pct, seat.mean_coins
        );
    }
    for (name, wins) in &summary.agent_wins {
        println!("  {} agents won {} games", name, wins);
    }
}
