//! Round-robin parity league runner.
//!
//! Builds an in-process roster from the environment (or CLI flags), plays
//! every round with bounded match concurrency and prints the final table.

mod config;
mod logging;
mod metrics;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Instant;

use anyhow::{Context, Error};
use config::RunnerConfig;
use ctrlc::set_handler;
use parity_league::LeagueRunner;
use pico_args::Arguments;

const HELP: &str = "\
Run a round-robin parity league

USAGE:
  pl_runner [OPTIONS]

OPTIONS:
  --players      SPEC      Player count or id[:strategy] list  [default: env LEAGUE_PLAYERS]
  --concurrency  N         Matches played at once per round    [default: env MAX_CONCURRENT_MATCHES or 2]

FLAGS:
  --json                   Print the full league report as JSON
  -h, --help               Print help information

ENVIRONMENT:
  LEAGUE_PLAYERS           Roster, e.g. 6 or alice:even,bob:odd,carol:alternating
  INVITATION_TIMEOUT_SECS  Invitation reply deadline            [default: 5]
  CHOICE_TIMEOUT_SECS      Deadline per choice attempt          [default: 30]
  RETRY_ATTEMPTS           Choice attempts before a forfeit     [default: 3]
  RETRY_DELAY_SECS         Pause between choice attempts        [default: 2]
  MAX_CORRECTIONS          Invalid choices tolerated per attempt [default: 5]
  DRAW_MAX                 Upper bound of the drawn number      [default: 10]
  WIN_POINTS, DRAW_POINTS  Scoring                              [default: 3, 1]
  PLAYER_LATENCY_MS        Simulated player response time       [default: 0]
  RUST_LOG                 Log filter                           [default: info]

Press Ctrl+C once to stop after the current round, twice to exit immediately.
";

struct Args {
    players: Option<String>,
    concurrency: Option<usize>,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        players: pargs.opt_value_from_str("--players")?,
        concurrency: pargs.opt_value_from_str("--concurrency")?,
        json: pargs.contains("--json"),
    };

    logging::init();

    let config = RunnerConfig::from_env(args.players, args.concurrency)?;
    config.validate()?;

    // First Ctrl+C finishes the round in flight, the second one exits.
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        set_handler(move || {
            if stop.swap(true, Ordering::SeqCst) {
                std::process::exit(130);
            }
            tracing::warn!("Stopping after the current round (Ctrl+C again to exit now)");
        })?;
    }

    let mut league = LeagueRunner::new(config.league.clone(), config.participants())
        .context("Failed to set up league")?;

    tracing::info!(
        players = league.roster().len(),
        rounds = league.schedule().rounds.len(),
        concurrency = config.league.max_concurrent_matches,
        "League starting"
    );

    while let Some(round) = league.next_round() {
        if stop.load(Ordering::SeqCst) {
            tracing::warn!(round = round, "League stopped before round");
            break;
        }

        let started = Instant::now();
        let result = league.run_round(round).await;
        let elapsed = started.elapsed();

        // A failed round still records the matches it completed.
        let mut played = 0;
        for event in league.events().iter().filter(|event| event.round == round) {
            logging::log_match_completed(event);
            metrics::record_match(event);
            played += 1;
        }

        let snapshot = league.standings().snapshot().await;
        logging::log_round_completed(round, played, elapsed, snapshot.first());
        metrics::record_round(round, elapsed);
        metrics::leader_points(snapshot.first());

        result.with_context(|| format!("Round {round} failed"))?;
    }

    let report = league.report().await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", league.standings().render_table().await);
        println!(
            "{} matches: {} decisive, {} drawn{}",
            report.events.len(),
            report.decisive(),
            report.draws(),
            if report.is_complete() { "" } else { " (stopped early)" }
        );
    }

    Ok(())
}
