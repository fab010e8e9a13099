use autochess::ChessError;
use autochess::config::GameConfig;
use autochess::coordinator::TurnCoordinator;
use autochess::game::GameState;
use autochess::logger::init_logging;
use autochess::random::mover_rngs;
use autochess::record::{MemorySink, TracingSink, Transcript};
use autochess::status::{GameResult, MaterialRule, Outcome};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::info;

/// Two random movers play chess against each other.
#[derive(Parser, Debug)]
#[command(name = "autochess", version)]
struct Args {
    /// Number of games to play.
    #[arg(long, env = "AUTOCHESS_GAMES", default_value_t = 1)]
    games: u32,

    /// Seed for reproducible games. Game `n` uses `seed + n`.
    #[arg(long, env = "AUTOCHESS_SEED")]
    seed: Option<u64>,

    /// The side to move resigns after this many plies; 0 means no limit.
    #[arg(long, env = "AUTOCHESS_MAX_PLIES", default_value_t = 0)]
    max_plies: u32,

    /// Which material balances are drawn.
    #[arg(long, value_enum, env = "AUTOCHESS_MATERIAL", default_value_t = MaterialRule::BareKings)]
    material: MaterialRule,

    /// Start from this FEN instead of the standard layout.
    #[arg(long)]
    fen: Option<String>,

    /// Log file.
    #[arg(long, env = "AUTOCHESS_LOG", default_value = "logs/autochess.log")]
    log: PathBuf,

    /// Log filter, overridden by RUST_LOG.
    #[arg(long, env = "AUTOCHESS_FILTER", default_value = "info")]
    filter: String,

    /// Save each game's transcript here (numbered when playing several).
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Print only the summary.
    #[arg(long, short)]
    quiet: bool,
}

fn transcript_path(base: &Path, game: u32, games: u32) -> PathBuf {
    if games == 1 {
        return base.to_path_buf();
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("game");
    let ext = base.extension().and_then(|s| s.to_str()).unwrap_or("bin");
    base.with_file_name(format!("{stem}-{game}.{ext}"))
}

fn play_one(args: &Args, config: GameConfig) -> Result<Transcript, ChessError> {
    let state = match &args.fen {
        Some(fen) => GameState::from_fen(fen, config)?,
        None => GameState::new(config),
    };
    let memory = MemorySink::new();
    let coordinator = TurnCoordinator::new(state, (TracingSink, memory.clone()));
    let [white, black] = mover_rngs(config.seed);
    let result = coordinator.play(white, black)?;
    Ok(Transcript::new(memory.records(), Some(result)))
}

fn main() -> Result<(), ChessError> {
    let args = Args::parse();
    init_logging(&args.log, &args.filter)?;
    info!(games = args.games, seed = ?args.seed, max_plies = args.max_plies, "starting");

    let max_plies = (args.max_plies > 0).then_some(args.max_plies);
    let bar = if args.games > 1 {
        let bar = ProgressBar::new(u64::from(args.games));
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} games {msg}") {
            bar.set_style(style);
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    // white wins, black wins, draws
    let mut tally = [0u32; 3];
    for game in 0..args.games {
        let mut config = GameConfig::default()
            .with_max_plies(max_plies)
            .with_material(args.material);
        if let Some(seed) = args.seed {
            config = config.with_seed(seed.wrapping_add(u64::from(game)));
        }
        let transcript = play_one(&args, config)?;
        let result: Option<GameResult> = transcript.result;

        if let Some(result) = result {
            let slot = match result.outcome {
                Outcome::WhiteWins => 0,
                Outcome::BlackWins => 1,
                Outcome::Draw => 2,
            };
            tally[slot] += 1;
            if !args.quiet {
                if args.games == 1 {
                    println!("{transcript}");
                } else {
                    bar.println(format!(
                        "game {}: {} after {} plies",
                        game + 1,
                        result,
                        transcript.records.len()
                    ));
                }
            }
        }

        if let Some(base) = &args.transcript {
            transcript.save(transcript_path(base, game + 1, args.games))?;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    println!(
        "white {} / black {} / draws {} over {} games",
        tally[0], tally[1], tally[2], args.games
    );
    Ok(())
}
