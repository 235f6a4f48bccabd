use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use quiz_match::{
    default_questions, filter_by_subjects, load_config_from_json, load_questions_from_json,
    MatchConfig, Profile, Quiz, QuizError,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file to load the questions from (built-in bank when omitted)
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// JSON file with match settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only ask questions from these subjects (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    subjects: Vec<String>,

    /// Seconds allowed per question
    #[arg(long)]
    budget: Option<u32>,

    /// Seconds the correct answer is shown before moving on
    #[arg(long)]
    reveal: Option<u32>,

    /// Bonus points per streak level
    #[arg(long)]
    streak_bonus: Option<u32>,

    /// Seed for the simulated opponent
    #[arg(long)]
    seed: Option<u64>,

    /// Display name of the player
    #[arg(short, long, default_value = "Player")]
    name: String,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), QuizError> {
    init_logging(args.log_file.as_deref())?;

    let mut config = match &args.config {
        Some(path) => load_config_from_json(path)?,
        None => MatchConfig::default(),
    };
    if let Some(budget) = args.budget {
        config.budget_seconds = budget;
    }
    if let Some(reveal) = args.reveal {
        config.reveal_window_seconds = reveal;
    }
    if let Some(bonus) = args.streak_bonus {
        config.streak_bonus_per_level = bonus;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;

    let questions = match &args.questions {
        Some(path) => load_questions_from_json(path)?,
        None => default_questions(),
    };
    let questions = filter_by_subjects(questions, &args.subjects)?;

    let quiz = Quiz::new(questions, config, Profile::new(args.name));
    let profile = quiz.run().await?;

    println!(
        "{}: {} coins, {} xp after {} matches",
        profile.display_name, profile.coins, profile.xp, profile.total_matches
    );
    Ok(())
}

fn init_logging(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
