use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use blackjack_cli::config::TableConfig;
use blackjack_cli::console::{ConsoleDecisions, ConsoleTable, JsonLines};
use blackjack_cli::logging::init_logging;
use blackjack_core::{
    AutoPlayer, DecisionSource, DeckManager, Player, PresentationSink, Session, SessionSummary,
};

/// Single-player blackjack at the terminal.
#[derive(Debug, Parser)]
#[command(name = "blackjack", author, version, about = "Play blackjack against the house")]
struct Cli {
    /// Path to a YAML table configuration.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Player name. Asked for at startup when neither flag nor config sets it.
    #[arg(long, value_name = "NAME")]
    name: Option<String>,

    /// Override the starting credits.
    #[arg(long, value_name = "CREDITS")]
    credits: Option<i64>,

    /// Override the table minimum bet.
    #[arg(long, value_name = "CREDITS")]
    minimum_bet: Option<i64>,

    /// Seed the shuffle for a reproducible session.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Add two jokers to the deck. Dealing one ends the session with an error.
    #[arg(long)]
    jokers: bool,

    /// Stop after this many rounds.
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<u32>,

    /// Let the built-in player bet the minimum and hit below 17.
    #[arg(long)]
    auto: bool,

    /// Print one JSON record per settled round and a final summary. Prompts go to stderr.
    #[arg(long)]
    json: bool,

    /// Exit after validating the configuration.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => TableConfig::from_path(path)?,
        None => TableConfig::default(),
    };

    if let Some(name) = cli.name {
        config.player.name = Some(name);
    }

    if let Some(credits) = cli.credits {
        config.player.credits = credits;
    }

    if let Some(minimum_bet) = cli.minimum_bet {
        config.table.minimum_bet = minimum_bet;
    }

    if let Some(seed) = cli.seed {
        config.table.seed = Some(seed);
    }

    if cli.jokers {
        config.table.jokers = true;
    }

    if let Some(rounds) = cli.rounds {
        config.table.max_rounds = Some(rounds);
    }

    config.validate()?;
    let _logging_guard = init_logging(&config.logging)?;

    if cli.validate_only {
        println!(
            "Configuration valid: {} credits, minimum bet {}{}",
            config.player.credits,
            config.table.minimum_bet,
            if config.table.jokers { ", jokers in play" } else { "" }
        );
        return Ok(());
    }

    let name = match config.player.name.clone() {
        Some(name) => name,
        None if cli.auto => "Player".to_string(),
        None if cli.json => prompt_name(io::stderr())?,
        None => prompt_name(io::stdout())?,
    };

    let deck_manager = match config.table.seed {
        Some(seed) => DeckManager::seeded(seed),
        None => DeckManager::from_entropy(),
    };
    let mut session = Session::new(
        Player::new(name.clone(), config.player.credits),
        config.rules(),
        deck_manager,
    );

    // In JSON mode stdout carries only records, so prompts move to stderr.
    let mut decisions: Box<dyn DecisionSource> = if cli.auto {
        Box::new(AutoPlayer::default())
    } else if cli.json {
        Box::new(ConsoleDecisions::new(io::stdin().lock(), io::stderr()))
    } else {
        Box::new(ConsoleDecisions::new(io::stdin().lock(), io::stdout()))
    };
    let mut sink: Box<dyn PresentationSink> = if cli.json {
        Box::new(JsonLines::new(io::stdout()))
    } else {
        Box::new(ConsoleTable::new(io::stdout(), name.clone()))
    };

    let summary = session
        .run(&mut *decisions, &mut *sink, config.table.max_rounds)
        .with_context(|| {
            format!(
                "session for {name} stopped after {} rounds",
                session.rounds_played()
            )
        })?;

    report(&name, &summary, cli.json)
}

fn prompt_name(mut prompt: impl Write) -> anyhow::Result<String> {
    write!(prompt, "Please enter your name: ")?;
    prompt.flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let name = line.trim();
    Ok(if name.is_empty() {
        "Player".to_string()
    } else {
        name.to_string()
    })
}

fn report(name: &str, summary: &SessionSummary, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(summary)?);
        return Ok(());
    }
    println!(
        "{name} leaves the table with {} credits after {} round{} ({} won, {} lost).",
        summary.final_credits,
        summary.rounds_played,
        if summary.rounds_played == 1 { "" } else { "s" },
        summary.hands_won,
        summary.hands_lost
    );
    Ok(())
}
