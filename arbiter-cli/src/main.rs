//! # Arbiter CLI
//!
//! Command-line interface for driving an optimistic dispute-resolution
//! oracle persisted as a JSON state file. Every mutating subcommand loads
//! the oracle, applies one operation, prints the emitted events, and saves
//! the state back.

use anyhow::{Context, Result};
use arbiter_core::utils::{answer_key, format_timestamp, unix_timestamp_now, validate_key};
use arbiter_core::{CallbackRegistry, Oracle, OracleConfig, OracleEvent, ResolutionHandler};
use clap::{Parser, Subcommand};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "arbiter")]
#[command(about = "Optimistic dispute-resolution oracle with staked answers")]
#[command(version)]
struct Cli {
    /// Path to the JSON-persisted oracle state
    #[arg(short, long, global = true, default_value = "oracle.json")]
    state: PathBuf,

    /// Clock override in Unix seconds (defaults to wall-clock time)
    #[arg(short, long, global = true)]
    now: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a fresh oracle state file
    Init {
        /// Stake required per answer
        #[arg(long, default_value_t = arbiter_core::DEFAULT_STAKE_SIZE)]
        stake_size: u64,
        /// Maximum answers per question
        #[arg(long, default_value_t = arbiter_core::DEFAULT_MAX_ANSWERS)]
        max_answers: usize,
        /// Identity of the court
        #[arg(long, default_value = "court")]
        court: String,
    },
    /// Pose a new question
    Ask {
        /// Identity of the asker
        #[arg(short = 'A', long)]
        asker: String,
        /// Initial computation state seed
        #[arg(short = 'S', long)]
        seed: String,
        /// Answer window duration in seconds
        #[arg(short, long)]
        timeout: u64,
        /// Handler id invoked on success resolution
        #[arg(long, default_value = "log")]
        success_handler: String,
        /// Handler id invoked on failure resolution
        #[arg(long, default_value = "log")]
        fail_handler: String,
    },
    /// Submit a staked answer (the answer key is the hash of the image)
    Answer {
        /// Identity of the answerer
        #[arg(short = 'A', long)]
        answerer: String,
        /// Question key (hex)
        question_key: String,
        /// Claimed final-state image; only its hash is committed
        #[arg(short, long)]
        image: String,
        /// Attached stake value
        #[arg(long)]
        stake: u64,
    },
    /// Falsify an answer (court only)
    Falsify {
        /// Caller identity; must be the configured court
        #[arg(short, long)]
        caller: String,
        /// Answer key (hex)
        answer_key: String,
        /// Account rewarded with the forfeited stake
        #[arg(short, long)]
        prosecutor: String,
    },
    /// Resolve a question by accepting a surviving answer
    ResolveSuccess {
        /// Answer key (hex)
        answer_key: String,
        /// Final-state image that must hash to the answer key
        #[arg(short, long)]
        image: String,
    },
    /// Give up on a question after the extended grace window
    ResolveFail {
        /// Question key (hex)
        question_key: String,
    },
    /// Show a question and its answers
    Question {
        /// Question key (hex)
        question_key: String,
    },
    /// Show an account balance and the pool
    Balance {
        /// Account identity
        account: String,
    },
    /// Credit an account with funds
    Deposit {
        /// Account identity
        account: String,
        /// Amount to credit
        amount: u64,
    },
    /// Hash a message with SHA256
    Hash {
        /// Message to hash
        message: String,
    },
}

/// Handler that prints resolution outcomes to the console
struct LogHandler;

impl ResolutionHandler for LogHandler {
    fn on_success(&mut self, question_key: &str, image: &[u8]) -> arbiter_core::Result<()> {
        println!(
            "{}: question {} answered with {} byte image",
            "Resolution".green().bold(),
            question_key.cyan(),
            image.len()
        );
        Ok(())
    }

    fn on_failure(&mut self, question_key: &str) -> arbiter_core::Result<()> {
        println!(
            "{}: question {} gave up without an answer",
            "Resolution".red().bold(),
            question_key.cyan()
        );
        Ok(())
    }
}

fn load_oracle(path: &Path) -> Result<Oracle> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("cannot read oracle state {}; run `arbiter init`", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("corrupt oracle state {}", path.display()))
}

fn save_oracle(path: &Path, oracle: &Oracle) -> Result<()> {
    let json = serde_json::to_string_pretty(oracle)?;
    fs::write(path, json).with_context(|| format!("cannot write oracle state {}", path.display()))
}

fn print_events(events: &[OracleEvent]) {
    for event in events {
        match event {
            OracleEvent::NewQuestion { question_key, asker, .. } => {
                println!("{} {} by {}", "NewQuestion".yellow().bold(), question_key.cyan(), asker);
            }
            OracleEvent::NewAnswer { question_key, answer_key } => {
                println!(
                    "{} {} for question {}",
                    "NewAnswer".yellow().bold(),
                    answer_key.cyan(),
                    question_key.cyan()
                );
            }
            OracleEvent::AnswerFalsified { question_key, answer_key } => {
                println!(
                    "{} {} under question {}",
                    "AnswerFalsified".red().bold(),
                    answer_key.cyan(),
                    question_key.cyan()
                );
            }
            OracleEvent::Resolved { question_key, successful } => {
                let label = if *successful {
                    "Resolved successfully".green().bold()
                } else {
                    "Resolved unsuccessfully".red().bold()
                };
                println!("{} {}", label, question_key.cyan());
            }
        }
    }
}

/// Registry with the printing handler under the ids the records reference
fn registry_for(ids: &[&str]) -> CallbackRegistry {
    let mut registry = CallbackRegistry::new();
    for id in ids {
        registry.register(*id, Box::new(LogHandler));
    }
    registry
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let now = cli.now.unwrap_or_else(unix_timestamp_now);

    match cli.command {
        Commands::Init { stake_size, max_answers, court } => {
            let oracle = Oracle::new(OracleConfig::new(stake_size, max_answers, court.clone()));
            save_oracle(&cli.state, &oracle)?;
            println!("{}", "Oracle initialized".green().bold());
            println!("{}: {}", "Stake size".yellow().bold(), stake_size);
            println!("{}: {}", "Max answers".yellow().bold(), max_answers);
            println!("{}: {}", "Court".yellow().bold(), court.cyan());
            println!("{}: {}", "State file".yellow().bold(), cli.state.display());
        }

        Commands::Ask { asker, seed, timeout, success_handler, fail_handler } => {
            let mut oracle = load_oracle(&cli.state)?;
            let question_key = oracle.ask(
                &asker,
                seed.as_bytes(),
                timeout,
                &success_handler,
                &fail_handler,
                now,
            )?;
            print_events(&oracle.take_events());
            save_oracle(&cli.state, &oracle)?;
            println!("{}: {}", "Question key".green().bold(), question_key.cyan());
            println!(
                "{}: answers close at {}",
                "Window".yellow().bold(),
                format_timestamp(now.saturating_add(timeout / 3))
            );
        }

        Commands::Answer { answerer, question_key, image, stake } => {
            let mut oracle = load_oracle(&cli.state)?;
            let key = answer_key(image.as_bytes());
            oracle.answer(&answerer, &question_key, &key, stake, now)?;
            print_events(&oracle.take_events());
            save_oracle(&cli.state, &oracle)?;
            println!("{}: {}", "Answer key".green().bold(), key.cyan());
            println!("{}: {} locked", "Stake".yellow().bold(), stake);
        }

        Commands::Falsify { caller, answer_key, prosecutor } => {
            anyhow::ensure!(validate_key(&answer_key), "malformed answer key");
            let mut oracle = load_oracle(&cli.state)?;
            oracle.falsify(&caller, &answer_key, &prosecutor)?;
            print_events(&oracle.take_events());
            save_oracle(&cli.state, &oracle)?;
            println!(
                "{}: stake paid to {}",
                "Falsified".red().bold(),
                prosecutor.cyan()
            );
        }

        Commands::ResolveSuccess { answer_key: key, image } => {
            anyhow::ensure!(validate_key(&key), "malformed answer key");
            let mut oracle = load_oracle(&cli.state)?;
            let handler_id = oracle
                .get_answer(&key)
                .and_then(|a| oracle.get_question(&a.question_key))
                .map(|q| q.success_handler.clone())
                .unwrap_or_else(|| "log".to_string());
            let mut handlers = registry_for(&[handler_id.as_str()]);
            let successful = oracle.resolve_success(&key, image.as_bytes(), now, &mut handlers)?;
            print_events(&oracle.take_events());
            save_oracle(&cli.state, &oracle)?;
            if successful {
                println!("{}", "Question resolved successfully".green().bold());
            } else {
                println!("{}", "Question resolved; handler did not accept".yellow().bold());
            }
        }

        Commands::ResolveFail { question_key } => {
            anyhow::ensure!(validate_key(&question_key), "malformed question key");
            let mut oracle = load_oracle(&cli.state)?;
            let handler_id = oracle
                .get_question(&question_key)
                .map(|q| q.fail_handler.clone())
                .unwrap_or_else(|| "log".to_string());
            let mut handlers = registry_for(&[handler_id.as_str()]);
            oracle.resolve_fail(&question_key, now, &mut handlers)?;
            print_events(&oracle.take_events());
            save_oracle(&cli.state, &oracle)?;
            println!("{}", "Question resolved as failed".red().bold());
        }

        Commands::Question { question_key } => {
            let oracle = load_oracle(&cli.state)?;
            match oracle.get_question(&question_key) {
                Some(question) => {
                    println!("{}: {}", "Question".green().bold(), question_key.cyan());
                    println!("{}: {}", "Asker".yellow().bold(), question.asker);
                    println!(
                        "{}: {}",
                        "Asked at".yellow().bold(),
                        format_timestamp(question.ask_time)
                    );
                    println!("{}: {}s", "Timeout".yellow().bold(), question.timeout);
                    println!(
                        "{}: {}",
                        "Answers close".yellow().bold(),
                        format_timestamp(question.ask_time.saturating_add(question.timeout / 3))
                    );
                    println!(
                        "{}: {}",
                        "Resolvable at".yellow().bold(),
                        format_timestamp(question.resolvable_at())
                    );
                    println!(
                        "{}: {}",
                        "Failable at".yellow().bold(),
                        format_timestamp(question.failable_at())
                    );
                    println!("{}:", "Answers".yellow().bold());
                    for key in &question.answer_keys {
                        if let Some(answer) = oracle.get_answer(key) {
                            let status = if answer.falsified {
                                "falsified".red()
                            } else {
                                "standing".green()
                            };
                            println!("  {} by {} ({})", key.cyan(), answer.answerer, status);
                        }
                    }
                }
                None => println!("{}: {}", "No open question".red().bold(), question_key.cyan()),
            }
        }

        Commands::Balance { account } => {
            let oracle = load_oracle(&cli.state)?;
            println!(
                "{}: {} holds {}",
                "Balance".green().bold(),
                account.cyan(),
                oracle.bank().balance(&account).to_string().yellow()
            );
            println!(
                "{}: {}",
                "Pool".green().bold(),
                oracle.bank().pool().to_string().yellow()
            );
        }

        Commands::Deposit { account, amount } => {
            let mut oracle = load_oracle(&cli.state)?;
            oracle.deposit(&account, amount);
            save_oracle(&cli.state, &oracle)?;
            println!(
                "{}: {} credited with {}",
                "Deposit".green().bold(),
                account.cyan(),
                amount.to_string().yellow()
            );
        }

        Commands::Hash { message } => {
            let hash = arbiter_core::utils::sha256_hash(message.as_bytes());
            println!("{}: {}", "SHA256 Hash".green().bold(), hash.cyan());
        }
    }

    Ok(())
}
