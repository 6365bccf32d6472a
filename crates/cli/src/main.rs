use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hemline_agents::SupportAgent;
use hemline_core::{match_message, replies, IntentTable};
use hemline_observability::{init_tracing, AppMetrics};
use hemline_provider::OpenAiProvider;

#[derive(Debug, Parser)]
#[command(name = "hemline")]
#[command(about = "Hemline support relay CLI")]
struct Cli {
    #[arg(long, default_value = "config/intents.json")]
    intents: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Chat against the dispatcher from the terminal.
    Chat,
    /// Show how the matcher resolves a single message.
    Match { text: String },
    /// Print the loaded intent table.
    Intents,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("hemline_cli");
    let cli = Cli::parse();

    let table = IntentTable::from_path(&cli.intents)
        .with_context(|| format!("failed loading intent table from {}", cli.intents.display()))?;

    match cli.command {
        Command::Chat => {
            let provider = Arc::new(OpenAiProvider::from_env()?);
            let agent = SupportAgent::new(table, provider, AppMetrics::shared());
            run_chat(agent).await?;
        }
        Command::Match { text } => {
            let result = match_message(&table, &text);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Intents => {
            println!("{}", serde_json::to_string_pretty(table.records())?);
        }
    }

    Ok(())
}

async fn run_chat(agent: SupportAgent<OpenAiProvider>) -> Result<()> {
    println!("Hemline support chat. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        match agent.handle_message(message).await {
            Ok(reply) => println!("\n{reply}\n"),
            // Same translation the HTTP boundary does: the failure is
            // logged, the user sees the fixed apology.
            Err(error) => {
                eprintln!("provider failure: {error}");
                println!("\n{}\n", replies::PROVIDER_APOLOGY);
            }
        }
    }

    Ok(())
}
