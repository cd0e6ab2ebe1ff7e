//! quizforge CLI — generate, parse, and serve multiple-choice quizzes.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizforge", version, about = "LLM-backed multiple-choice quiz generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a saved model completion into questions
    Parse {
        /// Completion text file, or "-" for stdin
        #[arg(long)]
        input: PathBuf,

        /// Number of questions that were requested
        #[arg(long)]
        count: Option<usize>,

        /// Output format: json, table
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Generate a quiz on a topic
    Generate {
        /// Quiz topic
        #[arg(long)]
        topic: String,

        /// Number of questions (1-50)
        #[arg(long, default_value = "5")]
        count: u32,

        /// Difficulty: easy, medium, hard
        #[arg(long, default_value = "medium")]
        difficulty: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the quiz JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Ask the chat model a one-off question
    Chat {
        /// Message to send
        #[arg(long)]
        message: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run the REST API server
    Serve {
        /// Listen address (overrides config)
        #[arg(long)]
        addr: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// JSON data file for users and quizzes (overrides config)
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input,
            count,
            format,
        } => commands::parse::execute(input, count, format),
        Commands::Generate {
            topic,
            count,
            difficulty,
            config,
            output,
        } => commands::generate::execute(topic, count, difficulty, config, output).await,
        Commands::Chat { message, config } => commands::chat::execute(message, config).await,
        Commands::Serve { addr, config, data } => {
            commands::serve::execute(addr, config, data).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
