//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use perch_core::config::Config;

mod commands;

#[derive(Parser)]
#[command(name = "perch")]
#[command(version = "0.1")]
#[command(about = "Terminal client for a persona chat service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the backend base URL from config
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in through the backend's Google OAuth flow
    Login,
    /// Discard the stored session
    Logout,
    /// Probe the authenticated route with the stored session
    Whoami,
    /// Manage personas
    Personas {
        #[command(subcommand)]
        command: PersonaCommands,
    },
    /// Chat with a persona (creates it on first contact)
    Chat {
        /// Persona name
        #[arg(value_name = "PERSONA")]
        persona: String,

        /// The prompt to send
        #[arg(short, long)]
        prompt: String,

        /// Sampling temperature for the reply
        #[arg(short, long, default_value_t = 0.1)]
        temperature: f32,

        /// Skip printing prior conversation history
        #[arg(long = "no-history")]
        no_history: bool,
    },
    /// Show the message history of a conversation
    History {
        #[arg(value_name = "CONVERSATION_ID")]
        conversation_id: i64,
    },
    /// Export a conversation as PDF
    Export {
        #[arg(value_name = "CONVERSATION_ID")]
        conversation_id: i64,

        /// Output file (defaults to the server-provided filename)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Transcribe an audio file (mp3/m4a)
    Transcribe {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum PersonaCommands {
    /// List persona names
    List,
    /// Create a persona with a seeded profile
    Create {
        /// Persona name
        #[arg(value_name = "NAME")]
        name: String,

        /// Persona description used to seed the profile
        #[arg(short, long)]
        description: String,
    },
    /// Show a persona description
    Describe {
        #[arg(value_name = "PERSONA_ID")]
        persona_id: i64,
    },
    /// Update a persona description
    SetDescription {
        #[arg(value_name = "PERSONA_ID")]
        persona_id: i64,

        #[arg(value_name = "DESCRIPTION")]
        description: String,
    },
    /// Rate a persona
    Rate {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(value_name = "RATING")]
        rating: u8,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the backend base URL, preserving other config values
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

/// Structured logging to stderr, controlled by PERCH_LOG.
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("PERCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("load config")?;

    if let Some(url) = cli.base_url {
        config.base_url = url;
    }

    match cli.command {
        Commands::Login => commands::auth::login(&config).await,
        Commands::Logout => commands::auth::logout(),
        Commands::Whoami => commands::auth::whoami(&config).await,

        Commands::Personas { command } => match command {
            PersonaCommands::List => commands::personas::list(&config).await,
            PersonaCommands::Create { name, description } => {
                commands::personas::create(&config, &name, &description).await
            }
            PersonaCommands::Describe { persona_id } => {
                commands::personas::describe(&config, persona_id).await
            }
            PersonaCommands::SetDescription {
                persona_id,
                description,
            } => commands::personas::set_description(&config, persona_id, &description).await,
            PersonaCommands::Rate { name, rating } => {
                commands::personas::rate(&config, &name, rating).await
            }
        },

        Commands::Chat {
            persona,
            prompt,
            temperature,
            no_history,
        } => commands::chat::run(&config, &persona, &prompt, temperature, no_history).await,

        Commands::History { conversation_id } => {
            commands::chat::history(&config, conversation_id).await
        }

        Commands::Export {
            conversation_id,
            output,
        } => commands::export::run(&config, conversation_id, output).await,

        Commands::Transcribe { file } => commands::transcribe::run(&config, &file).await,

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
        },
    }
}
