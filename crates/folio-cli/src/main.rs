use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::serve::ServeArgs;

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Serve CMS content types as MCP tools")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the MCP server.
    Serve(ServeArgs),

    /// Load the configuration and report what would be exposed.
    Check {
        #[arg(short, long, default_value = "folio.yaml", env = "FOLIO_CONFIG")]
        config: PathBuf,
    },

    /// Inspect generated tools (offline).
    Tools {
        #[command(subcommand)]
        cmd: ToolsCommand,
    },

    /// API token management.
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ToolsCommand {
    /// List the tools the configuration produces.
    List {
        #[arg(short, long, default_value = "folio.yaml", env = "FOLIO_CONFIG")]
        config: PathBuf,

        /// Print input schemas too.
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },

    /// Show descriptions, schemas and required scopes of one tool.
    Describe {
        tool_name: String,

        #[arg(short, long, default_value = "folio.yaml", env = "FOLIO_CONFIG")]
        config: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Mint a new API token and print its record for the tokens file.
    Mint {
        /// Token id, shown in logs.
        #[arg(long)]
        id: String,

        /// Scope to grant (repeatable), e.g. collections:posts:read
        #[arg(long = "scope", required = true)]
        scopes: Vec<String>,

        /// Lifetime such as 24h, 7d or 30m. Tokens never expire by default.
        #[arg(long)]
        expires: Option<String>,

        /// CMS user the token acts as.
        #[arg(long)]
        user: Option<String>,

        #[arg(long)]
        role: Option<String>,
    },

    /// Print the SHA-256 digest of a secret.
    Hash { secret: String },

    /// Resolve a secret against the configured tokens and print its scopes.
    Inspect {
        secret: String,

        #[arg(short, long, default_value = "folio.yaml", env = "FOLIO_CONFIG")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the stdio transport; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Serve(args) => commands::serve::run(args).await?,
        Command::Check { config } => commands::check::run(&config)?,
        Command::Tools { cmd } => match cmd {
            ToolsCommand::List { config, verbose } => commands::tools::list(&config, verbose)?,
            ToolsCommand::Describe { tool_name, config } => commands::tools::describe(&config, &tool_name)?,
        },
        Command::Token { cmd } => match cmd {
            TokenCommand::Mint {
                id,
                scopes,
                expires,
                user,
                role,
            } => commands::token::mint(id, scopes, expires.as_deref(), user, role)?,
            TokenCommand::Hash { secret } => commands::token::hash(&secret),
            TokenCommand::Inspect { secret, config } => commands::token::inspect(&config, &secret).await?,
        },
    }

    Ok(())
}
