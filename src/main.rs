use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use bpcli::{
    cli::{self, OutputFormat},
    config, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in to Beatport and cache the token
    Auth(AuthOptions),

    /// Remove the cached token
    Logout,

    /// List catalog genres
    Genres(OutputOptions),

    /// Show the top 100 tracks of a genre
    Top(TopOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Discard the cached token and log in again
    #[clap(long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format
    #[clap(long, conflicts_with = "csv")]
    pub json: bool,

    /// Output in CSV format
    #[clap(long)]
    pub csv: bool,
}

impl OutputOptions {
    fn format(&self) -> OutputFormat {
        OutputFormat::from_flags(self.json, self.csv)
    }
}

#[derive(Parser, Debug, Clone)]
pub struct TopOptions {
    /// Genre name, matched case-insensitively (asked for when omitted)
    pub genre: Option<String>,

    #[clap(flatten)]
    pub output: OutputOptions,

    /// Fall back to genre search on any chart error, not only 404
    #[clap(long)]
    pub lenient_fallback: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth(opt) => cli::auth(opt.force).await,
        Command::Logout => cli::logout().await,
        Command::Genres(opt) => cli::genres(opt.format()).await,
        Command::Top(opt) => {
            cli::top(opt.genre, opt.output.format(), opt.lenient_fallback).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
