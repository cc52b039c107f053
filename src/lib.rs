//! Beatport Top Tracks CLI Library
//!
//! This library authenticates against the Beatport v4 API through the same
//! browser-style OAuth flow the Beatport web docs use, and queries ranked
//! track listings for a genre.
//!
//! # Modules
//!
//! - `beatport` - Transport, client id discovery, auth flow and catalog queries
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy of the Beatport integration
//! - `management` - Token and credential persistence
//! - `types` - Data structures and type definitions
//! - `utils` - Genre matching and output formatting
//!
//! # Example
//!
//! ```
//! use bpcli::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> bpcli::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod beatport;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod types;
pub mod utils;

/// Result alias for the command layer.
///
/// Core operations return [`error::Result`]; commands mix those with prompt
/// and session errors and box them.
///
/// # Example
///
/// ```
/// use bpcli::Res;
///
/// async fn genre_name() -> Res<String> {
///     Ok("Techno".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a status line with a blue "o" marker on stdout.
///
/// Commands only call this in text mode, so JSON and CSV output stay clean.
///
/// # Example
///
/// ```
/// info!("Fetching Top 100 for {} (ID: {})...", name, id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line with a green checkmark on stdout.
///
/// # Example
///
/// ```
/// success!("Successfully authenticated!");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error with a red "!" on stderr and exits with status 1.
///
/// Only for failures the command cannot recover from. Code after the call
/// does not run, so it can be used in any expression position.
///
/// # Example
///
/// ```
/// let token = match ctx.token().await {
///     Ok(token) => token,
///     Err(e) => error!("Authentication failed: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning with a yellow "!" on stderr and carries on.
///
/// # Example
///
/// ```
/// warning!("Failed to load saved credentials: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
