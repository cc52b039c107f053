//! Build script for the Beatport top tracks CLI.
//!
//! Copies the `.env.example` template into the user's local data directory so
//! the configuration example sits next to the place where `bpcli` looks for
//! its `.env` file.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to `<data_local_dir>/bpcli/`.
///
/// # Destination Location
///
/// - Linux: `~/.local/share/bpcli/.env.example`
/// - macOS: `~/Library/Application Support/bpcli/.env.example`
/// - Windows: `%LOCALAPPDATA%/bpcli/.env.example`
///
/// A missing template only produces a cargo warning.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("bpcli");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
