//! Interactive prompts. They never write to stdout, so JSON/CSV output stays
//! clean.

use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::{Error, Result};

pub fn line(question: &str) -> Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{question}")?;
    stderr.flush()?;

    let mut answer = String::new();
    let read = io::stdin().lock().read_line(&mut answer)?;
    if read == 0 {
        return Err(Error::Prompt(format!(
            "no input for '{}'",
            question.trim_end_matches([' ', ':'])
        )));
    }
    Ok(answer.trim().to_string())
}

pub fn confirm(question: &str) -> Result<bool> {
    let answer = line(&format!("{question} (y/n): "))?;
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Reads a password without echoing it.
///
/// On a terminal the prompt and input go through the tty with echo off.
/// Piped input is read as a plain line.
pub fn password(question: &str) -> Result<String> {
    if io::stdin().is_terminal() {
        return Ok(rpassword::prompt_password(question)?);
    }

    let mut stderr = io::stderr();
    write!(stderr, "{question}")?;
    stderr.flush()?;
    password_from(&mut io::stdin().lock())
}

/// Reads a password line from `reader`, dropping only the line ending.
pub fn password_from(reader: &mut impl BufRead) -> Result<String> {
    Ok(rpassword::read_password_from_bufread(reader)?)
}
