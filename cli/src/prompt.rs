//! Line-oriented questions on stdin/stdout.
//!
//! # Design
//! Prompts print without a newline and read a single line. End of input is
//! `None`, not an error, so callers can stop cleanly when stdin closes.

use std::io::{self, BufRead, Write};

/// Print `question` and read one line. `None` on end of input.
pub fn ask(question: &str) -> io::Result<Option<String>> {
    print!("{question}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Yes/no question; anything but `y`/`yes` (or a read failure) is no.
pub fn confirm(question: &str) -> bool {
    matches!(
        ask(&format!("{question} [y/N] ")),
        Ok(Some(answer)) if is_yes(&answer)
    )
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
