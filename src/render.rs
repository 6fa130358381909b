//! Terminal rendering helpers shared by the page commands.

use anyhow::Result;
use serde::Serialize;

use cba_core::models::{Level, Tone};

/// How a page command writes its result to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// The page's view state as pretty-printed JSON.
    Json,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout)
}

/// A level badge, colored by tone when stdout is a terminal.
pub fn badge(level: Level) -> String {
    paint(level.as_str(), level.tone())
}

pub fn paint(text: &str, tone: Tone) -> String {
    if !use_color() {
        return text.to_string();
    }
    let code = match tone {
        Tone::Good => "32",
        Tone::Caution => "33",
        Tone::Alert => "31",
    };
    format!("\x1b[{}m{}\x1b[0m", code, text)
}

/// Wrap `text` at `width` columns, prefixing every line with `indent`.
pub fn wrap(text: &str, width: usize, indent: &str) -> String {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(format!("{}{}", indent, line));
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(format!("{}{}", indent, line));
    }
    lines.join("\n")
}

/// Print an error banner to stderr.
pub fn banner(message: &str) {
    eprintln!("! {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_on_words() {
        let s = wrap("one two three four", 9, "  ");
        assert_eq!(s, "  one two\n  three\n  four");
    }

    #[test]
    fn wrap_empty_is_empty() {
        assert_eq!(wrap("   ", 10, "> "), "");
    }
}
