//! Command Table

use std::fmt::Write as _;

/// Commands understood by the PAC-RF binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Capture,
    Gps,
    StreamStart,
    StreamStop,
    SpectrumStart,
    SpectrumStop,
    ToneSend,
}

impl Command {
    /// Every command, in help order
    pub const ALL: [Command; 7] = [
        Command::Capture,
        Command::Gps,
        Command::StreamStart,
        Command::StreamStop,
        Command::SpectrumStart,
        Command::SpectrumStop,
        Command::ToneSend,
    ];

    /// Command-line flag, also passed to the remote binary
    pub fn flag(&self) -> &'static str {
        match self {
            Command::Capture => "--capture",
            Command::Gps => "--gps",
            Command::StreamStart => "--stream-start",
            Command::StreamStop => "--stream-stop",
            Command::SpectrumStart => "--spectrum-start",
            Command::SpectrumStop => "--spectrum-stop",
            Command::ToneSend => "--tone-send",
        }
    }

    /// One-line description for the usage text
    pub fn description(&self) -> &'static str {
        match self {
            Command::Capture => "Simulate or trigger a capture sequence",
            Command::Gps => "Retrieve GPS coordinates",
            Command::StreamStart => "Start simulated streaming",
            Command::StreamStop => "Stop simulated streaming",
            Command::SpectrumStart => "Start simulated spectrum sweep",
            Command::SpectrumStop => "Stop simulated spectrum sweep",
            Command::ToneSend => "Send a test tone",
        }
    }
}

/// Usage text generated from the command table
pub fn usage() -> String {
    let mut text = String::from("\nPAC-RF Application Usage:\n");
    text.push_str("  pacrf [--remote] <command> [options]\n\n");
    text.push_str("Available commands:\n");
    for command in Command::ALL {
        let _ = writeln!(text, "  {:<17} - {}", command.flag(), command.description());
    }
    let _ = writeln!(text, "  {:<17} - {}", "--help", "Show this help menu");
    text.push_str("\nExamples:\n");
    for example in ["--gps", "--capture --bitwidth 8", "--remote --route --gps"] {
        let _ = writeln!(text, "  pacrf {}", example);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_unique() {
        for (i, a) in Command::ALL.iter().enumerate() {
            assert!(a.flag().starts_with("--"));
            for b in &Command::ALL[i + 1..] {
                assert_ne!(a.flag(), b.flag());
            }
        }
    }

    #[test]
    fn test_usage_lists_every_command() {
        let text = usage();
        for command in Command::ALL {
            assert!(text.contains(command.flag()));
            assert!(text.contains(command.description()));
        }
        assert!(text.contains("--help"));
    }
}
