//! Command-Line Arguments

use crate::commands::Command;
use clap::{Args, Parser};

/// PAC-RF command-line front end
#[derive(Debug, Parser)]
#[command(name = "pacrf", version, about = "PAC-RF capture device front end")]
pub struct Cli {
    #[command(flatten)]
    pub command: CommandFlags,

    /// Run the command on the PAC-RF board over ssh
    #[arg(long)]
    pub remote: bool,

    /// With --remote, print each output line tagged with its pane
    #[arg(long, requires = "remote")]
    pub route: bool,

    /// Sample bit width reported by the simulated capture
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u8).range(1..=32))]
    pub bitwidth: u8,

    /// GPS UART device (overrides PACRF_GPS_DEVICE)
    #[arg(long)]
    pub device: Option<String>,

    /// Replay canned NMEA sentences instead of reading the UART
    #[arg(long)]
    pub mock_gps: bool,

    /// Log level (overrides PACRF_LOG_LEVEL)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Mutually exclusive device commands
#[derive(Debug, Default, Args)]
#[group(multiple = false)]
pub struct CommandFlags {
    /// Simulate or trigger a capture sequence
    #[arg(long)]
    pub capture: bool,

    /// Retrieve GPS coordinates
    #[arg(long)]
    pub gps: bool,

    /// Start simulated streaming
    #[arg(long)]
    pub stream_start: bool,

    /// Stop simulated streaming
    #[arg(long)]
    pub stream_stop: bool,

    /// Start simulated spectrum sweep
    #[arg(long)]
    pub spectrum_start: bool,

    /// Stop simulated spectrum sweep
    #[arg(long)]
    pub spectrum_stop: bool,

    /// Send a test tone
    #[arg(long)]
    pub tone_send: bool,
}

impl CommandFlags {
    /// The command selected on the command line, if any
    pub fn selected(&self) -> Option<Command> {
        [
            (self.capture, Command::Capture),
            (self.gps, Command::Gps),
            (self.stream_start, Command::StreamStart),
            (self.stream_stop, Command::StreamStop),
            (self.spectrum_start, Command::SpectrumStart),
            (self.spectrum_stop, Command::SpectrumStop),
            (self.tone_send, Command::ToneSend),
        ]
        .into_iter()
        .find_map(|(set, command)| set.then_some(command))
    }
}
