//! PAC-RF Command-Line Front End
//!
//! Dispatches device commands locally or on the board over ssh, and buffers
//! decoded telemetry in a bounded queue.

use anyhow::Context;
use bounded_queue::{BoundedQueue, QueueItem};
use nmea_decoder::PositionFix;
use std::io::{self, Write};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod cli;
pub mod commands;
pub mod handlers;
pub mod remote;
pub mod router;
pub mod settings;

pub use cli::Cli;
pub use commands::Command;
pub use settings::Settings;

use handlers::HandlerContext;
use remote::RemoteInvocation;

/// Install the global tracing subscriber, writing to stderr
///
/// stdout is reserved for the `TERM:`/`LOG:` protocol lines.
pub fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        warn!("Tracing subscriber already installed");
    }
}

/// Run the front end with parsed arguments and loaded settings
///
/// Returns `false` when no command was given or the remote command failed.
pub async fn run(cli: Cli, mut settings: Settings) -> anyhow::Result<bool> {
    info!("PAC-RF Application Starting...");

    if let Some(device) = &cli.device {
        settings.gps_device = device.clone();
    }

    let mut queue = BoundedQueue::<QueueItem>::new(settings.queue_capacity)
        .context("Failed to initialize queue")?;

    let Some(command) = cli.command.selected() else {
        warn!("No command provided.");
        print!("{}", commands::usage());
        return Ok(false);
    };

    if cli.remote {
        return run_remote(command, &settings, cli.route).await;
    }

    let ctx = HandlerContext {
        settings,
        mock_gps: cli.mock_gps,
        bitwidth: cli.bitwidth,
    };
    let mut stdout = io::stdout();
    let fix = handlers::dispatch(command, &ctx, &mut stdout)
        .await
        .context("Failed to write command output")?;

    buffer_telemetry(&mut queue, fix.as_ref())?;

    info!("PAC-RF Application Exiting Cleanly.");
    Ok(true)
}

/// Run `command` on the board, printing each output line as it arrives
async fn run_remote(command: Command, settings: &Settings, route: bool) -> anyhow::Result<bool> {
    let invocation = RemoteInvocation::new(settings, command.flag());
    let mut stdout = io::stdout();

    if !route {
        writeln!(stdout, "LOG: Executing remote: {}", invocation.display())?;
        stdout.flush()?;
    }

    let result = invocation
        .run(|line| {
            let written = if route {
                writeln!(stdout, "{}", router::route(line))
            } else {
                writeln!(stdout, "{}", line)
            };
            if written.and_then(|_| stdout.flush()).is_err() {
                warn!("Failed to forward remote output line");
            }
        })
        .await;

    match result {
        Ok(0) => Ok(true),
        Ok(code) => {
            warn!("Remote command exited with status {}", code);
            Ok(false)
        }
        Err(e) => Err(e).context("Remote execution failed"),
    }
}

/// Record queued when no fix can be buffered
const SAMPLE_RECORD: &[u8] = b"SampleData";

/// Queue the decoded fix (or a sample record) and drain it again
fn buffer_telemetry(
    queue: &mut BoundedQueue<QueueItem>,
    fix: Option<&PositionFix>,
) -> anyhow::Result<()> {
    let encoded = fix.and_then(|fix| match QueueItem::encode(fix) {
        Ok(item) => Some(item),
        Err(e) => {
            warn!("Fix not buffered ({}), queueing sample record", e);
            None
        }
    });
    let item = match encoded {
        Some(item) => item,
        None => QueueItem::new(SAMPLE_RECORD)?,
    };

    if queue.enqueue(item).is_ok() {
        queue.log_status();
    }

    if let Ok(item) = queue.dequeue() {
        match item.decode::<PositionFix>() {
            Ok(fix) if fix.is_valid() => info!(
                "Dequeued fix lat={:.6} lon={:.6} sats={}",
                fix.latitude, fix.longitude, fix.satellites
            ),
            _ => info!("Dequeued {} byte item", item.len()),
        }
        queue.log_status();
    }

    Ok(())
}
