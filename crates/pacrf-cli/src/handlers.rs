//! Command Handlers
//!
//! Handlers write `TERM:` (human summary) and `LOG:` (raw/debug) lines to the
//! given writer. Capture, stream, spectrum and tone are simulated.

use crate::commands::Command;
use crate::settings::Settings;
use bit_stream::{BitStreamError, BitStreamReader};
use nmea_decoder::{GpsReceiver, GpsReport, PositionFix, DEFAULT_BAUD_RATES};
use std::io::{self, Write};
use tracing::{error, info};

/// Simulated capture header layout: version(4) bitwidth(6) channel(2) samples(12)
const CAPTURE_HEADER_BITS: usize = 24;

/// Inputs shared by all handlers
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub settings: Settings,
    /// Replay canned sentences instead of opening the UART
    pub mock_gps: bool,
    /// Sample bit width for the simulated capture
    pub bitwidth: u8,
}

/// Fields of a simulated capture header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureHeader {
    pub version: u8,
    pub bitwidth: u8,
    pub channel: u8,
    pub samples: u16,
}

impl CaptureHeader {
    /// Pack into the 3-byte wire header
    pub fn to_bytes(&self) -> [u8; 3] {
        let word = (u32::from(self.version & 0x0F) << 20)
            | (u32::from(self.bitwidth & 0x3F) << 14)
            | (u32::from(self.channel & 0x03) << 12)
            | u32::from(self.samples & 0x0FFF);
        [(word >> 16) as u8, (word >> 8) as u8, word as u8]
    }

    /// Parse a wire header
    pub fn parse(bytes: &[u8]) -> Result<Self, BitStreamError> {
        let mut reader = BitStreamReader::new(bytes, CAPTURE_HEADER_BITS)?;
        Ok(Self {
            version: reader.read(4)? as u8,
            bitwidth: reader.read(6)? as u8,
            channel: reader.read(2)? as u8,
            samples: reader.read(12)? as u16,
        })
    }
}

/// Run `command`, returning the position fix when one was collected
pub async fn dispatch(
    command: Command,
    ctx: &HandlerContext,
    out: &mut dyn Write,
) -> io::Result<Option<PositionFix>> {
    info!("Dispatching command: {}", command.flag());
    match command {
        Command::Gps => return handle_gps(ctx, out).await,
        Command::Capture => handle_capture(ctx, out)?,
        Command::StreamStart => simulate(out, "Stream start", "Stream started")?,
        Command::StreamStop => simulate(out, "Stream stop", "Stream stopped")?,
        Command::SpectrumStart => simulate(out, "Spectrum start", "Spectrum started")?,
        Command::SpectrumStop => simulate(out, "Spectrum stop", "Spectrum stopped")?,
        Command::ToneSend => simulate(out, "Tone send", "Simulated tone transmitted.")?,
    }
    Ok(None)
}

fn simulate(out: &mut dyn Write, request: &str, result: &str) -> io::Result<()> {
    info!("{} (stub).", request);
    writeln!(out, "LOG: {} requested (stub)", request)?;
    writeln!(out, "TERM: {} (stub)", result)?;
    out.flush()
}

/// Simulated capture: builds and decodes a capture header
pub fn handle_capture(ctx: &HandlerContext, out: &mut dyn Write) -> io::Result<()> {
    info!("Capture command received (stub).");
    writeln!(out, "LOG: Capture request received (stub)")?;

    let header = CaptureHeader {
        version: 1,
        bitwidth: ctx.bitwidth,
        channel: 0,
        samples: 1024,
    };
    match CaptureHeader::parse(&header.to_bytes()) {
        Ok(h) => writeln!(
            out,
            "LOG: Capture header version={} bitwidth={} channel={} samples={}",
            h.version, h.bitwidth, h.channel, h.samples
        )?,
        Err(e) => writeln!(out, "LOG: Capture header unreadable ({})", e)?,
    }

    writeln!(out, "TERM: Simulated capture complete. (stub)")?;
    out.flush()
}

/// Read the GPS UART and report the fix
pub async fn handle_gps(
    ctx: &HandlerContext,
    out: &mut dyn Write,
) -> io::Result<Option<PositionFix>> {
    let device = &ctx.settings.gps_device;
    info!("GPS command received (device={}).", device);

    let mut receiver = if ctx.mock_gps {
        GpsReceiver::mock()
    } else {
        match GpsReceiver::open(device, &DEFAULT_BAUD_RATES).await {
            Ok(receiver) => receiver,
            Err(e) => {
                error!("GPS open failed: {}", e);
                writeln!(out, "TERM: GPS ERROR - open failed ({})", e)?;
                out.flush()?;
                return Ok(None);
            }
        }
    };

    writeln!(
        out,
        "LOG: GPS reading {} at {} baud",
        receiver.device(),
        receiver.baud()
    )?;
    let result = receiver.collect(ctx.settings.gps_window()).await;
    receiver.close();

    match result {
        Ok(report) => {
            write_gps_report(&report, out)?;
            Ok(Some(report.fix))
        }
        Err(e) => {
            error!("GPS read failed: {}", e);
            writeln!(out, "TERM: GPS ERROR - read failed ({})", e)?;
            out.flush()?;
            Ok(None)
        }
    }
}

/// Summary line, JSON fix line and the raw sentence tail
pub fn write_gps_report(report: &GpsReport, out: &mut dyn Write) -> io::Result<()> {
    let fix = &report.fix;
    if fix.is_valid() {
        writeln!(
            out,
            "TERM: GPS ok baud={} fix=VALID quality={} sats={} time={} lat={:.6} lon={:.6}",
            report.baud,
            fix.fix_quality,
            fix.satellites,
            fix.time_or_unknown(),
            fix.latitude,
            fix.longitude
        )?;
    } else {
        writeln!(
            out,
            "TERM: GPS no-fix baud={} quality={} sats={} time={} (likely indoors)",
            report.baud,
            fix.fix_quality,
            fix.satellites,
            fix.time_or_unknown()
        )?;
    }

    writeln!(out, "JSON: {}", serde_json::to_string(fix)?)?;
    for line in &report.recent {
        writeln!(out, "LOG: {}", line)?;
    }
    out.flush()
}
