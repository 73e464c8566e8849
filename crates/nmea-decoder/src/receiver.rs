//! GPS Receiver for UART-Attached Modules
//!
//! Reads raw NMEA output from a serial port for a fixed window and folds it
//! into a [`PositionFix`].

use crate::decoder::{DecoderStats, SentenceDecoder};
use crate::error::ReceiverError;
use crate::fix::PositionFix;
use crate::line::LineAssembler;
use bounded_queue::BoundedQueue;
use std::io::ErrorKind;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::time::Instant;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, warn};

/// Default UART device on the PAC-RF board
pub const DEFAULT_DEVICE: &str = "/dev/ttyPS1";

/// Baud rates tried in order when opening the port
pub const DEFAULT_BAUD_RATES: [u32; 2] = [9600, 115200];

/// Number of raw sentences kept for the report
pub const RECENT_LINES: usize = 5;

/// Pause between polls when the port has no data
const IDLE_POLL_MS: u64 = 50;

/// Sentences replayed by a mock receiver
const MOCK_SENTENCES: &[&str] = &[
    "$GPGSV,3,1,11,03,03,111,00,04,15,270,00,06,01,010,00,13,06,292,00*74",
    "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47",
    "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A",
];

/// Result of one collection window
#[derive(Debug, Clone)]
pub struct GpsReport {
    /// Baud rate the port was opened at
    pub baud: u32,
    /// Accumulated position state
    pub fix: PositionFix,
    /// Most recent raw lines, oldest first
    pub recent: Vec<String>,
    /// Accepted/rejected sentence counts
    pub stats: DecoderStats,
}

/// GPS module reader
pub struct GpsReceiver {
    /// Serial device path (e.g., "/dev/ttyPS1")
    device: String,
    /// Baud rate in use
    baud: u32,
    /// Open port, `None` in mock mode or after close
    port: Option<SerialStream>,
    /// Whether the receiver is connected
    connected: bool,
    /// Mock mode for testing (replays canned sentences)
    mock_data: Option<Vec<u8>>,
}

impl GpsReceiver {
    /// Open `device`, trying each baud rate in turn
    pub async fn open(device: &str, baud_rates: &[u32]) -> Result<Self, ReceiverError> {
        info!("Opening GPS receiver on {}", device);

        let mut last_error = None;
        for &baud in baud_rates {
            match tokio_serial::new(device, baud).open_native_async() {
                Ok(port) => {
                    info!("GPS port {} opened at {} baud", device, baud);
                    return Ok(Self {
                        device: device.to_string(),
                        baud,
                        port: Some(port),
                        connected: true,
                        mock_data: None,
                    });
                }
                Err(e) => {
                    warn!("Failed to open {} at {} baud: {}", device, baud, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(source) => Err(ReceiverError::Open {
                device: device.to_string(),
                source,
            }),
            None => Err(ReceiverError::NoBaudRates(device.to_string())),
        }
    }

    /// Create a mock receiver that replays a GSV, GGA and RMC sentence
    pub fn mock() -> Self {
        let mut data = String::new();
        for sentence in MOCK_SENTENCES {
            data.push_str(sentence);
            data.push_str("\r\n");
        }
        Self::mock_with(data.into_bytes())
    }

    /// Create a mock receiver that replays `data` as raw serial input
    pub fn mock_with(data: Vec<u8>) -> Self {
        info!("Creating mock GPS receiver for testing");
        Self {
            device: "mock".to_string(),
            baud: DEFAULT_BAUD_RATES[0],
            port: None,
            connected: true,
            mock_data: Some(data),
        }
    }

    /// Read for `window`, decoding every complete sentence
    pub async fn collect(&mut self, window: Duration) -> Result<GpsReport, ReceiverError> {
        if !self.connected {
            return Err(ReceiverError::NotConnected);
        }

        let mut session = Session::new()?;

        if let Some(data) = &self.mock_data {
            debug!("Mock mode: replaying {} bytes", data.len());
            session.ingest(data);
            return Ok(session.into_report(self.baud));
        }

        let port = self.port.as_mut().ok_or(ReceiverError::NotConnected)?;
        let deadline = Instant::now() + window;
        let mut buf = [0u8; 512];

        loop {
            match tokio::time::timeout_at(deadline, port.read(&mut buf)).await {
                Err(_) => break,
                Ok(Ok(0)) => tokio::time::sleep(Duration::from_millis(IDLE_POLL_MS)).await,
                Ok(Ok(n)) => session.ingest(&buf[..n]),
                Ok(Err(e)) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    tokio::time::sleep(Duration::from_millis(IDLE_POLL_MS)).await;
                }
                Ok(Err(e)) => return Err(ReceiverError::Io(e)),
            }
        }

        Ok(session.into_report(self.baud))
    }

    /// Check if the receiver is connected
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Baud rate the port was opened at
    pub fn baud(&self) -> u32 {
        self.baud
    }

    /// Device path
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Close the serial port
    pub fn close(&mut self) {
        if self.connected {
            info!("Closing GPS receiver on {}", self.device);
            self.port = None;
            self.connected = false;
        }
    }
}

/// Per-window decode state
struct Session {
    assembler: LineAssembler,
    decoder: SentenceDecoder,
    fix: PositionFix,
    recent: BoundedQueue<String>,
}

impl Session {
    fn new() -> Result<Self, ReceiverError> {
        Ok(Self {
            assembler: LineAssembler::new(),
            decoder: SentenceDecoder::new(),
            fix: PositionFix::new(),
            recent: BoundedQueue::new(RECENT_LINES)?,
        })
    }

    fn ingest(&mut self, bytes: &[u8]) {
        for line in self.assembler.feed(bytes) {
            // Rejected sentences are counted by the decoder and still kept
            // in the raw tail for troubleshooting.
            let _ = self.decoder.decode(&line, &mut self.fix);

            if self.recent.is_full() {
                let _ = self.recent.dequeue();
            }
            let _ = self.recent.enqueue(line);
        }
    }

    fn into_report(self, baud: u32) -> GpsReport {
        GpsReport {
            baud,
            recent: self.recent.iter().cloned().collect(),
            stats: self.decoder.stats(),
            fix: self.fix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_receiver_collects_fix() {
        let mut receiver = GpsReceiver::mock();
        assert!(receiver.is_connected());
        assert_eq!(receiver.device(), "mock");
        assert_eq!(receiver.baud(), 9600);

        let report = receiver.collect(Duration::from_millis(10)).await.unwrap();
        assert_eq!(report.baud, 9600);
        assert!(report.fix.has_fix);
        assert_eq!(report.fix.satellites, 8);
        assert_eq!(report.recent.len(), 3);
        assert_eq!(report.stats.accepted, 3);
    }

    #[tokio::test]
    async fn test_recent_keeps_last_lines() {
        let mut data = Vec::new();
        for i in 0..8 {
            data.extend_from_slice(format!("junk line {}\r\n", i).as_bytes());
        }
        let mut receiver = GpsReceiver::mock_with(data);

        let report = receiver.collect(Duration::from_millis(10)).await.unwrap();
        assert_eq!(report.recent.len(), RECENT_LINES);
        assert_eq!(report.recent[0], "junk line 3");
        assert_eq!(report.recent[4], "junk line 7");
        assert_eq!(report.stats.rejected, 8);
        assert_eq!(report.fix, PositionFix::default());
    }

    #[test]
    fn test_session_tail_sized_to_recent_lines() {
        let session = Session::new().unwrap();
        assert_eq!(session.recent.capacity(), RECENT_LINES);
        assert!(session.recent.is_empty());
    }

    #[tokio::test]
    async fn test_closed_receiver_errors() {
        let mut receiver = GpsReceiver::mock();
        receiver.close();
        assert!(matches!(
            receiver.collect(Duration::from_millis(10)).await,
            Err(ReceiverError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_open_missing_device_fails() {
        let result = GpsReceiver::open("/dev/does-not-exist-pacrf", &DEFAULT_BAUD_RATES).await;
        assert!(matches!(result, Err(ReceiverError::Open { .. })));
    }

    #[tokio::test]
    async fn test_open_without_bauds() {
        let result = GpsReceiver::open("/dev/ttyPS1", &[]).await;
        assert!(matches!(result, Err(ReceiverError::NoBaudRates(_))));
    }
}
