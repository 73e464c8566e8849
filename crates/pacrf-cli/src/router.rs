//! Output Line Routing
//!
//! The PAC-RF binary tags each output line with a prefix naming the pane it
//! belongs to. Untagged lines go to the log pane unchanged.

use serde::Serialize;
use std::fmt;

/// Destination pane for an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pane {
    /// Human-readable command results
    Terminal,
    /// Raw and diagnostic output
    Logs,
    /// Image path produced on the board
    Image,
}

impl fmt::Display for Pane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pane::Terminal => write!(f, "term"),
            Pane::Logs => write!(f, "log"),
            Pane::Image => write!(f, "img"),
        }
    }
}

/// A line with its prefix resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutedLine {
    pub pane: Pane,
    pub text: String,
}

impl fmt::Display for RoutedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.pane, self.text)
    }
}

/// Route one output line by its prefix
pub fn route(line: &str) -> RoutedLine {
    let line = line.trim_end_matches(&['\r', '\n'][..]);

    let (pane, text) = if let Some(rest) = line.strip_prefix("TERM: ") {
        (Pane::Terminal, rest.to_string())
    } else if let Some(rest) = line.strip_prefix("LOG: ") {
        (Pane::Logs, rest.to_string())
    } else if let Some(rest) = line.strip_prefix("IMG: ") {
        (Pane::Image, rest.trim().to_string())
    } else if let Some(rest) = line.strip_prefix("WARN: ") {
        (Pane::Logs, format!("[WARN] {}", rest))
    } else if let Some(rest) = line.strip_prefix("ERR: ") {
        (Pane::Logs, format!("[ERROR] {}", rest))
    } else if let Some(rest) = line.strip_prefix("JSON: ") {
        (Pane::Logs, rest.to_string())
    } else {
        (Pane::Logs, line.to_string())
    };

    RoutedLine { pane, text }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_prefixes() {
        assert_eq!(
            route("TERM: GPS ok baud=9600\n"),
            RoutedLine {
                pane: Pane::Terminal,
                text: "GPS ok baud=9600".to_string()
            }
        );
        assert_eq!(route("LOG: $GPGGA,1*00").pane, Pane::Logs);
        assert_eq!(route("LOG: $GPGGA,1*00").text, "$GPGGA,1*00");
    }

    #[test]
    fn test_image_path_trimmed() {
        let routed = route("IMG:   /tmp/capture.png  \r\n");
        assert_eq!(routed.pane, Pane::Image);
        assert_eq!(routed.text, "/tmp/capture.png");
    }

    #[test]
    fn test_warning_and_error_tagged() {
        assert_eq!(route("WARN: low signal").text, "[WARN] low signal");
        assert_eq!(route("ERR: no device").text, "[ERROR] no device");
        assert_eq!(route("JSON: {}").text, "{}");
    }

    #[test]
    fn test_untagged_goes_to_logs() {
        let routed = route("ssh: connect to host pacrf port 22: Connection refused");
        assert_eq!(routed.pane, Pane::Logs);
        assert_eq!(
            routed.text,
            "ssh: connect to host pacrf port 22: Connection refused"
        );
        // Prefix without the trailing space is not a tag
        assert_eq!(route("TERM:x").text, "TERM:x");
    }

    #[test]
    fn test_display() {
        assert_eq!(route("TERM: done").to_string(), "[term] done");
    }
}
