//! Console output for run summaries, supporting human-readable and JSON modes.

use crate::reconcile::SyncReport;
use serde::Serialize;

/// Output mode for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// One `resolve` lookup for JSON output
#[derive(Debug, Serialize)]
pub struct Resolution<'a> {
    pub key: &'a str,
    pub url: &'a str,
    pub resolved: bool,
}

/// Structured output writer that supports both human-readable and JSON output
#[derive(Debug, Clone)]
pub struct OutputWriter {
    pub mode: OutputMode,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            mode: if json { OutputMode::Json } else { OutputMode::Human },
        }
    }

    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Print the end-of-run summary
    pub fn summary(&self, report: &SyncReport) {
        match self.mode {
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(report) {
                    println!("{}", json);
                }
            }
            OutputMode::Human => {
                for line in summary_lines(report) {
                    println!("{}", line);
                }
            }
        }
    }

    /// Print the URL a manifest key resolves to
    pub fn resolution(&self, key: &str, url: &str) {
        match self.mode {
            OutputMode::Json => {
                let resolution = Resolution {
                    key,
                    url,
                    resolved: key != url,
                };
                if let Ok(json) = serde_json::to_string(&resolution) {
                    println!("{}", json);
                }
            }
            OutputMode::Human => println!("{}", url),
        }
    }

    /// Print an error message
    pub fn error(&self, msg: &str) {
        match self.mode {
            OutputMode::Json => {
                let payload = serde_json::json!({ "error": sanitize_error(msg) });
                eprintln!("{}", payload);
            }
            OutputMode::Human => {
                eprintln!("Error: {}", sanitize_error(msg));
            }
        }
    }
}

/// Human-readable summary: unresolved warnings, then right-aligned counters
pub fn summary_lines(report: &SyncReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .unresolved
        .iter()
        .map(|key| format!("Warning: File not found: {}", key))
        .collect();

    if report.dry_run {
        lines.push("Dry run: nothing was uploaded and the manifest was not saved".to_string());
    }

    let width = report.tally.total().to_string().len() + 17;
    lines.push(format!(
        "{:>width$}",
        format!("{} file(s) uploaded", report.tally.uploaded),
        width = width
    ));
    lines.push(format!(
        "{:>width$}",
        format!("{} file(s) skipped", report.tally.skipped),
        width = width
    ));
    lines
}

/// Sanitize error messages by collapsing whitespace
pub fn sanitize_error(msg: &str) -> String {
    msg.split_whitespace().collect::<Vec<&str>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::RunTally;

    fn report(uploaded: usize, skipped: usize) -> SyncReport {
        SyncReport {
            tally: RunTally { uploaded, skipped },
            unresolved: Vec::new(),
            dry_run: false,
        }
    }

    #[test]
    fn test_summary_counters_share_width() {
        let lines = summary_lines(&report(2, 0));
        assert_eq!(lines, vec!["2 file(s) uploaded", " 0 file(s) skipped"]);
    }

    #[test]
    fn test_summary_width_grows_with_total() {
        let lines = summary_lines(&report(3, 120));
        assert_eq!(lines[0], "  3 file(s) uploaded");
        assert_eq!(lines[1], " 120 file(s) skipped");
        assert_eq!(lines[0].len(), lines[1].len());
    }

    #[test]
    fn test_summary_lists_unresolved_first() {
        let mut r = report(1, 1);
        r.unresolved = vec!["/css/missing.css".to_string()];
        let lines = summary_lines(&r);
        assert_eq!(lines[0], "Warning: File not found: /css/missing.css");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_summary_notes_dry_run() {
        let mut r = report(1, 0);
        r.dry_run = true;
        let lines = summary_lines(&r);
        assert!(lines[0].starts_with("Dry run"));
    }

    #[test]
    fn test_report_json_shape() {
        let mut r = report(2, 1);
        r.unresolved = vec!["/js/gone.js".to_string()];
        let parsed: serde_json::Value = serde_json::to_value(&r).unwrap();
        assert_eq!(parsed["uploaded"], 2);
        assert_eq!(parsed["skipped"], 1);
        assert_eq!(parsed["unresolved"][0], "/js/gone.js");
        assert_eq!(parsed["dry_run"], false);
    }

    #[test]
    fn test_resolution_serialization() {
        let resolution = Resolution {
            key: "/css/site.css",
            url: "https://cdn.example.com/css/site-0a1b2c3d4e.css",
            resolved: true,
        };
        let json = serde_json::to_string(&resolution).unwrap();
        assert!(json.contains("\"resolved\":true"));
    }

    #[test]
    fn test_sanitize_error_collapses_whitespace() {
        assert_eq!(sanitize_error("  error:\n  detail\t  info  \r\n"), "error: detail info");
        assert_eq!(sanitize_error(" \n \t "), "");
    }

    #[test]
    fn test_output_writer_modes() {
        assert!(OutputWriter::new(true).is_json());
        assert_eq!(OutputWriter::new(false).mode, OutputMode::Human);
    }
}
