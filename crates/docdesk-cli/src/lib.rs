use docdesk_core::{size_in_mb, FileCandidate};
use docdesk_services::SubmitReport;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

const NAME_WIDTH: usize = 40;

/// Render the upload table the way the console shows it: name, size, scan, status.
pub fn format_status_table(candidates: &[FileCandidate]) -> String {
    let mut out = format!(
        "{:<4} {:<width$} {:>9} {:<5} {}\n",
        "ID",
        "FILE",
        "SIZE (MB)",
        "SCAN",
        "STATUS",
        width = NAME_WIDTH
    );
    for candidate in candidates {
        out.push_str(&format!(
            "{:<4} {:<width$} {:>9.2} {:<5} {}\n",
            candidate.id().0,
            truncate_string(candidate.filename(), NAME_WIDTH),
            size_in_mb(candidate.size_bytes()),
            if candidate.scan_requested() { "yes" } else { "no" },
            candidate.status().message(),
            width = NAME_WIDTH
        ));
    }
    out
}

/// One-line summary of a submit.
pub fn format_report(report: &SubmitReport) -> String {
    match &report.batch_error {
        Some(message) => format!(
            "Upload failed for all {} file(s): {}",
            report.submitted, message
        ),
        None if report.submitted == 0 => "No files ready to upload".to_string(),
        None => format!(
            "Submitted {}: {} uploaded, {} processing, {} failed",
            report.submitted, report.succeeded, report.processing, report.failed
        ),
    }
}

/// `--scan` names that match none of the selected files.
pub fn unmatched_scan_names<'a>(names: &'a [String], candidates: &[FileCandidate]) -> Vec<&'a str> {
    names
        .iter()
        .filter(|name| !candidates.iter().any(|c| c.filename() == name.as_str()))
        .map(String::as_str)
        .collect()
}

/// Why the upload command should exit non-zero, if it should.
pub fn upload_failure(report: &SubmitReport) -> Option<String> {
    match &report.batch_error {
        Some(message) => Some(format!("Upload failed: {}", message)),
        None if report.failed > 0 => Some(format!(
            "{} of {} file(s) failed to upload",
            report.failed, report.submitted
        )),
        None => None,
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
