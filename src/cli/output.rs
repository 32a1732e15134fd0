//! Output helpers shared by CLI commands

use std::io::{self, Write};

use crate::AnnotationReport;

/// Log info message (respects quiet flag)
pub fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", msg);
    }
}

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), String> {
    if let Some(path) = path {
        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write to {}: {}", path, e))?;
    } else {
        print!("{}", content);
        io::stdout()
            .flush()
            .map_err(|e| format!("Failed to flush stdout: {}", e))?;
    }
    Ok(())
}

/// One-line summary of a pass
pub fn format_report(verb: &str, report: &AnnotationReport) -> String {
    let mut line = format!(
        "{} {} file(s), {} example(s) written",
        verb, report.files_processed, report.examples_written
    );
    if report.examples_skipped > 0 {
        line.push_str(&format!(", {} unparsable line(s) dropped", report.examples_skipped));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_report() {
        let mut report = AnnotationReport {
            files_processed: 2,
            examples_written: 10,
            examples_skipped: 0,
        };
        assert_eq!(
            format_report("Annotated", &report),
            "Annotated 2 file(s), 10 example(s) written"
        );
        report.examples_skipped = 1;
        assert!(format_report("Annotated", &report).ends_with(", 1 unparsable line(s) dropped"));
    }
}
