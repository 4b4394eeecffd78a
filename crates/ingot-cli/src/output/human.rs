//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use ingot_core::CheckReport;
use ingot_core::IngestReport;
use ingot_core::report::format_size;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn write_header(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_ingest_result(&self, report: &IngestReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let relocation = &report.relocation;
        self.write_header("Ingestion complete");

        let _ = self.term.write_line(&format!(
            "  Marker:        {}",
            relocation.marker_path.display()
        ));
        let _ = self.term.write_line(&format!(
            "  Files moved:   {}",
            Self::format_number(relocation.files_moved)
        ));
        let _ = self.term.write_line(&format!(
            "  Media copied:  {}",
            Self::format_number(relocation.media_copied)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:    {}",
            format_size(report.bytes_extracted)
        ));

        if relocation.entries_skipped > 0 {
            let _ = self.term.write_line(&format!(
                "  Skipped:       {}",
                Self::format_number(relocation.entries_skipped)
            ));
        }

        if self.verbose {
            if let Some(wrapper) = &relocation.wrapper_folder {
                let _ = self.term.write_line(&format!("  Wrapper:       {wrapper}/"));
            }
            let _ = self.term.write_line(&format!(
                "  Entries:       {}",
                Self::format_number(report.entry_count)
            ));
            let _ = self.term.write_line(&format!(
                "  Upload size:   {}",
                format_size(report.upload_bytes)
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:      {:?}", report.duration));
        }

        Ok(())
    }

    fn format_check_result(&self, archive: &Path, report: &CheckReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let structure = &report.structure;
        self.write_header(&format!("Archive is acceptable: {}", archive.display()));

        let _ = self
            .term
            .write_line(&format!("  Format:        {}", report.format.name()));
        let _ = self.term.write_line(&format!(
            "  Entries:       {}",
            Self::format_number(structure.entry_count)
        ));
        let _ = self.term.write_line(&format!(
            "  Extracted:     {}",
            format_size(structure.extracted_bytes)
        ));

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Compressed:    {}",
                format_size(structure.compressed_bytes)
            ));
            if let Some(ratio) = structure.ratio {
                let _ = self.term.write_line(&format!("  Ratio:         {ratio:.1}x"));
            }
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_small() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(42), "42");
        assert_eq!(HumanFormatter::format_number(999), "999");
    }

    #[test]
    fn test_format_number_thousands() {
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(9999), "9,999");
    }

    #[test]
    fn test_format_number_millions() {
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
        assert_eq!(
            HumanFormatter::format_number(123_456_789_012),
            "123,456,789,012"
        );
    }
}
