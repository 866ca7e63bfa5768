//! Error counters and run reports.

use std::path::PathBuf;

use crate::error::{ErrorKind, RewriteError};

/// Per-kind failure counts, accumulated across all models of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteCounters {
    /// ERR_TEXTURE_NOT_FOUND occurrences.
    pub texture_not_found: usize,
    /// ERR_OFFSET occurrences.
    pub offset_not_found: usize,
    /// ERR_RELATIVE_PATH occurrences.
    pub relative_path_failures: usize,
}

impl RewriteCounters {
    /// Count a failure under its kind.
    pub fn record(&mut self, error: &RewriteError) {
        match error.kind() {
            ErrorKind::Offset => self.offset_not_found += 1,
            ErrorKind::TextureNotFound => self.texture_not_found += 1,
            ErrorKind::RelativePath => self.relative_path_failures += 1,
        }
    }

    /// Count for a single kind.
    pub fn get(&self, kind: ErrorKind) -> usize {
        match kind {
            ErrorKind::Offset => self.offset_not_found,
            ErrorKind::TextureNotFound => self.texture_not_found,
            ErrorKind::RelativePath => self.relative_path_failures,
        }
    }

    /// Sum of all kinds.
    pub fn total(&self) -> usize {
        self.texture_not_found + self.offset_not_found + self.relative_path_failures
    }

    /// Summary lines in reporting order.
    pub fn summary_lines(&self) -> Vec<String> {
        [
            ErrorKind::TextureNotFound,
            ErrorKind::Offset,
            ErrorKind::RelativePath,
        ]
        .iter()
        .map(|kind| format!("    {:<22} {}", kind.code(), self.get(*kind)))
        .collect()
    }
}

/// Outcome of processing one model file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelReport {
    /// Model file path.
    pub path: PathBuf,
    /// Signatures found, terminated or not.
    pub occurrences: usize,
    /// Occurrences rewritten with a relative path.
    pub rewritten: usize,
    /// Occurrences skipped because of a [`RewriteError`].
    pub failed: usize,
    /// Whether the buffer was written back to disk.
    pub written: bool,
    /// Read or write failure, if the model could not be processed.
    pub io_error: Option<String>,
}

impl ModelReport {
    /// Create an empty report for a model.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Result of a complete batch run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Number of texture files indexed.
    pub textures_indexed: usize,
    /// Texture names shared by more than one file.
    pub duplicate_names: Vec<String>,
    /// Per-model outcomes in processing order.
    pub models: Vec<ModelReport>,
    /// Failure counts across all models.
    pub counters: RewriteCounters,
    /// Whether model files were left untouched.
    pub dry_run: bool,
}

impl RunReport {
    /// Total occurrences rewritten across all models.
    pub fn rewritten(&self) -> usize {
        self.models.iter().map(|m| m.rewritten).sum()
    }

    /// Models that could not be read or written.
    pub fn io_failures(&self) -> usize {
        self.models.iter().filter(|m| m.io_error.is_some()).count()
    }

    /// Generate the end-of-run summary.
    pub fn to_text(&self) -> String {
        let mut lines = vec![
            "...ALL DONE!".to_string(),
            String::new(),
            format!("Models processed:      {}", self.models.len()),
            format!("Textures indexed:      {}", self.textures_indexed),
            format!("Duplicate names:       {}", self.duplicate_names.len()),
            format!("Paths rewritten:       {}", self.rewritten()),
        ];

        if self.io_failures() > 0 {
            lines.push(format!("Unreadable models:     {}", self.io_failures()));
        }
        if self.dry_run {
            lines.push("Dry run: no model files were written".to_string());
        }

        lines.push(String::new());
        lines.push("Total errors found:".to_string());
        lines.extend(self.counters.summary_lines());

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_record_by_kind() {
        let mut counters = RewriteCounters::default();
        counters.record(&RewriteError::MissingEndMarker { offset: 0 });
        counters.record(&RewriteError::MissingEndMarker { offset: 8 });
        counters.record(&RewriteError::TextureNotFound {
            name: "a.tif".to_string(),
        });

        assert_eq!(counters.offset_not_found, 2);
        assert_eq!(counters.texture_not_found, 1);
        assert_eq!(counters.relative_path_failures, 0);
        assert_eq!(counters.total(), 3);
        assert_eq!(counters.get(ErrorKind::Offset), 2);
    }

    #[test]
    fn test_summary_lines_order() {
        let counters = RewriteCounters {
            texture_not_found: 1,
            offset_not_found: 2,
            relative_path_failures: 3,
        };
        let lines = counters.summary_lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("ERR_TEXTURE_NOT_FOUND") && lines[0].ends_with('1'));
        assert!(lines[1].contains("ERR_OFFSET") && lines[1].ends_with('2'));
        assert!(lines[2].contains("ERR_RELATIVE_PATH") && lines[2].ends_with('3'));
    }

    #[test]
    fn test_run_report_text() {
        let mut model = ModelReport::new("/r/a.max");
        model.occurrences = 3;
        model.rewritten = 2;
        model.failed = 1;

        let report = RunReport {
            textures_indexed: 4,
            duplicate_names: vec!["wood.tif".to_string()],
            models: vec![model],
            counters: RewriteCounters {
                texture_not_found: 1,
                ..Default::default()
            },
            dry_run: true,
        };

        let text = report.to_text();
        assert_eq!(report.rewritten(), 2);
        assert!(text.contains("Paths rewritten:       2"));
        assert!(text.contains("Dry run"));
        assert!(text.contains("Total errors found:"));
        assert!(!text.contains("Unreadable models"));
    }
}
