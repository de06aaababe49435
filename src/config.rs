//! Runtime options for an export run.

use std::path::PathBuf;

/// File name of the assessment artifact inside the output directory.
pub const ASSESSMENTS_FILE: &str = "assessments.txt";
/// File name of the score artifact inside the output directory.
pub const SCORES_FILE: &str = "scores.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Terms to export; empty means the currently active terms.
    pub terms: Vec<String>,
    pub output_dir: PathBuf,
    /// Export per provider section instead of per site.
    pub use_provider: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            terms: Vec::new(),
            output_dir: std::env::temp_dir(),
            use_provider: false,
        }
    }
}

impl ExportConfig {
    /// Builds a config, trimming term ids and dropping blank ones.
    ///
    /// `output_dir` falls back to the platform temp directory.
    pub fn new<I, S>(terms: I, output_dir: Option<PathBuf>, use_provider: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            terms,
            output_dir: output_dir.unwrap_or_else(std::env::temp_dir),
            use_provider,
        }
    }

    pub fn assessments_path(&self) -> PathBuf {
        self.output_dir.join(ASSESSMENTS_FILE)
    }

    pub fn scores_path(&self) -> PathBuf {
        self.output_dir.join(SCORES_FILE)
    }
}
