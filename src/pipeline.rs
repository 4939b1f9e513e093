use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::classify::classify_workbook;
use crate::config::NormalizerConfig;
use crate::error::{Result, ToolError};
use crate::io::{excel_read, excel_write};
use crate::matcher::FuzzyMatcher;

/// File extension, compared case-insensitively, of the files a run picks up.
pub const INPUT_EXTENSION: &str = "xlsx";

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// At least one sheet survived; the normalized workbook was written.
    Accepted {
        sheets: Vec<String>,
        excluded_sheets: Vec<String>,
        output: PathBuf,
    },
    /// No sheet survived; the source was copied unchanged.
    Rejected { output: PathBuf },
    /// The file could not be read, written, or copied.
    Failed { error: String },
}

/// Outcome for a single input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub source: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Per-file outcomes of a folder run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub accepted_dir: PathBuf,
    pub rejected_dir: PathBuf,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn accepted(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Accepted { .. }))
    }

    pub fn rejected(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Rejected { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Looks up the report entry for a source file name.
    pub fn file(&self, file_name: &str) -> Option<&FileReport> {
        self.files
            .iter()
            .find(|report| report.source.file_name().is_some_and(|name| name == file_name))
    }

    /// Persists the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}

/// Drives a folder run. The matcher, and therefore its cache, is shared by
/// every file the pipeline processes.
#[derive(Debug, Clone)]
pub struct FolderPipeline {
    config: NormalizerConfig,
    matcher: FuzzyMatcher,
}

impl FolderPipeline {
    pub fn new(config: NormalizerConfig) -> Self {
        let matcher = FuzzyMatcher::new(config.vocabulary.clone(), config.threshold);
        Self { config, matcher }
    }

    pub fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }

    /// Normalizes every `.xlsx` file directly inside `input`.
    ///
    /// Accepted workbooks are written to the accepted directory and rejected
    /// files copied verbatim to the rejected directory, both created under
    /// `input` and overwritten file by file. A failing file is recorded in the
    /// report and does not stop the run; only problems with the input or
    /// output directories are returned as errors.
    #[instrument(level = "info", skip_all, fields(input = %input.display()))]
    pub fn run(&mut self, input: &Path) -> Result<RunReport> {
        if !input.exists() {
            return Err(ToolError::MissingInput(input.to_path_buf()));
        }
        if !input.is_dir() {
            return Err(ToolError::NotADirectory(input.to_path_buf()));
        }

        let accepted_dir = input.join(&self.config.accepted_dir);
        let rejected_dir = input.join(&self.config.rejected_dir);
        fs::create_dir_all(&accepted_dir)?;
        fs::create_dir_all(&rejected_dir)?;

        let sources = list_input_files(input)?;
        info!(file_count = sources.len(), "processing folder");

        let mut report = RunReport {
            input: input.to_path_buf(),
            accepted_dir: accepted_dir.clone(),
            rejected_dir: rejected_dir.clone(),
            files: Vec::with_capacity(sources.len()),
        };

        for source in sources {
            let outcome = match self.process_file(&source, &accepted_dir, &rejected_dir) {
                Ok(outcome) => outcome,
                Err(error) => {
                    warn!(source = %source.display(), %error, "failed to process file");
                    FileOutcome::Failed {
                        error: error.to_string(),
                    }
                }
            };
            report.files.push(FileReport { source, outcome });
        }

        info!(
            accepted = report.accepted(),
            rejected = report.rejected(),
            failed = report.failed(),
            cached_labels = self.matcher.cache().len(),
            "folder processed"
        );
        Ok(report)
    }

    /// Loads, classifies, and routes one workbook.
    #[instrument(level = "debug", skip_all, fields(source = %source.display()))]
    pub fn process_file(
        &mut self,
        source: &Path,
        accepted_dir: &Path,
        rejected_dir: &Path,
    ) -> Result<FileOutcome> {
        let file_name = source
            .file_name()
            .ok_or_else(|| ToolError::InvalidWorkbook(format!("{} has no file name", source.display())))?;
        let file_name_text = file_name.to_string_lossy();

        let mut workbook = excel_read::read_workbook(source)?;
        let classification = classify_workbook(&mut workbook, &file_name_text, &mut self.matcher);

        if classification.is_accepted() {
            let output = accepted_dir.join(file_name);
            excel_write::write_workbook(&output, &workbook)?;
            info!(
                file = %file_name_text,
                sheets = ?classification.surviving,
                excluded = ?classification.excluded,
                "accepted"
            );
            Ok(FileOutcome::Accepted {
                sheets: classification.surviving,
                excluded_sheets: classification.excluded,
                output,
            })
        } else {
            let output = rejected_dir.join(file_name);
            fs::copy(source, &output)?;
            info!(file = %file_name_text, "rejected, copied unchanged");
            Ok(FileOutcome::Rejected { output })
        }
    }
}

/// Convenience wrapper running a fresh [`FolderPipeline`] over one folder.
pub fn process_folder(input: &Path, config: NormalizerConfig) -> Result<RunReport> {
    FolderPipeline::new(config).run(input)
}

/// Regular files directly inside `dir` with the input extension, sorted by
/// name so that label resolution order is reproducible.
pub fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }
        let matches_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION));
        if matches_extension {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
