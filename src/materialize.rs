use std::fmt;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

use crate::options::MaterializeOptions;
use crate::util::fs as ufs;

/// Lexical guess at what a path is meant to be.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathKind {
    Directory,
    File,
}

/// A `.` anywhere in the final segment makes a file; anything else, including
/// a trailing separator, makes a directory. Nothing on disk is consulted.
pub fn classify(path: &Utf8Path) -> PathKind {
    let last = path
        .as_str()
        .rsplit(std::path::is_separator)
        .next()
        .unwrap_or_default();
    if last.contains('.') {
        PathKind::File
    } else {
        PathKind::Directory
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    CreatedDirectory,
    CreatedFile,
    Exists,
    Skipped,
    DirectoryCreateFailed,
    FileCreateFailed,
}

impl Outcome {
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            Outcome::DirectoryCreateFailed | Outcome::FileCreateFailed
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            Outcome::CreatedDirectory => "created-directory",
            Outcome::CreatedFile => "created-file",
            Outcome::Exists => "exists",
            Outcome::Skipped => "skipped",
            Outcome::DirectoryCreateFailed => "directory-create-failed",
            Outcome::FileCreateFailed => "file-create-failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcomes of one run, in input order.
#[derive(Debug, Default)]
pub struct Report {
    entries: Vec<(Utf8PathBuf, Outcome)>,
}

impl Report {
    pub fn entries(&self) -> &[(Utf8PathBuf, Outcome)] {
        &self.entries
    }

    pub fn outcomes(&self) -> impl Iterator<Item = Outcome> + '_ {
        self.entries.iter().map(|(_, outcome)| *outcome)
    }

    pub fn failures(&self) -> usize {
        self.outcomes().filter(|o| o.is_failure()).count()
    }
}

/// Drives the per-path state machine: probe, skip, classify, create, then
/// apply mode and timestamp.
#[derive(Debug)]
pub struct Materializer {
    options: MaterializeOptions,
}

impl Materializer {
    pub fn new(options: MaterializeOptions) -> Self {
        Self { options }
    }

    /// Process every path in order, writing status lines to `out`.
    ///
    /// Per-path failures are recorded in the report and never stop the loop;
    /// only a failing `out` does.
    pub fn run<W: Write>(&self, paths: &[Utf8PathBuf], out: &mut W) -> io::Result<Report> {
        if self.options.verbose {
            writeln!(out, "Starting makit operation in verbose mode.")?;
            if let Some(mode) = self.options.mode {
                writeln!(out, "Using mode: {}", mode)?;
            }
            if let Some(ts) = self.options.timestamp {
                writeln!(out, "Using timestamp: {}", ts)?;
            }
        }

        let mut report = Report::default();
        for path in paths {
            let outcome = self.materialize(path, out)?;
            debug!(path = %path, outcome = %outcome, "path processed");
            report.entries.push((path.clone(), outcome));
        }
        Ok(report)
    }

    pub fn materialize<W: Write>(&self, path: &Utf8Path, out: &mut W) -> io::Result<Outcome> {
        if self.options.verbose {
            writeln!(out, "Processing path: {}", path)?;
        }

        if ufs::exists(path.as_std_path()) {
            writeln!(out, "Exists: {}", path)?;
            self.apply_attributes(path, out)?;
            return Ok(Outcome::Exists);
        }

        if self.options.no_create {
            writeln!(out, "Skipped (not created): {}", path)?;
            return Ok(Outcome::Skipped);
        }

        let outcome = match classify(path) {
            PathKind::Directory => self.create_directory(path, out)?,
            PathKind::File => self.create_file(path, out)?,
        };
        if !outcome.is_failure() {
            self.apply_attributes(path, out)?;
        }
        Ok(outcome)
    }

    fn create_directory<W: Write>(&self, path: &Utf8Path, out: &mut W) -> io::Result<Outcome> {
        let mode = self.options.creation_mode();
        match ufs::ensure_dir(path.as_std_path(), mode.bits()) {
            Ok(()) => {
                writeln!(out, "Created directory: {}", path)?;
                Ok(Outcome::CreatedDirectory)
            }
            Err(err) => {
                writeln!(out, "Error creating directory: {}: {}", path, err)?;
                Ok(Outcome::DirectoryCreateFailed)
            }
        }
    }

    fn create_file<W: Write>(&self, path: &Utf8Path, out: &mut W) -> io::Result<Outcome> {
        let mode = self.options.creation_mode();

        if let Some(parent) = path.parent().filter(|p| !matches!(p.as_str(), "" | ".")) {
            if self.options.verbose {
                writeln!(out, "Ensuring parent directory: {}", parent)?;
            }
            // An unusable parent surfaces as the file creation error below.
            if let Err(err) = ufs::ensure_dir(parent.as_std_path(), mode.bits()) {
                debug!(parent = %parent, error = %err, "parent directory not created");
            }
        }

        match ufs::create_empty_file(path.as_std_path(), mode.bits()) {
            Ok(()) => {
                writeln!(out, "Created file: {}", path)?;
                Ok(Outcome::CreatedFile)
            }
            Err(err) => {
                writeln!(out, "Error creating file: {}: {}", path, err)?;
                Ok(Outcome::FileCreateFailed)
            }
        }
    }

    /// Best effort: failures are logged and do not change the outcome.
    fn apply_attributes<W: Write>(&self, path: &Utf8Path, out: &mut W) -> io::Result<()> {
        if let Some(mode) = self.options.mode {
            if self.options.verbose {
                writeln!(out, "Setting mode {} on {}", mode, path)?;
            }
            if let Err(err) = ufs::set_mode(path.as_std_path(), mode.permission_bits()) {
                warn!(path = %path, mode = %mode, error = %err, "failed to set mode");
            }
        }

        if let Some(ts) = self.options.timestamp {
            if self.options.verbose {
                writeln!(out, "Setting timestamp {} on {}", ts, path)?;
            }
            if let Err(err) = ufs::set_times(path.as_std_path(), ts.to_file_time()) {
                warn!(path = %path, timestamp = %ts, error = %err, "failed to set timestamp");
            }
        }

        Ok(())
    }
}
