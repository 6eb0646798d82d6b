//! Quarantine capability
//!
//! Submissions the tokenizer rejects can be copied aside for manual inspection. The
//! destination is injected by the caller; the core never resolves a global folder.

use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, info};

/// Files copied by one quarantine attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuarantineOutcome {
    pub copied: usize,
    pub failed: usize,
}

/// Provides the directory a rejected submission is copied to
pub trait QuarantineDestination: Send + Sync {
    /// Directory for one submission, created if needed
    fn destination(&self, tokenizer_id: &str, submission_name: &str) -> io::Result<PathBuf>;

    /// Copy every file of a submission into its destination
    ///
    /// Files are flattened by file name and existing files are never overwritten, so
    /// a second file with the same name counts as failed. Copy failures are logged
    /// and counted, never returned: quarantine must not change the outcome of a parse.
    fn quarantine(
        &self,
        tokenizer_id: &str,
        submission_name: &str,
        files: &BTreeSet<PathBuf>,
    ) -> QuarantineOutcome {
        let directory = match self.destination(tokenizer_id, submission_name) {
            Ok(directory) => directory,
            Err(e) => {
                error!(
                    submission = submission_name,
                    error = %e,
                    "failed to create quarantine directory"
                );
                return QuarantineOutcome {
                    copied: 0,
                    failed: files.len(),
                };
            }
        };

        info!(
            submission = submission_name,
            directory = %directory.display(),
            "copying erroneous submission"
        );

        let mut outcome = QuarantineOutcome::default();
        for file in files {
            match copy_into(file, &directory) {
                Ok(()) => outcome.copied += 1,
                Err(e) => {
                    error!(file = %file.display(), error = %e, "error copying file");
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }
}

fn copy_into(file: &Path, directory: &Path) -> io::Result<()> {
    let name = file.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", file.display()),
        )
    })?;
    let mut source = File::open(file)?;
    let mut target = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(directory.join(name))?;
    io::copy(&mut source, &mut target)?;
    Ok(())
}
