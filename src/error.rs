use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop one of the history tools.
///
/// Variants are grouped the way the tools react to them: precondition failures
/// are detected before anything is mutated, tool failures carry the text `git`
/// printed, and a plan step failure names the file whose commit failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("`git` not found in PATH")]
    GitNotFound,

    #[error("not inside a git repository ({0})")]
    NotARepository(String),

    #[error("directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error(
        "the working tree has uncommitted changes; commit or stash them before rewriting history"
    )]
    DirtyWorktree,

    #[error(
        "the index already contains staged changes; unstage them first so they are not bundled into the new commits"
    )]
    StagedChanges,

    #[error("commit '{0}' not found")]
    UnknownCommit(String),

    #[error("commit '{0}' is not on the current branch")]
    NotOnBranch(String),

    #[error("the new commit message is empty")]
    EmptyMessage,

    #[error("invalid date '{raw}': expected {expected}")]
    InvalidDate { raw: String, expected: &'static str },

    #[error("end date {end} is earlier than start date {start}")]
    InvalidRange { start: String, end: String },

    #[error("--files and --all cannot be used together")]
    ConflictingStaging,

    #[error("nothing staged; add files, use --all, or pass --allow-empty")]
    NothingStaged,

    #[error("no commits found")]
    NoCommits,

    #[error("no uncommitted files found; nothing to commit")]
    NothingToCommit,

    #[error("git directory {} is not <root>/.git; refusing to erase it", .0.display())]
    UnsupportedGitDir(PathBuf),

    #[error("template {} has no stats loader markers", .0.display())]
    MissingTemplateMarkers(PathBuf),

    #[error("`git {command}` failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid message map: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} is not set")]
    MissingEnv(&'static str),

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("failed to commit {path}: {source}")]
    PlanStep {
        path: String,
        #[source]
        source: Box<Error>,
    },

    #[error("interrupted by user")]
    Interrupted,
}

impl Error {
    /// Wraps an I/O error with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn plan_step_names_the_file() {
        let err = Error::PlanStep {
            path: "src/a b.rs".to_string(),
            source: Box::new(Error::Git {
                command: "commit".to_string(),
                stderr: "boom".to_string(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "failed to commit src/a b.rs: `git commit` failed: boom"
        );
    }

    #[test]
    fn range_error_mentions_both_dates() {
        let err = Error::InvalidRange {
            start: "2024-02-01".to_string(),
            end: "2024-01-01".to_string(),
        };
        let s = err.to_string();
        assert!(s.contains("2024-02-01"));
        assert!(s.contains("2024-01-01"));
    }
}
