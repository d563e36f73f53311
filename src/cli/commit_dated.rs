use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::Parser;
use console::style;
use tracing::instrument;

use super::{report, setup, verify_environment};
use crate::dates::{default_message, git_timestamp, parse_commit_datetime};
use crate::error::{Error, Result};
use crate::git::{CommitOutcome, Git};

/// Make a commit whose author and committer dates are set to DATE.
#[derive(Parser, Debug)]
#[command(name = "git-commit-dated", version, about, long_about = None)]
pub struct Args {
    /// Commit date: YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS]
    pub date: String,

    /// Commit message (default: "Commit on <date>")
    #[arg(short, long)]
    pub message: Option<String>,

    /// Stage these files before committing
    #[arg(short, long, num_args = 1..)]
    pub files: Vec<String>,

    /// Stage all changes, including new files (git add -A)
    #[arg(short, long)]
    pub all: bool,

    /// Commit even if nothing is staged
    #[arg(long)]
    pub allow_empty: bool,

    /// Repository to commit in (defaults to the current directory)
    #[arg(short = 'C', long)]
    pub repo: Option<PathBuf>,
}

/// How the index is prepared before the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagingMode {
    Files(Vec<String>),
    All,
    AlreadyStaged,
}

impl StagingMode {
    pub fn from_flags(files: &[String], all: bool) -> Result<StagingMode> {
        match (files.is_empty(), all) {
            (false, true) => Err(Error::ConflictingStaging),
            (false, false) => Ok(StagingMode::Files(files.to_vec())),
            (true, true) => Ok(StagingMode::All),
            (true, false) => Ok(StagingMode::AlreadyStaged),
        }
    }
}

/// Stages according to `staging` and makes one commit dated `when`.
///
/// Without `allow_empty`, an empty index is reported as
/// [`Error::NothingStaged`] and no commit is made.
#[instrument(skip(git, message))]
pub fn commit_with_date(
    git: &Git,
    staging: &StagingMode,
    when: &NaiveDateTime,
    message: &str,
    allow_empty: bool,
) -> Result<()> {
    match staging {
        StagingMode::Files(files) => git.stage_paths(files.as_slice())?,
        StagingMode::All => git.stage_all()?,
        StagingMode::AlreadyStaged => {}
    }

    if !allow_empty && !git.has_staged_changes()? {
        return Err(Error::NothingStaged);
    }

    match git.commit_at(message, when, allow_empty)? {
        CommitOutcome::Created => Ok(()),
        CommitOutcome::NothingToCommit => Err(Error::NothingStaged),
    }
}

/// Main entry point for `git-commit-dated`.
pub fn entry() -> std::result::Result<i32, ()> {
    setup();
    let args = Args::parse();

    // Validate everything before touching the index.
    let when = parse_commit_datetime(&args.date).map_err(report)?;
    let staging = StagingMode::from_flags(&args.files, args.all).map_err(report)?;
    let message = match &args.message {
        Some(m) => m.clone(),
        None => default_message(&when),
    };

    let (repo_git, root) = verify_environment(args.repo.as_deref())?;
    // Without --repo, file arguments are relative to the invocation directory.
    let git = if args.repo.is_some() {
        repo_git
    } else {
        Git::current()
    };
    println!("{} {}", style("Repository:").cyan(), root.display());
    if staging == StagingMode::AlreadyStaged {
        println!(
            "{}",
            style("No files given; committing what is already staged.").dim()
        );
    }

    commit_with_date(&git, &staging, &when, &message, args.allow_empty).map_err(report)?;
    println!(
        "{}",
        style(format!("✅ Commit created with date {}", git_timestamp(&when)))
            .green()
            .bold()
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_and_all_conflict() {
        let files = vec!["a.txt".to_string()];
        assert!(matches!(
            StagingMode::from_flags(&files, true),
            Err(Error::ConflictingStaging)
        ));
    }

    #[test]
    fn staging_modes() {
        let files = vec!["a.txt".to_string(), "b c.txt".to_string()];
        assert_eq!(
            StagingMode::from_flags(&files, false).unwrap(),
            StagingMode::Files(files.clone())
        );
        assert_eq!(StagingMode::from_flags(&[], true).unwrap(), StagingMode::All);
        assert_eq!(
            StagingMode::from_flags(&[], false).unwrap(),
            StagingMode::AlreadyStaged
        );
    }

    #[test]
    fn args_accept_several_files() {
        let args = Args::try_parse_from([
            "git-commit-dated",
            "2024-12-31T10:15",
            "-m",
            "fix: final touches",
            "--files",
            "a.txt",
            "b.txt",
        ])
        .unwrap();
        assert_eq!(args.files, vec!["a.txt", "b.txt"]);
        assert_eq!(args.message.as_deref(), Some("fix: final touches"));
        assert!(!args.all);
    }
}
