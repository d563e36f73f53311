use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use console::style;
use tracing::instrument;

use super::{report, setup, verify_environment};
use crate::dates::{date_range, noon, parse_day};
use crate::error::{Error, Result};
use crate::git::{CommitOutcome, Git};
use crate::plan::{PlanEntry, build_plan};
use crate::prompt::{self, StringPrompter};

/// Commit every uncommitted file separately, spreading the commits over a
/// date range.
#[derive(Parser, Debug)]
#[command(name = "git-commit-spread", version, about, long_about = None)]
pub struct Args {
    /// Repository to work in, relative or absolute (defaults to the current directory)
    #[arg(short = 'C', long)]
    pub repo: Option<PathBuf>,

    /// First date of the range, YYYY-MM-DD (prompted for when omitted)
    #[arg(long)]
    pub start: Option<String>,

    /// Last date of the range, inclusive, YYYY-MM-DD (prompted for when omitted)
    #[arg(long)]
    pub end: Option<String>,

    /// Do not ask for confirmation before committing
    #[arg(short, long)]
    pub yes: bool,
}

/// Fails when anything is already staged.
pub fn ensure_clean_index(git: &Git) -> Result<()> {
    if git.staged_paths()?.is_empty() {
        Ok(())
    } else {
        Err(Error::StagedChanges)
    }
}

/// Commit message used for one file of the plan.
pub fn commit_message(path: &str) -> String {
    format!("Auto commit for {path}")
}

/// Commits each plan entry on its own, at noon of its date.
///
/// Stops at the first failure; commits made before it are kept.
#[instrument(skip_all, fields(commits = plan.len()))]
pub fn execute_plan(
    git: &Git,
    plan: &[PlanEntry],
    on_commit: &mut dyn FnMut(&PlanEntry),
) -> Result<()> {
    for entry in plan {
        let step = || -> Result<()> {
            git.stage_paths(&[entry.path.as_str()])?;
            match git.commit_at(&commit_message(&entry.path), &noon(entry.date), false)? {
                CommitOutcome::Created => Ok(()),
                CommitOutcome::NothingToCommit => Err(Error::NothingStaged),
            }
        };
        if let Err(e) = step() {
            return Err(Error::PlanStep {
                path: entry.path.clone(),
                source: Box::new(e),
            });
        }
        on_commit(entry);
    }
    Ok(())
}

fn read_date<P: StringPrompter>(
    prompter: &mut P,
    flag: Option<&str>,
    label: &str,
) -> Result<NaiveDate> {
    match flag {
        Some(raw) => parse_day(raw),
        None => prompt::ask_date(prompter, label),
    }
}

fn print_plan(plan: &[PlanEntry]) {
    println!();
    println!("{}", style("Planned commits:").bold());
    for entry in plan {
        println!("  {}  ->  {}", style(entry.date).cyan(), entry.path);
    }
    println!();
}

/// Main entry point for `git-commit-spread`.
pub fn entry() -> std::result::Result<i32, ()> {
    setup();
    let args = Args::parse();

    let (git, root) = verify_environment(args.repo.as_deref())?;
    println!("{} {}", style("Repository root:").cyan(), root.display());
    ensure_clean_index(&git).map_err(report)?;

    let mut string_prompter = prompt::DialoguerStringPrompter;
    let start = read_date(&mut string_prompter, args.start.as_deref(), "Start date").map_err(report)?;
    let end = read_date(&mut string_prompter, args.end.as_deref(), "End date").map_err(report)?;
    let dates = date_range(start, end).map_err(report)?;

    let files = git.uncommitted_paths().map_err(report)?;
    if files.is_empty() {
        report(Error::NothingToCommit);
        return Err(());
    }

    let plan = build_plan(&files, &dates).map_err(report)?;
    print_plan(&plan);

    if !args.yes {
        let mut confirm_prompter = prompt::DialoguerConfirmPrompter;
        match prompt::confirm_plan(&mut confirm_prompter, plan.len()) {
            Ok(true) => {}
            Ok(false) => {
                println!(
                    "{}",
                    style("Canceled by user. No changes made.").yellow().bold()
                );
                return Ok(0);
            }
            Err(e) => {
                report(e);
                return Err(());
            }
        }
    }

    execute_plan(&git, &plan, &mut |entry: &PlanEntry| {
        println!("{} {}  {}", style("✓").green(), entry.date, entry.path);
    })
    .map_err(report)?;

    println!(
        "{}",
        style(format!("✅ Done: {} files committed across {} days.", plan.len(), dates.len()))
            .green()
            .bold()
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_file() {
        assert_eq!(commit_message("docs/a b.md"), "Auto commit for docs/a b.md");
    }

    #[test]
    fn args_take_dates_as_flags() {
        let args = Args::try_parse_from([
            "git-commit-spread",
            "--repo",
            "sandbox",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
            "-y",
        ])
        .unwrap();
        assert_eq!(args.repo, Some(PathBuf::from("sandbox")));
        assert_eq!(args.start.as_deref(), Some("2024-01-01"));
        assert!(args.yes);
    }
}
