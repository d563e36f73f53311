use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use console::style;
use tracing::info;

use super::{report, setup, verify_environment};
use crate::banner::{erase_lines, print_banner};
use crate::error::{Error, Result};
use crate::git::Git;
use crate::prompt;

/// Delete all commit history and start over with an empty repository.
/// Files in the working tree are kept.
#[derive(Parser, Debug)]
#[command(name = "git-erase-history", version, about, long_about = None)]
pub struct Args {
    /// Repository to erase (defaults to the current directory)
    #[arg(short = 'C', long)]
    pub repo: Option<PathBuf>,
}

/// Refuses anything but a plain `<root>/.git` directory, so a linked worktree
/// or submodule never takes its parent's object store down with it.
pub fn check_git_dir(root: &Path, git_dir: &Path) -> Result<()> {
    if git_dir == root.join(".git") && git_dir.is_dir() {
        Ok(())
    } else {
        Err(Error::UnsupportedGitDir(git_dir.to_path_buf()))
    }
}

/// Removes the git directory and runs `git init` in `root`.
pub fn erase(root: &Path, git_dir: &Path) -> Result<()> {
    check_git_dir(root, git_dir)?;
    info!(dir = %git_dir.display(), "removing git directory");
    fs::remove_dir_all(git_dir)
        .map_err(|e| Error::io(format!("cannot remove {}", git_dir.display()), e))?;
    Git::at(root).init()
}

/// Main entry point for `git-erase-history`.
pub fn entry() -> std::result::Result<i32, ()> {
    setup();
    let args = Args::parse();

    let (git, root) = verify_environment(args.repo.as_deref())?;
    let git_dir = git.git_dir().map_err(report)?;
    check_git_dir(&root, &git_dir).map_err(report)?;

    let shown = root.display().to_string();
    print_banner(&erase_lines(&shown));

    let mut confirm_prompter = prompt::DialoguerConfirmPrompter;
    match prompt::confirm_erase(&mut confirm_prompter, &shown) {
        Ok(true) => {}
        Ok(false) => {
            println!("{}", style("Canceled. Nothing was deleted.").yellow().bold());
            return Ok(0);
        }
        Err(e) => {
            report(e);
            return Err(());
        }
    }

    erase(&root, &git_dir).map_err(report)?;
    println!("{}", style("✓ Removed old history, initialized a new repository.").green());

    match Git::at(&root).status_text() {
        Ok(status) => println!("\n{status}\n"),
        Err(e) => report(e),
    }
    println!(
        "{}",
        style("✅ History erased. All files were kept in the working tree.")
            .green()
            .bold()
    );
    Ok(0)
}
