//! Command-line front ends, one module per binary.
//!
//! Every `entry()` returns `Ok(exit_code)` or `Err(())` after the error has
//! already been printed, and the binaries turn that into the process status.

pub mod commit_dated;
pub mod erase;
pub mod reword;
pub mod reword_all;
pub mod spread;
pub mod stats;
pub mod synth;

use std::path::{Path, PathBuf};

use console::style;

use crate::error::Error;
use crate::git::{self, Git};
use crate::msg_filter::{self, MessageMap};
use crate::{interrupt, logging, prompt};

/// Prints `err` the way all tools report failures.
pub(crate) fn report(err: Error) {
    match err {
        Error::Interrupted => {
            eprintln!("{}", style("Interrupted by user.").yellow().bold());
        }
        other => {
            eprintln!("{}", style(format!("Error: {}", other)).red().bold());
        }
    }
}

/// Diagnostics and Ctrl-C handling shared by every tool.
pub(crate) fn setup() {
    logging::init();
    interrupt::install();
}

/// Handles `<exe> --msg-filter`, the mode `git filter-branch` invokes the
/// rewriters in. Returns `None` for a normal invocation.
pub(crate) fn msg_filter_mode() -> Option<Result<i32, ()>> {
    let first = std::env::args().nth(1);
    if first.as_deref() != Some("--msg-filter") {
        return None;
    }

    Some(match msg_filter::run() {
        Ok(_) => Ok(0),
        Err(e) => {
            eprintln!(
                "{}",
                style(format!("Message filter error: {}", e)).red().bold()
            );
            Err(())
        }
    })
}

/// Verifies `git` is available and resolves the repository root.
pub(crate) fn verify_environment(repo: Option<&Path>) -> Result<(Git, PathBuf), ()> {
    git::ensure_available().map_err(report)?;
    Git::open(repo).map_err(report)
}

fn self_filter_command() -> Result<String, Error> {
    match std::env::current_exe() {
        Ok(path) => Ok(git::build_msg_filter_command(&path.to_string_lossy())),
        Err(e) => Err(Error::io("cannot locate current executable", e)),
    }
}

/// Runs the message rewrite, then optionally offers a force-push.
pub(crate) fn rewrite_and_push(
    git: &Git,
    map: &MessageMap,
    push: bool,
    remote: &str,
) -> Result<(), ()> {
    let filter = self_filter_command().map_err(report)?;

    println!(
        "{}",
        style("Running git filter-branch (this can take a while)...").cyan()
    );
    git.rewrite_messages(map, &filter).map_err(report)?;
    println!(
        "{}",
        style("✅ History rewritten.").green().bold()
    );

    if !push {
        println!(
            "{}",
            style("Remember to force-push if the branch was already published.").yellow()
        );
        return Ok(());
    }

    let branch = git.current_branch().map_err(report)?;
    let mut confirm_prompter = prompt::DialoguerConfirmPrompter;
    match prompt::confirm_push(&mut confirm_prompter, remote, &branch) {
        Ok(true) => {
            git.push_force_with_lease(remote, &branch).map_err(report)?;
            println!("{}", style(format!("Pushed {branch} to {remote}.")).green());
        }
        Ok(false) => {
            println!(
                "{}",
                style("Push skipped. The rewritten history is local only.").yellow()
            );
        }
        Err(e) => {
            report(e);
            return Err(());
        }
    }
    Ok(())
}
