use clap::Parser;
use console::style;

use super::{msg_filter_mode, report, rewrite_and_push, setup, verify_environment};
use crate::banner::{print_banner, rewrite_lines};
use crate::error::Error;
use crate::prompt::{self, CommitEntry, MessageRewrite};

/// Walk every commit of the current branch and optionally give each a new message.
#[derive(Parser, Debug)]
#[command(name = "git-reword-all", version, about, long_about = None)]
pub struct Args {
    /// Offer to force-push the branch after the rewrite
    #[arg(long)]
    pub push: bool,

    /// Remote to push to
    #[arg(long, default_value = "origin")]
    pub remote: String,
}

fn print_pending(rewrites: &[MessageRewrite]) {
    println!();
    println!("{}", style("Messages to be replaced:").bold());
    for r in rewrites {
        println!("  {} {}", style(&r.commit).yellow(), r.message);
    }
}

/// Main entry point for `git-reword-all`.
///
/// Commits are listed oldest first. An empty answer keeps a message. Nothing
/// is rewritten until the pending changes are confirmed, and then all of them
/// are applied in one `filter-branch` pass.
pub fn entry() -> Result<i32, ()> {
    if let Some(res) = msg_filter_mode() {
        return res;
    }
    setup();
    let args = Args::parse();

    let (git, _root) = verify_environment(None)?;
    if !git.is_worktree_clean().map_err(report)? {
        report(Error::DirtyWorktree);
        return Err(());
    }

    let ids = git.list_commits().map_err(report)?;
    let mut commits = Vec::with_capacity(ids.len());
    for id in ids {
        let message = git.commit_message(&id).map_err(report)?;
        commits.push(CommitEntry { id, message });
    }

    println!(
        "{}",
        style("Enter a new message for each commit. Press Enter to keep it.").cyan()
    );
    let mut string_prompter = prompt::DialoguerStringPrompter;
    let rewrites = prompt::collect_messages(&mut string_prompter, &commits).map_err(report)?;

    if rewrites.is_empty() {
        println!(
            "{}",
            style("No new messages; history left unchanged.")
                .yellow()
                .bold()
        );
        return Ok(0);
    }

    print_pending(&rewrites);
    let branch = git.current_branch().map_err(report)?;
    print_banner(&rewrite_lines(&branch, rewrites.len()));

    let mut confirm_prompter = prompt::DialoguerConfirmPrompter;
    match prompt::confirm_rewrite(&mut confirm_prompter, rewrites.len()) {
        Ok(true) => {
            let map = prompt::to_message_map(&rewrites);
            rewrite_and_push(&git, &map, args.push, &args.remote)?;
        }
        Ok(false) => {
            println!(
                "{}",
                style("Canceled by user. No changes made.").yellow().bold()
            );
        }
        Err(e) => {
            report(e);
            return Err(());
        }
    }

    Ok(0)
}
