use clap::Parser;
use console::style;

use super::{msg_filter_mode, report, rewrite_and_push, setup, verify_environment};
use crate::banner::{print_banner, rewrite_lines};
use crate::error::Error;
use crate::git::Git;
use crate::msg_filter::MessageMap;

/// Change the message of a single commit, rewriting the current branch.
#[derive(Parser, Debug)]
#[command(name = "git-reword-commit", version, about, long_about = None)]
pub struct Args {
    /// Commit to reword (full or abbreviated hash, tag, HEAD~2, ...)
    pub commit: String,

    /// New commit message; several words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,

    /// Offer to force-push the branch after the rewrite
    #[arg(long)]
    pub push: bool,

    /// Remote to push to
    #[arg(long, default_value = "origin")]
    pub remote: String,
}

/// Joins message words with single spaces and trims the result.
pub fn join_message<S: AsRef<str>>(words: &[S]) -> Result<String, Error> {
    let message = words
        .iter()
        .map(|w| w.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    if message.is_empty() {
        Err(Error::EmptyMessage)
    } else {
        Ok(message)
    }
}

/// Resolves `id` to a full commit hash on the current branch.
///
/// Commits outside `HEAD`'s history are refused: the rewrite only walks
/// `HEAD`, so their message would silently stay as it is.
pub fn resolve_target(git: &Git, id: &str) -> Result<String, Error> {
    let full = git.resolve_commit(id)?;
    if git.is_ancestor_of_head(&full)? {
        Ok(full)
    } else {
        Err(Error::NotOnBranch(id.to_string()))
    }
}

/// Main entry point for `git-reword-commit`.
///
/// 1. Acts as the `filter-branch` message filter when invoked with `--msg-filter`.
/// 2. Checks that the working tree is clean and the commit exists.
/// 3. Rewrites the branch so only that commit's message changes.
/// 4. Optionally force-pushes after confirmation.
pub fn entry() -> Result<i32, ()> {
    if let Some(res) = msg_filter_mode() {
        return res;
    }
    setup();
    let args = Args::parse();

    let message = join_message(&args.message).map_err(report)?;
    let (git, _root) = verify_environment(None)?;

    if !git.is_worktree_clean().map_err(report)? {
        report(Error::DirtyWorktree);
        return Err(());
    }
    let target = resolve_target(&git, &args.commit).map_err(report)?;
    let branch = git.current_branch().map_err(report)?;

    print_banner(&rewrite_lines(&branch, 1));
    println!(
        "{} {}",
        style("Rewriting message of").cyan(),
        style(&target).yellow()
    );

    let mut map = MessageMap::new();
    map.insert(target, message);
    rewrite_and_push(&git, &map, args.push, &args.remote)?;

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_joined() {
        let msg = join_message(&["fix:", "typo", "in", "README"]).unwrap();
        assert_eq!(msg, "fix: typo in README");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(join_message(&["  hello  "]).unwrap(), "hello");
    }

    #[test]
    fn blank_message_is_rejected() {
        assert!(matches!(join_message(&["  ", ""]), Err(Error::EmptyMessage)));
    }

    #[test]
    fn args_parse_trailing_words() {
        let args = Args::try_parse_from(["git-reword-commit", "abc123", "new", "text", "--push"])
            .unwrap();
        assert_eq!(args.commit, "abc123");
        assert_eq!(args.message, vec!["new", "text"]);
        assert!(args.push);
        assert_eq!(args.remote, "origin");
    }

    #[test]
    fn args_require_a_message() {
        assert!(Args::try_parse_from(["git-reword-commit", "abc123"]).is_err());
    }
}
