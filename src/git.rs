use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use chrono::NaiveDateTime;
use tracing::{debug, instrument};

use crate::dates::git_timestamp;
use crate::error::{Error, Result};
use crate::msg_filter::{MESSAGE_MAP_ENV, MessageMap};

/// Environment variables `git` reads to override commit timestamps.
pub const AUTHOR_DATE_ENV: &str = "GIT_AUTHOR_DATE";
pub const COMMITTER_DATE_ENV: &str = "GIT_COMMITTER_DATE";

/// Outcome of a `git commit` that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Created,
    NothingToCommit,
}

/// Verifies that a `git` executable can be found on `PATH`.
pub fn ensure_available() -> Result<()> {
    match which::which("git") {
        Ok(_) => Ok(()),
        Err(_) => Err(Error::GitNotFound),
    }
}

/// Builds the shell command `git filter-branch --msg-filter` should run.
///
/// `filter-branch` evaluates the filter with `sh`, so the executable path is
/// single-quoted whenever it contains anything besides plain path characters.
///
/// # Examples
///
/// ```
/// use git_history_kit::git::build_msg_filter_command;
///
/// assert_eq!(
///     build_msg_filter_command("/usr/local/bin/git-reword-all"),
///     "/usr/local/bin/git-reword-all --msg-filter"
/// );
/// assert_eq!(
///     build_msg_filter_command("/opt/my tools/git-reword-all"),
///     "'/opt/my tools/git-reword-all' --msg-filter"
/// );
/// ```
pub fn build_msg_filter_command(exe_path: &str) -> String {
    let plain = !exe_path.is_empty()
        && exe_path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-'));

    let quoted = if plain {
        exe_path.to_string()
    } else {
        format!("'{}'", exe_path.replace('\'', r"'\''"))
    };

    format!("{quoted} --msg-filter")
}

/// Parses the output of `git status --porcelain=v1 -z`.
///
/// Returns the set of paths with uncommitted changes, sorted and deduplicated.
/// In `-z` mode a rename or copy entry holds the destination path and is
/// followed by a separate record with the source path, which is skipped.
/// Ignored entries (`!!`) are dropped.
pub fn parse_porcelain_z(raw: &str) -> Vec<String> {
    let mut files = BTreeSet::new();
    let mut entries = raw.split('\0');

    while let Some(entry) = entries.next() {
        if entry.len() < 4 {
            continue;
        }

        let (status, path) = entry.split_at(3);
        let status = &status[..2];

        if status.starts_with('R') || status.starts_with('C') {
            // Source path of the rename/copy.
            entries.next();
        }

        if status == "!!" {
            continue;
        }

        if !path.is_empty() {
            files.insert(path.to_string());
        }
    }

    files.into_iter().collect()
}

fn describe(cmd: &Command) -> String {
    cmd.get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn spawn_output(mut cmd: Command) -> Result<(String, Output)> {
    let label = describe(&cmd);
    debug!(command = %label, "running git");
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    match cmd.output() {
        Ok(out) => Ok((label, out)),
        Err(source) => Err(Error::Spawn {
            program: String::from("git"),
            source,
        }),
    }
}

fn failure(label: String, out: &Output) -> Error {
    let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
    let stderr = if stderr.is_empty() {
        let stdout = String::from_utf8_lossy(&out.stdout).trim().to_string();
        if stdout.is_empty() {
            format!("exited with {}", out.status)
        } else {
            stdout
        }
    } else {
        stderr
    };
    Error::Git {
        command: label,
        stderr,
    }
}

/// Runs a command and returns its untrimmed standard output on success, or a
/// [`Error::Git`] carrying its standard error on failure.
fn run_raw(cmd: Command) -> Result<String> {
    let (label, out) = spawn_output(cmd)?;
    if out.status.success() {
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    } else {
        Err(failure(label, &out))
    }
}

/// Like [`run_raw`], trimming the output.
fn run_output(cmd: Command) -> Result<String> {
    run_raw(cmd).map(|s| s.trim().to_string())
}

/// Runs a command with the terminal attached, so `git` can print progress
/// directly. Only the exit status is inspected.
fn run_status(mut cmd: Command) -> Result<()> {
    let label = describe(&cmd);
    debug!(command = %label, "running git (interactive)");
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());

    match cmd.status() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(Error::Git {
            command: label,
            stderr: format!("exited with {}", status),
        }),
        Err(source) => Err(Error::Spawn {
            program: String::from("git"),
            source,
        }),
    }
}

/// Handle to the repository the tools operate on.
///
/// Each method spawns a fresh `git` process; nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct Git {
    dir: Option<PathBuf>,
}

impl Git {
    /// Operates on the repository containing the current directory.
    pub fn current() -> Self {
        Git { dir: None }
    }

    /// Operates on the repository containing `dir`.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Git {
            dir: Some(dir.into()),
        }
    }

    /// Resolves an optional `--repo` argument to the repository root.
    ///
    /// Relative paths are taken from the current directory. The directory must
    /// exist and lie inside a git work tree.
    pub fn open(repo: Option<&Path>) -> Result<(Self, PathBuf)> {
        let git = match repo {
            Some(p) => {
                let abs = if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    match std::env::current_dir() {
                        Ok(cwd) => cwd.join(p),
                        Err(e) => return Err(Error::io("cannot read current directory", e)),
                    }
                };
                if !abs.is_dir() {
                    return Err(Error::MissingDirectory(abs));
                }
                Git::at(abs)
            }
            None => Git::current(),
        };

        let root = git.toplevel()?;
        Ok((Git::at(root.clone()), root))
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Runs `git rev-parse <flag>` and returns its trimmed output.
    pub fn rev_parse(&self, flag: &str) -> Result<String> {
        let mut cmd = self.git();
        cmd.arg("rev-parse").arg(flag);
        run_output(cmd)
    }

    /// Absolute path of the work tree root.
    pub fn toplevel(&self) -> Result<PathBuf> {
        match self.rev_parse("--show-toplevel") {
            Ok(s) => Ok(PathBuf::from(s)),
            Err(Error::Git { stderr, .. }) => Err(Error::NotARepository(stderr)),
            Err(e) => Err(e),
        }
    }

    /// Absolute path of the repository's git directory.
    pub fn git_dir(&self) -> Result<PathBuf> {
        let mut cmd = self.git();
        cmd.arg("rev-parse").arg("--absolute-git-dir");
        run_output(cmd).map(PathBuf::from)
    }

    /// Returns `true` when `git status --short` reports nothing.
    pub fn is_worktree_clean(&self) -> Result<bool> {
        let mut cmd = self.git();
        cmd.arg("status").arg("--short");
        Ok(run_output(cmd)?.is_empty())
    }

    /// Resolves any commit-ish to its full object name.
    #[instrument(skip(self))]
    pub fn resolve_commit(&self, id: &str) -> Result<String> {
        let mut cmd = self.git();
        cmd.arg("rev-parse")
            .arg("--verify")
            .arg("--quiet")
            .arg(format!("{id}^{{commit}}"));
        match run_output(cmd) {
            Ok(full) if !full.is_empty() => Ok(full),
            Ok(_) | Err(Error::Git { .. }) => Err(Error::UnknownCommit(id.to_string())),
            Err(e) => Err(e),
        }
    }

    /// Whether the current branch has at least one commit.
    pub fn has_head(&self) -> Result<bool> {
        let mut cmd = self.git();
        cmd.arg("rev-parse").arg("--verify").arg("--quiet").arg("HEAD");
        match run_output(cmd) {
            Ok(_) => Ok(true),
            Err(Error::Git { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// All commits reachable from `HEAD`, oldest first.
    pub fn list_commits(&self) -> Result<Vec<String>> {
        if !self.has_head()? {
            return Err(Error::NoCommits);
        }
        let mut cmd = self.git();
        cmd.arg("rev-list").arg("--reverse").arg("HEAD");
        let out = run_output(cmd)?;
        let commits: Vec<String> = out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        if commits.is_empty() {
            return Err(Error::NoCommits);
        }
        Ok(commits)
    }

    /// Full message body of `commit`, trimmed.
    pub fn commit_message(&self, commit: &str) -> Result<String> {
        let mut cmd = self.git();
        cmd.arg("log").arg("-1").arg("--format=%B").arg(commit);
        run_output(cmd)
    }

    /// Name of the checked-out branch.
    pub fn current_branch(&self) -> Result<String> {
        let mut cmd = self.git();
        cmd.arg("rev-parse").arg("--abbrev-ref").arg("HEAD");
        run_output(cmd)
    }

    /// `git add -- <paths>`.
    pub fn stage_paths<S: AsRef<str>>(&self, paths: &[S]) -> Result<()> {
        let mut cmd = self.git();
        cmd.arg("add").arg("--");
        for p in paths {
            cmd.arg(p.as_ref());
        }
        run_output(cmd).map(|_| ())
    }

    /// `git add -A`.
    pub fn stage_all(&self) -> Result<()> {
        let mut cmd = self.git();
        cmd.arg("add").arg("-A");
        run_output(cmd).map(|_| ())
    }

    /// Uses the exit status of `git diff --cached --quiet`: 1 means the index
    /// differs from `HEAD`.
    pub fn has_staged_changes(&self) -> Result<bool> {
        let mut cmd = self.git();
        cmd.arg("diff").arg("--cached").arg("--quiet");
        let (label, out) = spawn_output(cmd)?;
        match out.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(failure(label, &out)),
        }
    }

    /// Whether `commit` is reachable from `HEAD`, i.e. part of the history a
    /// `filter-branch -- HEAD` rewrite touches.
    pub fn is_ancestor_of_head(&self, commit: &str) -> Result<bool> {
        let mut cmd = self.git();
        cmd.arg("merge-base")
            .arg("--is-ancestor")
            .arg(commit)
            .arg("HEAD");
        let (label, out) = spawn_output(cmd)?;
        match out.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(failure(label, &out)),
        }
    }

    /// Paths currently in the index that differ from `HEAD`.
    pub fn staged_paths(&self) -> Result<Vec<String>> {
        let mut cmd = self.git();
        cmd.arg("diff").arg("--cached").arg("--name-only");
        let out = run_output(cmd)?;
        Ok(out
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(String::from)
            .collect())
    }

    /// Modified, deleted and untracked paths, sorted and deduplicated.
    pub fn uncommitted_paths(&self) -> Result<Vec<String>> {
        let mut cmd = self.git();
        cmd.arg("status")
            .arg("--porcelain=v1")
            .arg("-z")
            .arg("--untracked-files=all");
        let raw = run_raw(cmd)?;
        Ok(parse_porcelain_z(&raw))
    }

    /// Commits the index with both timestamps forced to `when`.
    ///
    /// A refusal because there is nothing to commit is reported as
    /// [`CommitOutcome::NothingToCommit`] rather than an error.
    #[instrument(skip(self, message))]
    pub fn commit_at(
        &self,
        message: &str,
        when: &NaiveDateTime,
        allow_empty: bool,
    ) -> Result<CommitOutcome> {
        let cmd = self.commit_command(message, when, allow_empty);
        let (label, out) = spawn_output(cmd)?;
        if out.status.success() {
            return Ok(CommitOutcome::Created);
        }

        let stdout = String::from_utf8_lossy(&out.stdout);
        if stdout.contains("nothing to commit") || stdout.contains("nothing added to commit") {
            return Ok(CommitOutcome::NothingToCommit);
        }
        Err(failure(label, &out))
    }

    fn commit_command(&self, message: &str, when: &NaiveDateTime, allow_empty: bool) -> Command {
        let stamp = git_timestamp(when);
        let mut cmd = self.git();
        cmd.arg("commit").arg("-m").arg(message);
        if allow_empty {
            cmd.arg("--allow-empty");
        }
        cmd.env(AUTHOR_DATE_ENV, &stamp);
        cmd.env(COMMITTER_DATE_ENV, &stamp);
        // The "nothing to commit" check below reads git's English output.
        cmd.env("LC_ALL", "C");
        cmd
    }

    /// Rewrites commit messages on the current branch with `git filter-branch`.
    ///
    /// `filter_command` is the shell command run per commit (see
    /// [`build_msg_filter_command`]); it receives `map` through the
    /// environment. Tags pointing into the rewritten range are rewritten under
    /// the same names.
    #[instrument(skip_all, fields(entries = map.len()))]
    pub fn rewrite_messages(&self, map: &MessageMap, filter_command: &str) -> Result<()> {
        let encoded = serde_json::to_string(map)?;
        let mut cmd = self.git();
        cmd.arg("filter-branch")
            .arg("-f")
            .arg("--msg-filter")
            .arg(filter_command)
            .arg("--tag-name-filter")
            .arg("cat")
            .arg("--")
            .arg("HEAD");
        cmd.env(MESSAGE_MAP_ENV, encoded);
        cmd.env("FILTER_BRANCH_SQUELCH_WARNING", "1");
        run_status(cmd)
    }

    /// `git push --force-with-lease <remote> <branch>`.
    pub fn push_force_with_lease(&self, remote: &str, branch: &str) -> Result<()> {
        let mut cmd = self.git();
        cmd.arg("push")
            .arg("--force-with-lease")
            .arg(remote)
            .arg(branch);
        run_status(cmd)
    }

    /// `git init` in the handle's directory.
    pub fn init(&self) -> Result<()> {
        let mut cmd = self.git();
        cmd.arg("init");
        run_output(cmd).map(|_| ())
    }

    /// Human-readable `git status`.
    pub fn status_text(&self) -> Result<String> {
        let mut cmd = self.git();
        cmd.arg("status");
        run_output(cmd)
    }

    /// Author date of every commit reachable from `HEAD` in ISO-like format
    /// (`%ai`), newest first.
    pub fn author_dates(&self) -> Result<Vec<String>> {
        if !self.has_head()? {
            return Err(Error::NoCommits);
        }
        let mut cmd = self.git();
        cmd.arg("log").arg("--format=%ai");
        let out = run_output(cmd)?;
        Ok(out.lines().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{Git, build_msg_filter_command, parse_porcelain_z};
    use crate::dates::parse_commit_datetime;
    use std::ffi::OsStr;

    #[test]
    fn commit_runs_in_c_locale_with_both_dates() {
        let when = parse_commit_datetime("2024-12-31T10:15").unwrap();
        let cmd = Git::current().commit_command("msg", &when, false);
        let envs: Vec<_> = cmd.get_envs().collect();
        assert!(envs.contains(&(OsStr::new("LC_ALL"), Some(OsStr::new("C")))));
        assert!(envs.contains(&(
            OsStr::new("GIT_AUTHOR_DATE"),
            Some(OsStr::new("2024-12-31 10:15:00"))
        )));
        assert!(envs.contains(&(
            OsStr::new("GIT_COMMITTER_DATE"),
            Some(OsStr::new("2024-12-31 10:15:00"))
        )));
    }

    #[test]
    fn msg_filter_quotes_when_needed() {
        let s = build_msg_filter_command("/Users/me/My App/bin");
        assert_eq!(s, "'/Users/me/My App/bin' --msg-filter");
    }

    #[test]
    fn msg_filter_no_quotes_for_plain_path() {
        let s = build_msg_filter_command("/usr/local/bin/git-reword-all");
        assert_eq!(s, "/usr/local/bin/git-reword-all --msg-filter");
    }

    #[test]
    fn msg_filter_escapes_single_quotes() {
        let s = build_msg_filter_command("/tmp/it's/bin");
        assert_eq!(s, r"'/tmp/it'\''s/bin' --msg-filter");
    }

    #[test]
    fn porcelain_lists_modified_and_untracked() {
        let raw = " M src/lib.rs\0?? notes/todo list.md\0";
        assert_eq!(
            parse_porcelain_z(raw),
            vec!["notes/todo list.md".to_string(), "src/lib.rs".to_string()]
        );
    }

    #[test]
    fn porcelain_rename_keeps_destination() {
        let raw = "R  new name.txt\0old name.txt\0 M a.txt\0";
        assert_eq!(
            parse_porcelain_z(raw),
            vec!["a.txt".to_string(), "new name.txt".to_string()]
        );
    }

    #[test]
    fn porcelain_drops_ignored_and_duplicates() {
        let raw = "!! target/\0 M b.txt\0MM b.txt\0 D gone.txt\0";
        assert_eq!(
            parse_porcelain_z(raw),
            vec!["b.txt".to_string(), "gone.txt".to_string()]
        );
    }

    #[test]
    fn porcelain_empty_output() {
        assert!(parse_porcelain_z("").is_empty());
    }
}
