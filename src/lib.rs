//! # git-history-kit
//!
//! Small command-line tools for shaping the history of a Git repository.
//!
//! Binaries:
//! - `git-reword-commit` - replace the message of one commit
//! - `git-reword-all` - walk every commit and reword the ones you choose
//! - `git-erase-history` - drop all history, keep the working tree
//! - `git-commit-dated` - commit with explicit author and committer dates
//! - `git-commit-spread` - commit each uncommitted file on its own day
//! - `git-synth-history` - fill a year with plausible synthetic commits
//! - `git-commit-stats` - per-day commit counts as JSON and an HTML page
//!
//! ## Usage
//!
//! ```bash
//! git-reword-commit a1b2c3d "fix: correct typo in README"
//! git-commit-dated 2024-12-31T10:15 -m "year end" --all
//! git-commit-spread --start 2024-01-01 --end 2024-01-31
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - One entry point per binary
//! - [`git`] - Git command wrappers
//! - [`msg_filter`] - Message filter run by `git filter-branch`
//! - [`prompt`] - User input abstractions
//! - [`dates`] - Date parsing and ranges
//! - [`plan`] - Spreading files over dates
//! - [`synth`] - Synthetic history generator
//! - [`templates`] - File contents for synthetic commits
//! - [`stats`] - Commit statistics and HTML embedding
//! - [`banner`] - Decorative CLI banner

pub mod banner;
pub mod cli;
pub mod dates;
pub mod error;
pub mod git;
pub mod interrupt;
pub mod logging;
pub mod msg_filter;
pub mod plan;
pub mod prompt;
pub mod stats;
pub mod synth;
pub mod templates;

pub use error::{Error, Result};
