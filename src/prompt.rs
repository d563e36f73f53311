use std::io;

use chrono::NaiveDate;
use console::style;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

use crate::dates::parse_day;
use crate::error::{Error, Result};
use crate::msg_filter::MessageMap;

/// Abstraction over a string input prompt.
///
/// Implementors define how string input is collected from the user,
/// including any styling or interactivity. This trait enables testability
/// by decoupling user input from the logic that consumes it.
pub trait StringPrompter {
    /// Prompt the user for a string input.
    ///
    /// # Parameters
    /// - `prompt`: The message shown to the user.
    /// - `default`: Value used when the user presses Enter; an empty default
    ///   means empty input is accepted as-is.
    fn prompt(&mut self, prompt: &str, default: &str) -> Result<String>;
}

/// Abstraction over a boolean (yes/no) confirmation prompt.
pub trait ConfirmPrompter {
    /// Prompt the user for a yes/no confirmation.
    ///
    /// Returns `Ok(true)` if confirmed, `Ok(false)` if declined.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

fn prompt_error(e: dialoguer::Error) -> Error {
    match e {
        dialoguer::Error::IO(io) if io.kind() == io::ErrorKind::Interrupted => Error::Interrupted,
        other => Error::Prompt(other.to_string()),
    }
}

/// Default implementation of `StringPrompter` using `dialoguer::Input`.
pub struct DialoguerStringPrompter;

impl StringPrompter for DialoguerStringPrompter {
    fn prompt(&mut self, prompt: &str, default: &str) -> Result<String> {
        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(prompt_error)
    }
}

/// Default implementation of `ConfirmPrompter` using `dialoguer::Confirm`.
pub struct DialoguerConfirmPrompter;

impl ConfirmPrompter for DialoguerConfirmPrompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let theme = ColorfulTheme::default();
        Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }
}

/// A commit together with its current message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEntry {
    pub id: String,
    pub message: String,
}

/// A replacement message chosen for one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRewrite {
    pub commit: String,
    pub message: String,
}

/// Walks `commits` in order, showing each current message and asking for a
/// replacement.
///
/// Empty (or whitespace-only) answers keep the commit unchanged and are left
/// out of the result; other answers are trimmed.
pub fn collect_messages<P: StringPrompter>(
    prompter: &mut P,
    commits: &[CommitEntry],
) -> Result<Vec<MessageRewrite>> {
    let mut rewrites = Vec::new();
    for (i, entry) in commits.iter().enumerate() {
        println!("{}", style("=".repeat(60)).dim());
        println!(
            "{} {}",
            style(format!("[{}/{}]", i + 1, commits.len())).cyan(),
            style(&entry.id).yellow()
        );
        println!("{}\n{}", style("Current message:").bold(), entry.message);

        let answer = prompter.prompt("New message (Enter to keep)", "")?;
        let answer = answer.trim();
        if !answer.is_empty() {
            rewrites.push(MessageRewrite {
                commit: entry.id.clone(),
                message: answer.to_string(),
            });
        }
    }
    Ok(rewrites)
}

/// Collapses rewrites into the map handed to the message filter.
pub fn to_message_map(rewrites: &[MessageRewrite]) -> MessageMap {
    rewrites
        .iter()
        .map(|r| (r.commit.clone(), r.message.clone()))
        .collect()
}

/// Asks for a `YYYY-MM-DD` date.
pub fn ask_date<P: StringPrompter>(prompter: &mut P, label: &str) -> Result<NaiveDate> {
    let raw = prompter.prompt(&format!("{label} (YYYY-MM-DD)"), "")?;
    parse_day(&raw)
}

/// Ask before rewriting `count` commit messages. Defaults to no.
pub fn confirm_rewrite<P: ConfirmPrompter>(prompter: &mut P, count: usize) -> Result<bool> {
    let noun = if count == 1 { "commit" } else { "commits" };
    let prompt = format!("Rewrite history for {count} {noun}? This will require a force-push");
    prompter.confirm(&prompt, false)
}

/// Ask before force-pushing the rewritten branch. Defaults to no.
pub fn confirm_push<P: ConfirmPrompter>(prompter: &mut P, remote: &str, branch: &str) -> Result<bool> {
    let prompt = format!("Force-push {branch} to {remote} (--force-with-lease)?");
    prompter.confirm(&prompt, false)
}

/// Ask before deleting all history of the repository at `dir`. Defaults to no.
pub fn confirm_erase<P: ConfirmPrompter>(prompter: &mut P, dir: &str) -> Result<bool> {
    let prompt = format!("Delete ALL history of {dir}? This cannot be undone");
    prompter.confirm(&prompt, false)
}

/// Ask before executing a commit plan. Defaults to no.
pub fn confirm_plan<P: ConfirmPrompter>(prompter: &mut P, commits: usize) -> Result<bool> {
    let prompt = format!("Create {commits} commits as planned?");
    prompter.confirm(&prompt, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedPrompter {
        answers: VecDeque<Result<String>>,
        prompts: Vec<String>,
    }

    impl ScriptedPrompter {
        fn new(answers: &[&str]) -> Self {
            ScriptedPrompter {
                answers: answers.iter().map(|a| Ok(a.to_string())).collect(),
                prompts: Vec::new(),
            }
        }
    }

    impl StringPrompter for ScriptedPrompter {
        fn prompt(&mut self, prompt: &str, default: &str) -> Result<String> {
            assert_eq!(default, "");
            self.prompts.push(prompt.to_string());
            self.answers
                .pop_front()
                .unwrap_or_else(|| Err(Error::Prompt("no more answers".to_string())))
        }
    }

    struct MockConfirmPrompter {
        response: bool,
        expected_prompt: String,
    }

    impl ConfirmPrompter for MockConfirmPrompter {
        fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
            assert_eq!(prompt, self.expected_prompt);
            assert!(!default);
            Ok(self.response)
        }
    }

    fn commits(n: usize) -> Vec<CommitEntry> {
        (0..n)
            .map(|i| CommitEntry {
                id: format!("c{i}"),
                message: format!("message {i}"),
            })
            .collect()
    }

    #[test]
    fn empty_answers_keep_messages() {
        let mut p = ScriptedPrompter::new(&["", "  ", ""]);
        let rewrites = collect_messages(&mut p, &commits(3)).unwrap();
        assert!(rewrites.is_empty());
        assert_eq!(p.prompts.len(), 3);
    }

    #[test]
    fn non_empty_answers_are_trimmed_and_kept_in_order() {
        let mut p = ScriptedPrompter::new(&["  first ", "", "third"]);
        let rewrites = collect_messages(&mut p, &commits(3)).unwrap();
        assert_eq!(
            rewrites,
            vec![
                MessageRewrite {
                    commit: "c0".to_string(),
                    message: "first".to_string()
                },
                MessageRewrite {
                    commit: "c2".to_string(),
                    message: "third".to_string()
                },
            ]
        );
        let map = to_message_map(&rewrites);
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("c1"));
    }

    #[test]
    fn prompt_failure_propagates() {
        let mut p = ScriptedPrompter::new(&["x"]);
        let res = collect_messages(&mut p, &commits(2));
        assert!(res.is_err());
    }

    #[test]
    fn ask_date_parses_answer() {
        let mut p = ScriptedPrompter::new(&["2024-03-01"]);
        let d = ask_date(&mut p, "Start date").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(p.prompts[0], "Start date (YYYY-MM-DD)");
    }

    #[test]
    fn ask_date_rejects_bad_answer() {
        let mut p = ScriptedPrompter::new(&["tomorrow"]);
        assert!(matches!(
            ask_date(&mut p, "End date"),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[test]
    fn confirm_rewrite_wording() {
        let mut p = MockConfirmPrompter {
            response: true,
            expected_prompt: "Rewrite history for 1 commit? This will require a force-push"
                .to_string(),
        };
        assert!(confirm_rewrite(&mut p, 1).unwrap());
    }

    #[test]
    fn confirm_push_declined() {
        let mut p = MockConfirmPrompter {
            response: false,
            expected_prompt: "Force-push main to origin (--force-with-lease)?".to_string(),
        };
        assert!(!confirm_push(&mut p, "origin", "main").unwrap());
    }

    #[test]
    fn confirm_plan_wording() {
        let mut p = MockConfirmPrompter {
            response: true,
            expected_prompt: "Create 3 commits as planned?".to_string(),
        };
        assert!(confirm_plan(&mut p, 3).unwrap());
    }
}
