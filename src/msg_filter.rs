use std::collections::BTreeMap;
use std::io::{Read, Write};

use crate::error::{Error, Result};

/// Environment variable carrying the JSON-encoded [`MessageMap`] from the
/// rewriting process to the filter processes `git filter-branch` spawns.
pub const MESSAGE_MAP_ENV: &str = "GIT_HISTORY_KIT_MESSAGE_MAP";

/// Environment variable `git filter-branch` sets to the commit being rewritten.
pub const COMMIT_ENV: &str = "GIT_COMMIT";

/// Full commit id → replacement message.
pub type MessageMap = BTreeMap<String, String>;

/// Entry point when a binary is started as `<exe> --msg-filter`.
///
/// Reads the commit id and mapping from the environment, the original message
/// from stdin, and writes the resulting message to stdout.
pub fn run() -> Result<()> {
    let commit = std::env::var(COMMIT_ENV).ok();
    let map = std::env::var(MESSAGE_MAP_ENV).ok();
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_with(commit.as_deref(), map.as_deref(), stdin.lock(), stdout.lock())
}

/// [`run`] with its inputs made explicit.
pub fn run_with<R: Read, W: Write>(
    commit: Option<&str>,
    map_json: Option<&str>,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let commit = match commit {
        Some(c) => c,
        None => return Err(Error::MissingEnv(COMMIT_ENV)),
    };
    let map: MessageMap = match map_json {
        Some(json) => serde_json::from_str(json)?,
        None => return Err(Error::MissingEnv(MESSAGE_MAP_ENV)),
    };

    let mut original = Vec::new();
    if let Err(e) = input.read_to_end(&mut original) {
        return Err(Error::io("read failed", e));
    }

    let message = filter_message(commit, &original, &map);
    match output.write_all(&message).and_then(|_| output.flush()) {
        Ok(_) => Ok(()),
        Err(e) => Err(Error::io("write failed", e)),
    }
}

/// Returns the replacement for `commit`, or `original` byte-for-byte when the
/// commit is not mapped. Replacements always end with exactly one newline.
pub fn filter_message(commit: &str, original: &[u8], map: &MessageMap) -> Vec<u8> {
    match map.get(commit) {
        Some(replacement) => {
            let mut msg = replacement.trim_end_matches('\n').to_string();
            msg.push('\n');
            msg.into_bytes()
        }
        None => original.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> MessageMap {
        let mut m = MessageMap::new();
        m.insert("aaa".to_string(), "new subject".to_string());
        m
    }

    #[test]
    fn unmapped_commit_passes_through_unchanged() {
        let original = b"keep me\n\nbody line\r\n\xff";
        let out = filter_message("bbb", original, &map());
        assert_eq!(out, original.to_vec());
    }

    #[test]
    fn mapped_commit_gets_replacement() {
        let out = filter_message("aaa", b"old\n", &map());
        assert_eq!(out, b"new subject\n".to_vec());
    }

    #[test]
    fn replacement_newlines_are_normalized() {
        let mut m = MessageMap::new();
        m.insert("c".to_string(), "multi\n\nline\n\n".to_string());
        assert_eq!(filter_message("c", b"", &m), b"multi\n\nline\n".to_vec());
    }

    #[test]
    fn run_with_reads_map_from_json() {
        let json = serde_json::to_string(&map()).unwrap();
        let mut out = Vec::new();
        run_with(Some("aaa"), Some(&json), &b"old message\n"[..], &mut out).unwrap();
        assert_eq!(out, b"new subject\n".to_vec());
    }

    #[test]
    fn run_with_missing_commit_is_error() {
        let mut out = Vec::new();
        let res = run_with(None, Some("{}"), &b""[..], &mut out);
        assert!(res.is_err());
    }

    #[test]
    fn run_with_bad_json_is_error() {
        let mut out = Vec::new();
        let res = run_with(Some("aaa"), Some("not json"), &b""[..], &mut out);
        assert!(matches!(res, Err(Error::Json(_))));
    }
}
