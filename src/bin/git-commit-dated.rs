/// Entry point for the `git-commit-dated` binary.
fn main() {
    match git_history_kit::cli::commit_dated::entry() {
        Ok(code) => std::process::exit(code),
        Err(_) => std::process::exit(1),
    }
}
