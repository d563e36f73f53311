/// Entry point for the `git-commit-stats` binary.
fn main() {
    match git_history_kit::cli::stats::entry() {
        Ok(code) => std::process::exit(code),
        Err(_) => std::process::exit(1),
    }
}
