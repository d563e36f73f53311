/// Entry point for the `git-reword-all` binary.
///
/// Also serves as the message filter `git filter-branch` calls back into.
/// Exits with the code returned by the CLI, or with status 1 on error.
fn main() {
    match git_history_kit::cli::reword_all::entry() {
        Ok(code) => std::process::exit(code),
        Err(_) => std::process::exit(1),
    }
}
