/// Entry point for the `git-commit-spread` binary.
fn main() {
    match git_history_kit::cli::spread::entry() {
        Ok(code) => std::process::exit(code),
        Err(_) => std::process::exit(1),
    }
}
