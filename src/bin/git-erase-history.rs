/// Entry point for the `git-erase-history` binary.
fn main() {
    match git_history_kit::cli::erase::entry() {
        Ok(code) => std::process::exit(code),
        Err(_) => std::process::exit(1),
    }
}
