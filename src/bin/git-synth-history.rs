/// Entry point for the `git-synth-history` binary.
fn main() {
    match git_history_kit::cli::synth::entry() {
        Ok(code) => std::process::exit(code),
        Err(_) => std::process::exit(1),
    }
}
