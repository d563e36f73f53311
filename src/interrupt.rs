//! Clean exit on Ctrl-C.

use tracing::warn;

/// Exit status used after an interrupt (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Makes Ctrl-C print a short message and exit with
/// [`INTERRUPTED_EXIT_CODE`]. Commits already made stay in place; a `git`
/// child receives the same signal and stops on its own.
///
/// Only the first call installs a handler; later calls are logged and
/// otherwise ignored.
pub fn install() {
    let result = ctrlc::set_handler(|| {
        eprintln!("\nInterrupted by user.");
        std::process::exit(INTERRUPTED_EXIT_CODE);
    });
    if let Err(e) = result {
        warn!(error = %e, "cannot install Ctrl-C handler");
    }
}
