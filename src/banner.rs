use console::{measure_text_width, style};
use std::iter;

/// Prints `lines` inside a colorized box.
///
/// The box is sized to the widest **visible** line, using
/// [`console::measure_text_width`] so ANSI codes embedded in the lines do not
/// throw the padding off. Borders are styled independently from the content.
///
/// # Examples
///
/// ```no_run
/// use git_history_kit::banner::{erase_lines, print_banner};
///
/// print_banner(&erase_lines("/tmp/repo"));
/// ```
pub fn print_banner(lines: &[String]) {
    let max_width = lines
        .iter()
        .map(|l| measure_text_width(l))
        .max()
        .unwrap_or(0)
        + 2;

    let border = "═".repeat(max_width);
    let top = style(format!("╔{}╗", border)).blue().bold();
    let bottom = style(format!("╚{}╝", border)).blue().bold();
    let left = style("║ ").blue().bold().to_string();
    let right = style("║").blue().bold().to_string();

    println!();
    println!("{top}");
    for line in lines {
        let visible = measure_text_width(line);
        let pad = max_width - visible;
        println!("{}{}{}{}", left, line, " ".repeat(pad - 1), right);
    }
    println!("{bottom}");
    println!();
}

/// Banner shown before a message rewrite.
pub fn rewrite_lines(branch: &str, commits: usize) -> Vec<String> {
    let noun = if commits == 1 { "commit" } else { "commits" };
    [
        String::from("Rewrite commit messages via git filter-branch"),
        String::new(),
        format!("Branch: {branch}"),
        format!("Messages to replace: {commits} {noun}"),
        String::new(),
    ]
    .into_iter()
    .chain(iter::once(
        style("Every descendant commit gets a new id.")
            .yellow()
            .bold()
            .to_string(),
    ))
    .chain(iter::once(
        style("A published branch will need a force-push afterwards.")
            .yellow()
            .to_string(),
    ))
    .collect()
}

/// Banner shown before erasing a repository's history.
pub fn erase_lines(dir: &str) -> Vec<String> {
    vec![
        style("WARNING: this deletes the entire commit history")
            .red()
            .bold()
            .to_string(),
        String::new(),
        format!("Directory: {dir}"),
        String::from("All commits, branches, tags and the reflog are removed."),
        String::from("Files in the working tree are kept as they are."),
        style("There is no undo without an external backup.")
            .red()
            .to_string(),
    ]
}

/// Banner shown before generating synthetic history.
pub fn synth_lines(
    start: &str,
    end: &str,
    weekday: (u32, u32),
    weekend: (u32, u32),
    days_off: (usize, usize),
) -> Vec<String> {
    vec![
        String::from("Generate synthetic commit history"),
        String::new(),
        format!("Period: {start} .. {end}"),
        format!(
            "Weekdays: {}-{} commits, {}-{} days off per week",
            weekday.0, weekday.1, days_off.0, days_off.1
        ),
        format!("Weekends: {}-{} commits, sometimes skipped", weekend.0, weekend.1),
    ]
}

#[cfg(test)]
mod tests {
    use super::{erase_lines, rewrite_lines, synth_lines};

    #[test]
    fn rewrite_banner_mentions_branch_and_count() {
        let s = rewrite_lines("main", 3).join("\n");
        assert!(s.contains("Rewrite commit messages via git filter-branch"));
        assert!(s.contains("Branch: main"));
        assert!(s.contains("Messages to replace: 3 commits"));
        assert!(s.contains("force-push"));
    }

    #[test]
    fn rewrite_banner_singular() {
        let s = rewrite_lines("dev", 1).join("\n");
        assert!(s.contains("Messages to replace: 1 commit"));
        assert!(!s.contains("1 commits"));
    }

    #[test]
    fn erase_banner_names_directory() {
        let lines = erase_lines("/work/repo");
        let s = lines.join("\n");
        assert!(s.contains("Directory: /work/repo"));
        assert!(s.contains("no undo"));
    }

    #[test]
    fn synth_banner_shows_ranges() {
        let s = synth_lines("2025-01-01", "2025-12-31", (1, 3), (3, 5), (0, 1)).join("\n");
        assert!(s.contains("Period: 2025-01-01 .. 2025-12-31"));
        assert!(s.contains("Weekdays: 1-3 commits, 0-1 days off per week"));
        assert!(s.contains("Weekends: 3-5 commits"));
    }
}
