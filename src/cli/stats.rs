use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use console::style;
use tracing::warn;

use super::{report, setup, verify_environment};
use crate::error::{Error, Result};
use crate::stats::{BUILTIN_TEMPLATE, DailyStats, aggregate, embed, to_json};

pub const JSON_FILE: &str = "stats.json";
pub const HTML_FILE: &str = "stats.html";

/// Count commits per day and write stats.json plus a self-contained stats.html.
#[derive(Parser, Debug)]
#[command(name = "git-commit-stats", version, about, long_about = None)]
pub struct Args {
    /// Repository to read (defaults to the current directory)
    #[arg(short = 'C', long)]
    pub repo: Option<PathBuf>,

    /// Directory the report files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// HTML template containing the stats loader markers
    #[arg(long)]
    pub template: Option<PathBuf>,
}

/// Where the files of one report went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub json: PathBuf,
    /// `None` when the template had no loader block.
    pub html: Option<PathBuf>,
    /// Template the page was built from.
    pub template: PathBuf,
}

fn read_template(explicit: Option<&Path>, output_dir: &Path) -> Result<(String, PathBuf)> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => output_dir.join(HTML_FILE),
    };
    if explicit.is_none() && !path.exists() {
        return Ok((BUILTIN_TEMPLATE.to_string(), path));
    }
    match fs::read_to_string(&path) {
        Ok(s) => Ok((s, path)),
        Err(e) => Err(Error::io(format!("cannot read {}", path.display()), e)),
    }
}

/// Writes `stats.json` and, when the template allows it, `stats.html` with
/// the data embedded.
pub fn write_report(stats: &DailyStats, output_dir: &Path, template: Option<&Path>) -> Result<Report> {
    fs::create_dir_all(output_dir)
        .map_err(|e| Error::io(format!("cannot create {}", output_dir.display()), e))?;

    let json_path = output_dir.join(JSON_FILE);
    fs::write(&json_path, to_json(stats)?)
        .map_err(|e| Error::io(format!("cannot write {}", json_path.display()), e))?;

    let (page, template_path) = read_template(template, output_dir)?;
    let html = match embed(&page, stats)? {
        Some(html) => html,
        None => {
            warn!(template = %template_path.display(), "no loader markers");
            return Ok(Report {
                json: json_path,
                html: None,
                template: template_path,
            });
        }
    };

    let html_path = output_dir.join(HTML_FILE);
    fs::write(&html_path, html)
        .map_err(|e| Error::io(format!("cannot write {}", html_path.display()), e))?;

    Ok(Report {
        json: json_path,
        html: Some(html_path),
        template: template_path,
    })
}

/// Main entry point for `git-commit-stats`.
pub fn entry() -> std::result::Result<i32, ()> {
    setup();
    let args = Args::parse();

    let (git, _root) = verify_environment(args.repo.as_deref())?;
    let lines = git.author_dates().map_err(report)?;
    let stats = aggregate(&lines).map_err(report)?;
    let written = write_report(&stats, &args.output_dir, args.template.as_deref()).map_err(report)?;

    match &written.html {
        Some(html) => println!(
            "{}",
            style(format!("✓ Statistics embedded in {}", html.display())).green()
        ),
        None => {
            let missing = Error::MissingTemplateMarkers(written.template.clone());
            eprintln!("{}", style(format!("Warning: {missing}")).yellow());
            println!(
                "{}",
                style(format!(
                    "⚠ Could not update the HTML page, but {} was written",
                    written.json.display()
                ))
                .yellow()
            );
        }
    }
    println!("  Total commits: {}", stats.total_commits);
    println!("  Days with commits: {}", stats.days_with_commits);
    println!("  Most commits in a day: {}", stats.max_commits);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> DailyStats {
        aggregate(&["2025-02-01 10:00:00 +0000", "2025-02-03 11:00:00 +0000"]).unwrap()
    }

    #[test]
    fn writes_both_files_from_builtin_template() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_report(&stats(), dir.path(), None).unwrap();

        let json: DailyStats =
            serde_json::from_str(&fs::read_to_string(&written.json).unwrap()).unwrap();
        assert_eq!(json.total_days, 3);

        let html = fs::read_to_string(written.html.unwrap()).unwrap();
        assert!(html.contains("\"total_commits\":2"));
    }

    #[test]
    fn existing_page_is_refreshed_in_place() {
        let dir = tempfile::tempdir().unwrap();
        write_report(&stats(), dir.path(), None).unwrap();

        let more = aggregate(&["2025-03-01 10:00:00 +0000"]).unwrap();
        let written = write_report(&more, dir.path(), None).unwrap();
        let html = fs::read_to_string(written.html.unwrap()).unwrap();
        assert!(html.contains("2025-03-01"));
        assert!(!html.contains("2025-02-03"));
    }

    #[test]
    fn template_without_markers_still_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("plain.html");
        fs::write(&template, "<html><body>no loader</body></html>").unwrap();

        let written = write_report(&stats(), dir.path(), Some(&template)).unwrap();
        assert!(written.json.exists());
        assert!(written.html.is_none());
        assert_eq!(written.template, template);
        assert!(!dir.path().join(HTML_FILE).exists());
    }

    #[test]
    fn missing_explicit_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.html");
        assert!(write_report(&stats(), dir.path(), Some(&missing)).is_err());
    }
}
