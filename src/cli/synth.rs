use std::path::PathBuf;

use clap::Parser;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{report, setup, verify_environment};
use crate::banner::{print_banner, synth_lines};
use crate::git::CommitOutcome;
use crate::synth::{Event, Generator, GitSink, SynthConfig};

/// Fill a year with synthetic commits: fewer on weekdays, more on weekends,
/// with some days left empty.
#[derive(Parser, Debug)]
#[command(name = "git-synth-history", version, about, long_about = None)]
pub struct Args {
    /// Repository to generate commits in (defaults to the current directory)
    #[arg(short = 'C', long)]
    pub repo: Option<PathBuf>,

    /// Calendar year to cover
    #[arg(long, default_value_t = 2025)]
    pub year: i32,

    /// Seed for the random schedule, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

fn print_event(event: Event<'_>) {
    match event {
        Event::Committed { when, message } => {
            println!(
                "{} {}: {}",
                style("✓").green(),
                when.format("%Y-%m-%d %H:%M"),
                message
            );
        }
        Event::NothingToCommit { when } => {
            eprintln!(
                "{}",
                style(format!("Warning: nothing to commit at {when}")).yellow()
            );
        }
        Event::CommitFailed { when, error } => {
            eprintln!(
                "{}",
                style(format!("Warning: commit at {when} failed: {error}")).yellow()
            );
        }
        Event::Skipped { date } => {
            println!(
                "{} {} ({}): skipped",
                style("⊘").dim(),
                date,
                date.format("%a")
            );
        }
        Event::Progress {
            days,
            commits,
            skipped_days,
        } => {
            println!(
                "\n{}\n",
                style(format!(
                    "Progress: {days} days processed, {commits} commits created, {skipped_days} days skipped"
                ))
                .cyan()
            );
        }
    }
}

/// Main entry point for `git-synth-history`.
pub fn entry() -> Result<i32, ()> {
    setup();
    let args = Args::parse();

    let (git, root) = verify_environment(args.repo.as_deref())?;
    let config = SynthConfig::for_year(args.year).map_err(report)?;

    print_banner(&synth_lines(
        &config.start.to_string(),
        &config.end.to_string(),
        config.weekday_commits,
        config.weekend_commits,
        config.weekday_skips_per_week,
    ));

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let start = config.start;
    let end = config.end;
    let mut generator = Generator::new(config, rng, GitSink::new(git, root));

    println!("{}", style("Creating seed files...").cyan());
    let initial = match generator.seed().map_err(report)? {
        CommitOutcome::Created => {
            println!("{} {}: Initial commit", style("✓").green(), start);
            1
        }
        CommitOutcome::NothingToCommit => {
            eprintln!(
                "{}",
                style("Warning: seed files were already committed").yellow()
            );
            0
        }
    };

    println!("{}", style("-".repeat(60)).dim());
    let summary = generator.run(&mut print_event).map_err(report)?;
    println!("{}", style("-".repeat(60)).dim());

    println!(
        "{}",
        style(format!(
            "✅ Done! Created {} commits.",
            summary.commits + initial
        ))
        .green()
        .bold()
    );
    println!("Skipped days: {}", summary.skipped_days);
    if summary.no_ops + summary.failures > 0 {
        println!(
            "Commits not made: {} (nothing to commit: {}, failed: {})",
            summary.no_ops + summary.failures,
            summary.no_ops,
            summary.failures
        );
    }
    println!("Period: {start} - {end}");
    Ok(0)
}
