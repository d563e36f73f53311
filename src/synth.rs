//! Synthetic commit history.
//!
//! [`Generator`] walks every day of a [`SynthConfig`] range, decides whether
//! the day is skipped, and otherwise makes a random number of commits at
//! random times, each touching one managed file. File system and `git`
//! effects go through a [`CommitSink`], so the schedule can be driven by a
//! recording sink in tests.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, IsoWeek, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{info, instrument, warn};

use crate::error::{Error, Result};
use crate::git::{CommitOutcome, Git};
use crate::templates::{
    COMMIT_MESSAGES, DESCRIPTIONS, DIRECTORIES, FileKind, SEED_FILES, STEMS, derive_name, render,
};

/// Tunables of the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub weekday_commits: (u32, u32),
    pub weekend_commits: (u32, u32),
    pub weekend_skip_chance: f64,
    pub weekday_skips_per_week: (usize, usize),
    pub weekday_hours: (u32, u32),
    pub weekend_hours: (u32, u32),
    /// Probability of touching an existing file instead of creating one.
    pub mutate_chance: f64,
    /// Progress is reported every this many processed days.
    pub progress_every: i64,
}

impl SynthConfig {
    /// 1 January to 31 December of `year`, with the stock commit rates.
    pub fn for_year(year: i32) -> Result<Self> {
        let invalid = || Error::InvalidDate {
            raw: year.to_string(),
            expected: "a calendar year",
        };
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;
        Ok(SynthConfig {
            start,
            end,
            weekday_commits: (1, 3),
            weekend_commits: (3, 5),
            weekend_skip_chance: 0.15,
            weekday_skips_per_week: (1, 2),
            weekday_hours: (9, 20),
            weekend_hours: (8, 23),
            mutate_chance: 0.7,
            progress_every: 30,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Weekday,
    Weekend,
}

impl DayKind {
    pub fn of(date: NaiveDate) -> DayKind {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayKind::Weekend,
            _ => DayKind::Weekday,
        }
    }
}

/// What happens on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayPlan {
    Skip,
    /// Commit timestamps, in chronological order.
    Commits(Vec<NaiveDateTime>),
}

/// A file the generator owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedFile {
    pub path: String,
    pub kind: FileKind,
}

/// Files the generator has created so far.
#[derive(Debug, Clone, Default)]
pub struct FileRegistry {
    files: Vec<ManagedFile>,
}

impl FileRegistry {
    pub fn files(&self) -> &[ManagedFile] {
        &self.files
    }

    pub fn register(&mut self, file: ManagedFile) {
        self.files.push(file);
    }

    /// Picks the file for the next commit.
    ///
    /// With probability `mutate_chance` an existing file is returned;
    /// otherwise a new path `<dir>/<stem><n><ext>` is registered, where `n` is
    /// one more than the number of managed files already under `<dir>`.
    pub fn pick<R: Rng>(&mut self, rng: &mut R, mutate_chance: f64) -> ManagedFile {
        if !self.files.is_empty() && rng.gen_bool(mutate_chance) {
            return choose(rng, &self.files).clone();
        }

        let dir = *choose(rng, &DIRECTORIES);
        let kind = *choose(rng, &FileKind::ALL);
        let prefix = format!("{dir}/");
        let n = self
            .files
            .iter()
            .filter(|f| f.path.starts_with(&prefix))
            .count()
            + 1;
        let stem = *choose(rng, &STEMS);

        let file = ManagedFile {
            path: format!("{dir}/{stem}{n}{}", kind.extension()),
            kind,
        };
        self.files.push(file.clone());
        file
    }
}

fn choose<'a, R: Rng, T>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

/// Chooses which weekdays of the week starting on `monday` are skipped.
pub fn weekday_skips<R: Rng>(rng: &mut R, monday: NaiveDate, per_week: (usize, usize)) -> Vec<NaiveDate> {
    let weekdays: Vec<NaiveDate> = (0..5).map(|i| monday + Duration::days(i)).collect();
    let n = rng.gen_range(per_week.0..=per_week.1).min(weekdays.len());
    weekdays.choose_multiple(rng, n).copied().collect()
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Receives the generator's file and commit effects.
pub trait CommitSink {
    /// Appends `update_line` to `file` when it exists, otherwise creates it
    /// with `fresh_content`.
    fn touch(&mut self, file: &ManagedFile, fresh_content: &str, update_line: &str) -> Result<()>;

    /// Stages everything and commits it at `when`.
    fn commit(&mut self, when: &NaiveDateTime, message: &str) -> Result<CommitOutcome>;
}

/// [`CommitSink`] writing into a real work tree and committing with `git`.
pub struct GitSink {
    git: Git,
    root: PathBuf,
}

impl GitSink {
    pub fn new(git: Git, root: impl Into<PathBuf>) -> Self {
        GitSink {
            git,
            root: root.into(),
        }
    }
}

impl CommitSink for GitSink {
    fn touch(&mut self, file: &ManagedFile, fresh_content: &str, update_line: &str) -> Result<()> {
        let path = self.root.join(&file.path);
        if path.exists() {
            append_line(&path, update_line)
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::io(format!("cannot create {}", parent.display()), e))?;
            }
            fs::write(&path, fresh_content)
                .map_err(|e| Error::io(format!("cannot write {}", path.display()), e))
        }
    }

    fn commit(&mut self, when: &NaiveDateTime, message: &str) -> Result<CommitOutcome> {
        self.git.stage_all()?;
        self.git.commit_at(message, when, false)
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut f = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| Error::io(format!("cannot open {}", path.display()), e))?;
    writeln!(f, "\n{line}").map_err(|e| Error::io(format!("cannot write {}", path.display()), e))
}

/// Something the caller may want to show while the generator runs.
#[derive(Debug)]
pub enum Event<'a> {
    Committed {
        when: NaiveDateTime,
        message: &'a str,
    },
    NothingToCommit {
        when: NaiveDateTime,
    },
    CommitFailed {
        when: NaiveDateTime,
        error: &'a Error,
    },
    Skipped {
        date: NaiveDate,
    },
    Progress {
        days: i64,
        commits: usize,
        skipped_days: usize,
    },
}

/// Totals of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub commits: usize,
    pub skipped_days: usize,
    pub no_ops: usize,
    pub failures: usize,
}

pub struct Generator<R, S> {
    config: SynthConfig,
    rng: R,
    sink: S,
    registry: FileRegistry,
    week: Option<IsoWeek>,
    skips: Vec<NaiveDate>,
    sequence: usize,
}

impl<R: Rng, S: CommitSink> Generator<R, S> {
    pub fn new(config: SynthConfig, rng: R, sink: S) -> Self {
        Generator {
            config,
            rng,
            sink,
            registry: FileRegistry::default(),
            week: None,
            skips: Vec::new(),
            sequence: 0,
        }
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Decides the commits of `date`.
    ///
    /// Weekday skips are re-drawn whenever `date` enters a new ISO week; for a
    /// range starting mid-week they are drawn from that week's full
    /// Monday-Friday.
    pub fn plan_day(&mut self, date: NaiveDate) -> DayPlan {
        let week = date.iso_week();
        if self.week != Some(week) {
            self.week = Some(week);
            self.skips = weekday_skips(
                &mut self.rng,
                week_start(date),
                self.config.weekday_skips_per_week,
            );
        }

        let kind = DayKind::of(date);
        let skip = match kind {
            DayKind::Weekend => self.rng.gen_bool(self.config.weekend_skip_chance),
            DayKind::Weekday => self.skips.contains(&date),
        };
        if skip {
            return DayPlan::Skip;
        }

        let ((lo, hi), (first_hour, last_hour)) = match kind {
            DayKind::Weekend => (self.config.weekend_commits, self.config.weekend_hours),
            DayKind::Weekday => (self.config.weekday_commits, self.config.weekday_hours),
        };
        let count = self.rng.gen_range(lo..=hi);

        let midnight = date.and_time(NaiveTime::MIN);
        let mut times: Vec<NaiveDateTime> = (0..count)
            .map(|_| {
                let h = i64::from(self.rng.gen_range(first_hour..=last_hour));
                let m = self.rng.gen_range(0..60i64);
                let s = self.rng.gen_range(0..60i64);
                midnight + Duration::seconds(h * 3600 + m * 60 + s)
            })
            .collect();
        times.sort();
        DayPlan::Commits(times)
    }

    /// Writes the seed files and makes the initial commit at the start of the
    /// range.
    #[instrument(skip_all)]
    pub fn seed(&mut self) -> Result<CommitOutcome> {
        let when = self.config.start.and_time(NaiveTime::MIN);
        for (path, kind) in SEED_FILES {
            let file = ManagedFile {
                path: path.to_string(),
                kind,
            };
            self.touch(&file, &when)?;
            self.registry.register(file);
        }
        self.sink.commit(&when, "Initial commit")
    }

    fn touch(&mut self, file: &ManagedFile, when: &NaiveDateTime) -> Result<()> {
        self.sequence += 1;
        let template = *choose(&mut self.rng, file.kind.templates());
        let desc = *choose(&mut self.rng, &DESCRIPTIONS);
        let content = render(template, &derive_name(&file.path), desc);
        let update = format!(
            "# Updated: {} ({})",
            when.format("%Y-%m-%dT%H:%M:%S"),
            self.sequence
        );
        self.sink.touch(file, &content, &update)
    }

    /// Runs the whole range after [`Generator::seed`].
    ///
    /// File system errors abort the run; failed or empty commits are reported
    /// through `on_event` and the run continues.
    #[instrument(skip_all, fields(start = %self.config.start, end = %self.config.end))]
    pub fn run(&mut self, on_event: &mut dyn FnMut(Event<'_>)) -> Result<Summary> {
        let mut summary = Summary::default();
        let start = self.config.start;
        let end = self.config.end;

        for date in start.iter_days().take_while(|d| *d <= end) {
            match self.plan_day(date) {
                DayPlan::Skip => {
                    summary.skipped_days += 1;
                    on_event(Event::Skipped { date });
                }
                DayPlan::Commits(times) => {
                    for when in times {
                        let file = self.registry.pick(&mut self.rng, self.config.mutate_chance);
                        self.touch(&file, &when)?;
                        let message = *choose(&mut self.rng, &COMMIT_MESSAGES);

                        match self.sink.commit(&when, message) {
                            Ok(CommitOutcome::Created) => {
                                summary.commits += 1;
                                on_event(Event::Committed { when, message });
                            }
                            Ok(CommitOutcome::NothingToCommit) => {
                                summary.no_ops += 1;
                                warn!(%when, "nothing to commit");
                                on_event(Event::NothingToCommit { when });
                            }
                            Err(error) => {
                                summary.failures += 1;
                                warn!(%when, %error, "commit failed");
                                on_event(Event::CommitFailed {
                                    when,
                                    error: &error,
                                });
                            }
                        }
                    }
                }
            }

            let days = (date - start).num_days() + 1;
            if self.config.progress_every > 0 && days % self.config.progress_every == 0 {
                info!(days, commits = summary.commits, "progress");
                on_event(Event::Progress {
                    days,
                    commits: summary.commits,
                    skipped_days: summary.skipped_days,
                });
            }
        }

        Ok(summary)
    }
}
