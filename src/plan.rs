use chrono::NaiveDate;

use crate::error::{Error, Result};

/// One file to be committed on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub path: String,
    pub date: NaiveDate,
}

/// Assigns `files` to `dates`.
///
/// With at least as many dates as files, the first `files.len()` dates get one
/// file each, in order. Otherwise every date gets `files / dates` files and the
/// first `files % dates` dates get one more, so per-date counts never differ by
/// more than one.
///
/// Entries are returned in chronological order; files keep their given order.
pub fn build_plan<S: AsRef<str>>(files: &[S], dates: &[NaiveDate]) -> Result<Vec<PlanEntry>> {
    if dates.is_empty() {
        return Err(Error::InvalidRange {
            start: String::from("(empty)"),
            end: String::from("(empty)"),
        });
    }

    if dates.len() >= files.len() {
        return Ok(files
            .iter()
            .zip(dates)
            .map(|(f, d)| PlanEntry {
                path: f.as_ref().to_string(),
                date: *d,
            })
            .collect());
    }

    let base = files.len() / dates.len();
    let extra = files.len() % dates.len();

    let mut plan = Vec::with_capacity(files.len());
    let mut remaining = files.iter();
    for (i, date) in dates.iter().enumerate() {
        let quota = base + usize::from(i < extra);
        for f in remaining.by_ref().take(quota) {
            plan.push(PlanEntry {
                path: f.as_ref().to_string(),
                date: *date,
            });
        }
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::date_range;
    use std::collections::BTreeMap;

    fn dates(n: i64) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = start + chrono::Duration::days(n - 1);
        date_range(start, end).unwrap()
    }

    fn files(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{i:02}.txt")).collect()
    }

    fn counts(plan: &[PlanEntry]) -> BTreeMap<NaiveDate, usize> {
        let mut m = BTreeMap::new();
        for e in plan {
            *m.entry(e.date).or_insert(0) += 1;
        }
        m
    }

    #[test]
    fn fewer_files_than_dates_uses_leading_dates() {
        let ds = dates(10);
        let plan = build_plan(&files(4), &ds).unwrap();
        assert_eq!(plan.len(), 4);
        for (i, e) in plan.iter().enumerate() {
            assert_eq!(e.date, ds[i]);
            assert_eq!(e.path, format!("f{i:02}.txt"));
        }
    }

    #[test]
    fn equal_counts_is_one_to_one() {
        let ds = dates(5);
        let plan = build_plan(&files(5), &ds).unwrap();
        let dated: Vec<_> = plan.iter().map(|e| e.date).collect();
        assert_eq!(dated, ds);
    }

    #[test]
    fn more_files_than_dates_spreads_evenly() {
        for (n, m) in [(7usize, 3i64), (10, 4), (9, 3), (100, 7), (2, 1)] {
            let ds = dates(m);
            let plan = build_plan(&files(n), &ds).unwrap();
            assert_eq!(plan.len(), n);

            let per_date = counts(&plan);
            let m = m as usize;
            assert_eq!(per_date.len(), m);
            for (i, d) in ds.iter().enumerate() {
                let expected = n / m + usize::from(i < n % m);
                assert_eq!(per_date[d], expected, "n={n} m={m} date #{i}");
            }
        }
    }

    #[test]
    fn files_keep_their_order() {
        let plan = build_plan(&files(7), &dates(3)).unwrap();
        let paths: Vec<_> = plan.iter().map(|e| e.path.clone()).collect();
        assert_eq!(paths, files(7));
        assert!(plan.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn no_files_is_empty_plan() {
        let plan = build_plan::<String>(&[], &dates(3)).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn no_dates_is_an_error() {
        assert!(build_plan(&files(2), &[]).is_err());
    }
}
