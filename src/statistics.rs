//! Per-column min/max/avg/sum/count over projected chart records.

use crate::chart_data::ChartRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub sum: f64,
    pub count: usize,
}

impl ColumnStats {
    /// Stats over the finite values; `None` when there are none.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(Self {
            min,
            max,
            avg: sum / count as f64,
            sum,
            count,
        })
    }
}

/// Stats for each numeric header, in header order. Headers with no finite
/// values are left out rather than reported as NaN.
pub fn column_stats(
    records: &[ChartRecord<'_>],
    numeric_headers: &[String],
) -> Vec<(String, ColumnStats)> {
    numeric_headers
        .iter()
        .filter_map(|header| {
            ColumnStats::from_values(records.iter().map(|r| r.value(header)))
                .map(|stats| (header.clone(), stats))
        })
        .collect()
}

/// Compact number for the stats panel: integers without decimals, others
/// with two.
pub fn format_stat(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 && v.abs() < 1e15 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_data::project;
    use crate::dataset::Row;

    #[test]
    fn basic_stats() {
        let s = ColumnStats::from_values([4.0, 1.0, 7.0]).unwrap();
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 7.0);
        assert_eq!(s.sum, 12.0);
        assert_eq!(s.count, 3);
        assert_eq!(s.avg, 4.0);
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let s = ColumnStats::from_values([f64::NAN, 2.0, f64::INFINITY]).unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.min, 2.0);
        assert!(ColumnStats::from_values([f64::NAN]).is_none());
        assert!(ColumnStats::from_values(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn stats_follow_projected_records() {
        let rows = vec![
            Row::from_pairs([("name", "Bob"), ("age", "30")]),
            Row::from_pairs([("name", "Amy")]),
        ];
        let headers = vec!["name".to_string(), "age".to_string()];
        let numeric = vec!["age".to_string()];
        let records = project(&rows, &headers, &numeric, 50);
        let stats = column_stats(&records, &numeric);
        assert_eq!(stats.len(), 1);
        let (header, s) = &stats[0];
        assert_eq!(header, "age");
        // the missing age is projected as 0 and takes part in the stats
        assert_eq!(s.count, 2);
        assert_eq!(s.min, 0.0);
        assert_eq!(s.max, 30.0);
        assert_eq!(s.avg, s.sum / s.count as f64);
    }

    #[test]
    fn no_records_no_stats() {
        let numeric = vec!["a".to_string()];
        assert!(column_stats(&[], &numeric).is_empty());
    }

    #[test]
    fn format_stat_drops_trailing_zeros_for_integers() {
        assert_eq!(format_stat(12.0), "12");
        assert_eq!(format_stat(2.5), "2.50");
        assert_eq!(format_stat(-3.0), "-3");
    }
}
