use std::collections::BTreeMap;
use std::fmt::Write;

/// How many exported entities carry each annotation key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationStats {
    total: usize,
    counts: BTreeMap<String, usize>,
}

impl AnnotationStats {
    pub fn track(&mut self, annotations: &BTreeMap<String, String>) {
        self.total += 1;
        for key in annotations.keys() {
            *self.counts.entry(key.clone()).or_default() += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or_default()
    }

    /// Coverage per key, most common first. Empty when nothing was tracked.
    pub fn report(&self) -> String {
        if self.total == 0 {
            return String::new();
        }

        let mut counts: Vec<(&String, &usize)> = self.counts.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        let mut report = String::from("=== Annotation Statistics ===\n\n");
        for (key, count) in counts {
            let pct = *count as f64 * 100.0 / self.total as f64;
            let _ = writeln!(
                report,
                "  {:<45} {:>3} / {}  ({:>5.1}%)",
                format!("{key}:"),
                count,
                self.total,
                pct
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::stats::AnnotationStats;

    fn annotations(keys: &[&str]) -> BTreeMap<String, String> {
        keys.iter()
            .map(|key| (key.to_string(), "x".to_string()))
            .collect()
    }

    #[test]
    fn empty_stats_should_have_empty_report() {
        assert_eq!("", AnnotationStats::default().report());
    }

    #[test]
    fn report_should_order_by_count_then_key() {
        let mut stats = AnnotationStats::default();
        stats.track(&annotations(&["b", "a", "c"]));
        stats.track(&annotations(&["c", "a"]));
        stats.track(&annotations(&["c"]));

        assert_eq!(3, stats.total());
        assert_eq!(2, stats.count("a"));
        assert_eq!(0, stats.count("d"));

        let report = stats.report();
        let keys: Vec<&str> = report
            .lines()
            .skip(2)
            .map(|line| line.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(vec!["c:", "a:", "b:"], keys);
        assert!(report.contains("3 / 3  (100.0%)"));
        assert!(report.contains("1 / 3  ( 33.3%)"));
    }
}
