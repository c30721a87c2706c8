use serde::Serialize;

/// Column-name fragments that mark a measure as a percentage
const PERCENT_MARKERS: &[&str] = &["percent", "prozent"];

/// Whether a bar series holds percentages or absolute counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Percentage,
    Count,
}

/// Classify a measure series.
///
/// Percentage when the column name mentions a percent marker, or when the
/// largest value lies in `(0, 100]`. A count column whose values all stay at
/// or below 100 is therefore reported as a percentage.
pub fn infer_value_kind(column: &str, values: &[f64]) -> ValueKind {
    let lowered = column.to_lowercase();
    if PERCENT_MARKERS.iter().any(|m| lowered.contains(m)) {
        return ValueKind::Percentage;
    }

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 && max <= 100.0 {
        ValueKind::Percentage
    } else {
        ValueKind::Count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_by_name() {
        assert_eq!(infer_value_kind("Stimmen_Prozent", &[30.0, 25.0]), ValueKind::Percentage);
        assert_eq!(infer_value_kind("vote_PERCENTAGE", &[3000.0]), ValueKind::Percentage);
    }

    #[test]
    fn test_percent_by_range() {
        assert_eq!(infer_value_kind("Anteil", &[0.5, 100.0]), ValueKind::Percentage);
    }

    #[test]
    fn test_count_by_range() {
        assert_eq!(infer_value_kind("Anzahl", &[12000.0, 4500.0]), ValueKind::Count);
        assert_eq!(infer_value_kind("Anzahl", &[100.5]), ValueKind::Count);
    }

    #[test]
    fn test_non_positive_max_is_count() {
        assert_eq!(infer_value_kind("Saldo", &[0.0, -3.0]), ValueKind::Count);
        assert_eq!(infer_value_kind("Saldo", &[]), ValueKind::Count);
    }

    #[test]
    fn test_small_counts_read_as_percentage() {
        // Heuristic: a count series that never exceeds 100 is indistinguishable
        assert_eq!(infer_value_kind("Sitze", &[42.0, 17.0]), ValueKind::Percentage);
    }
}
