//! Metric derivations shared by the chart builders. All pure functions;
//! nothing here touches the filesystem.

use regex::Regex;
use std::sync::OnceLock;

static BOM_SIZE_RE: OnceLock<Regex> = OnceLock::new();

/// Pattern for the component count embedded in instance identifiers
/// such as `scal_bom_25` or `bom_100_seed3`.
pub fn bom_size_pattern() -> &'static Regex {
    BOM_SIZE_RE.get_or_init(|| Regex::new(r"bom_(\d+)").unwrap())
}

/// First capture group of `pattern` in `id`, parsed as a number.
/// `None` when the pattern does not match; callers drop such rows.
pub fn extract_numeric(id: &str, pattern: &Regex) -> Option<f64> {
    pattern
        .captures(id)?
        .get(1)
        .and_then(|m| m.as_str().parse().ok())
}

/// BOM size from an instance identifier.
pub fn bom_size(id: &str) -> Option<f64> {
    extract_numeric(id, bom_size_pattern())
}

/// Which branch produced a group baseline. Surfaced in the run manifest
/// so the fallback is visible after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineSource {
    /// The designated baseline column on the group's first row.
    Column,
    /// The maximum of the reference column across the group.
    GroupMax,
}

/// Baseline for a sweep group: the designated column value when the
/// first row carries one, otherwise the group maximum of the reference
/// column. `None` only when neither exists.
pub fn group_baseline(
    first_row_baseline: Option<f64>,
    reference_max: Option<f64>,
) -> Option<(f64, BaselineSource)> {
    match first_row_baseline {
        Some(b) => Some((b, BaselineSource::Column)),
        None => reference_max.map(|m| (m, BaselineSource::GroupMax)),
    }
}

/// `value` as a percentage of `baseline`. Exactly 100.0 when the two
/// are equal.
pub fn pct_of(value: f64, baseline: f64) -> f64 {
    100.0 * value / baseline
}

/// Ordered case-insensitive substring classification: the first pattern
/// contained in `label` wins, `fallback` otherwise.
pub fn classify_by_pattern<T: Copy>(label: &str, pairs: &[(&str, T)], fallback: T) -> T {
    let lowered = label.to_lowercase();
    pairs
        .iter()
        .find(|(needle, _)| lowered.contains(&needle.to_lowercase()))
        .map(|(_, value)| *value)
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bom_size_extraction() {
        assert_eq!(bom_size("scal_bom_25"), Some(25.0));
        assert_eq!(bom_size("bom_100_seed3"), Some(100.0));
        assert_eq!(bom_size("control"), None);
        assert_eq!(bom_size("bom_"), None);
    }

    #[test]
    fn extraction_is_deterministic() {
        let first = bom_size("scal_bom_42");
        for _ in 0..10 {
            assert_eq!(bom_size("scal_bom_42"), first);
        }
    }

    #[test]
    fn baseline_prefers_the_column() {
        assert_eq!(
            group_baseline(Some(500.0), Some(900.0)),
            Some((500.0, BaselineSource::Column))
        );
        assert_eq!(
            group_baseline(None, Some(900.0)),
            Some((900.0, BaselineSource::GroupMax))
        );
        assert_eq!(group_baseline(None, None), None);
    }

    #[test]
    fn value_equal_to_baseline_is_exactly_100_pct() {
        assert_eq!(pct_of(750.0, 750.0), 100.0);
        assert_eq!(pct_of(375.0, 750.0), 50.0);
    }

    #[test]
    fn classification_first_match_wins() {
        let pairs = [("ml", "Multi-Level"), ("par", "Parallel")];
        // "ml_par_mix" contains both; the earlier pattern decides.
        assert_eq!(classify_by_pattern("ml_par_mix", &pairs, "Standard"), "Multi-Level");
        assert_eq!(classify_by_pattern("PAR_heavy", &pairs, "Standard"), "Parallel");
        assert_eq!(classify_by_pattern("linear_chain", &pairs, "Standard"), "Standard");
    }
}
