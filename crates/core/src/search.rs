//! Substring search over the in-memory dataset.
//!
//! Search runs against the cached dataset, never against the network; the
//! fetcher's filter parameters exist only to scope bulk fetches.

use std::collections::HashSet;

use crate::model::{Dataset, Record};

/// Hard cap on result size.
pub const MAX_RESULTS: usize = 1000;

/// Search establishments by name or address.
///
/// Case-insensitive substring match over the name, building, and street
/// fields joined with single spaces. The space separator means a query can
/// span adjacent fields the way the address reads ("123 Broadway"), but a
/// per-field match never breaks from the neighboring field's text. An
/// empty or whitespace-only query returns no results rather than the
/// whole dataset. Results are deduplicated by camis (the
/// canonical snapshot already guarantees uniqueness; this holds for
/// non-canonical input too), ordered by inspection date descending, and
/// capped at [`MAX_RESULTS`]. Total: never fails, whatever the query.
pub fn search(dataset: &Dataset, query: &str) -> Vec<Record> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut results: Vec<Record> = dataset
        .records()
        .iter()
        .filter(|r| {
            let haystack =
                format!("{} {} {}", r.dba, r.building, r.street).to_lowercase();
            haystack.contains(&query)
        })
        .filter(|r| seen.insert(r.camis.as_str()))
        .cloned()
        .collect();

    results.sort_by(|a, b| match (&b.inspection_date, &a.inspection_date) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    });
    results.truncate(MAX_RESULTS);
    results
}

/// Restrict the dataset to inspections from one year.
pub fn filter_by_year(dataset: &Dataset, year: i32) -> Dataset {
    Dataset::new(
        dataset
            .records()
            .iter()
            .filter(|r| r.year == Some(year))
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRecord;
    use crate::normalize::normalize;

    fn dataset() -> Dataset {
        let raw = |camis: &str, dba: &str, building: &str, street: &str, date: &str| RawRecord {
            camis: Some(camis.to_string()),
            dba: Some(dba.to_string()),
            building: Some(building.to_string()),
            street: Some(street.to_string()),
            score: Some("10".to_string()),
            inspection_date: Some(date.to_string()),
            latitude: Some("40.7".to_string()),
            longitude: Some("-74.0".to_string()),
            ..Default::default()
        };
        normalize(&[vec![
            raw("1", "Joe's Pizza", "7", "Carmine St", "2023-03-01"),
            raw("2", "Pizza Suprema", "413", "8th Ave", "2023-05-01"),
            raw("3", "Shake Shack", "1", "Madison Ave", "2022-11-01"),
        ]])
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let ds = dataset();
        assert!(search(&ds, "").is_empty());
        assert!(search(&ds, "   \t ").is_empty());
    }

    #[test]
    fn test_case_insensitive_name_match() {
        let results = search(&dataset(), "PIZZA");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_street_match() {
        let results = search(&dataset(), "carmine");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].camis, "1");
    }

    #[test]
    fn test_results_ordered_by_date_descending() {
        let results = search(&dataset(), "a");
        assert!(results.len() >= 2);
        for pair in results.windows(2) {
            assert!(pair[0].inspection_date >= pair[1].inspection_date);
        }
    }

    #[test]
    fn test_query_spans_building_and_street() {
        let results = search(&dataset(), "413 8th");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].camis, "2");

        // The separator keeps fields distinct: no match glues the end of
        // one field to the start of the next without the space.
        assert!(search(&dataset(), "4138th").is_empty());
    }

    #[test]
    fn test_special_characters_never_panic() {
        let ds = dataset();
        for q in ["'", "\"", "\\", "%_", "🍕", "a]b[c", ".*", "\0"] {
            let _ = search(&ds, q);
        }
    }

    #[test]
    fn test_dedup_on_non_canonical_input() {
        let ds = dataset();
        let mut doubled: Vec<_> = ds.records().to_vec();
        doubled.extend(ds.records().to_vec());
        let results = search(&Dataset::new(doubled), "pizza");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_result_cap() {
        let records: Vec<_> = (0..MAX_RESULTS + 50)
            .map(|i| {
                let mut r = dataset().records()[0].clone();
                r.camis = i.to_string();
                r
            })
            .collect();
        let results = search(&Dataset::new(records), "pizza");
        assert_eq!(results.len(), MAX_RESULTS);
    }

    #[test]
    fn test_filter_by_year() {
        let ds = dataset();
        let y2023 = filter_by_year(&ds, 2023);
        assert_eq!(y2023.len(), 2);
        assert!(filter_by_year(&ds, 1999).is_empty());
    }
}
