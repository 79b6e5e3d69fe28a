//! Per-column substring filter.
//!
//! A row passes when, for every field with a pattern, the displayed value of
//! that column contains the pattern, ignoring case.

use std::rc::Rc;

use crate::types::{Column, FilterSpec, Record};

/// True if row `row_index` of `data` passes every active pattern of `spec`.
///
/// A pattern on a field that is not a column never matches.
pub fn row_matches(data: &[Rc<Record>], row_index: usize, spec: &FilterSpec, columns: &[Column]) -> bool {
    spec.active().all(|(field, pattern)| {
        let Some(col_index) = columns.iter().position(|c| c.field == field) else {
            return false;
        };
        columns.get(col_index).is_some_and(|column| {
            column
                .value_at(data, row_index, col_index)
                .to_string()
                .to_uppercase()
                .contains(&pattern.to_uppercase())
        })
    })
}

/// Rows of `data` passing `spec`, in source order. The source is not touched.
pub fn filter_rows(data: &[Rc<Record>], spec: &FilterSpec, columns: &[Column]) -> Vec<Rc<Record>> {
    if spec.is_empty() {
        return data.to_vec();
    }
    for (field, _) in spec.active() {
        if !columns.iter().any(|c| c.field == field) {
            log::warn!(target: "vsheet::filter", "filter on unknown field {field:?} matches no rows");
        }
    }
    let rows: Vec<Rc<Record>> = data
        .iter()
        .enumerate()
        .filter(|(i, _)| row_matches(data, *i, spec, columns))
        .map(|(_, row)| Rc::clone(row))
        .collect();
    log::debug!(target: "vsheet::filter", "filter kept {} of {} rows", rows.len(), data.len());
    rows
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn people() -> Vec<Rc<Record>> {
        ["Anna", "Bob", "Annette"]
            .iter()
            .map(|n| Rc::new(Record::new().with("name", *n).with("age", 40_i64)))
            .collect()
    }

    fn names(data: &[Rc<Record>]) -> Vec<String> {
        data.iter().map(|r| r.get("name").unwrap().to_string()).collect()
    }

    #[test]
    fn test_case_insensitive_substring() {
        let cols = vec![Column::new("name"), Column::new("age")];
        let spec = FilterSpec::new().with("name", "an");
        assert_eq!(names(&filter_rows(&people(), &spec, &cols)), ["Anna", "Annette"]);
    }

    #[test]
    fn test_patterns_are_anded() {
        let cols = vec![Column::new("name"), Column::new("age")];
        let spec = FilterSpec::new().with("name", "an").with("age", "41");
        assert!(filter_rows(&people(), &spec, &cols).is_empty());
    }

    #[test]
    fn test_unknown_field_matches_nothing() {
        let cols = vec![Column::new("name")];
        let spec = FilterSpec::new().with("city", "x");
        assert!(filter_rows(&people(), &spec, &cols).is_empty());
    }

    #[test]
    fn test_empty_spec_keeps_everything() {
        let cols = vec![Column::new("name")];
        let data = people();
        let out = filter_rows(&data, &FilterSpec::new(), &cols);
        assert_eq!(out.len(), 3);
        assert!(Rc::ptr_eq(&out[0], &data[0]));
    }
}
