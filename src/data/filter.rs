//! Filter Module
//! Set-membership filtering of the churn dataset by categorical columns.

use std::collections::BTreeSet;

use polars::prelude::*;

/// Distinct values per filterable column, observed from the unfiltered
/// dataset once at load time. Kept separate from the live selection so
/// the widget option lists stay stable while the view changes.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub countries: Vec<String>,
    pub genders: Vec<String>,
    pub subscription_types: Vec<String>,
}

impl FilterOptions {
    /// Capture the sorted distinct values of every filterable column.
    pub fn from_frame(df: &DataFrame) -> Self {
        Self {
            countries: distinct_values(df, "country"),
            genders: distinct_values(df, "gender"),
            subscription_types: distinct_values(df, "subscription_type"),
        }
    }
}

/// The active set of allowed values per categorical column. A row is
/// kept iff each of its three categorical fields is a member of the
/// corresponding set; an empty set therefore matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub countries: BTreeSet<String>,
    pub genders: BTreeSet<String>,
    pub subscription_types: BTreeSet<String>,
}

impl FilterSelection {
    /// The default selection: every observed value allowed.
    pub fn all_of(options: &FilterOptions) -> Self {
        Self {
            countries: options.countries.iter().cloned().collect(),
            genders: options.genders.iter().cloned().collect(),
            subscription_types: options.subscription_types.iter().cloned().collect(),
        }
    }

    /// Apply the selection to a frame, producing a fresh filtered frame.
    ///
    /// Pure set membership on each column, no prefix or range matching.
    /// The input frame is never mutated.
    pub fn apply(&self, df: &DataFrame) -> PolarsResult<DataFrame> {
        let predicate = membership("country", &self.countries)
            .and(membership("gender", &self.genders))
            .and(membership("subscription_type", &self.subscription_types));

        df.clone().lazy().filter(predicate).collect()
    }
}

/// Expression matching rows whose `column` value is in `allowed`.
fn membership(column: &str, allowed: &BTreeSet<String>) -> Expr {
    let values: Vec<String> = allowed.iter().cloned().collect();
    col(column).is_in(lit(Series::new(column.into(), values)))
}

/// Sorted distinct non-null values of a column, rendered as strings.
pub fn distinct_values(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .ok()
        .and_then(|col| col.unique().ok())
        .map(|unique| {
            let series = unique.as_materialized_series();
            let mut values: Vec<String> = (0..series.len())
                .filter_map(|i| {
                    let val = series.get(i).ok()?;
                    if val.is_null() {
                        None
                    } else {
                        Some(val.to_string().trim_matches('"').to_string())
                    }
                })
                .collect();
            values.sort();
            values
        })
        .unwrap_or_default()
}
