//! CSV Data Loader Module
//! Loads the churn dataset with Polars and normalizes it into the shape
//! the rest of the application relies on.

use std::path::Path;

use polars::prelude::*;
use thiserror::Error;

use super::filter::FilterOptions;

/// Columns that must be present after column-name normalization.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "country",
    "gender",
    "subscription_type",
    "device_type",
    "listening_time",
    "songs_played_per_day",
    "skip_rate",
    "is_churned",
];

/// The churn indicator column.
pub const CHURN_COLUMN: &str = "is_churned";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Required column '{0}' is missing")]
    MissingColumn(String),
    #[error("Unrecognized churn value '{0}' (expected \"Yes\"/\"No\", true/false or 0/1)")]
    InvalidChurnValue(String),
}

/// The loaded churn dataset: a normalized DataFrame plus the distinct
/// values per filterable column, captured once at load time so the
/// filter widgets keep stable option lists while the view changes.
///
/// Read-only after construction; filtering always derives a new frame.
#[derive(Debug, Clone)]
pub struct ChurnDataset {
    df: DataFrame,
    options: FilterOptions,
}

impl ChurnDataset {
    /// Load a CSV file using Polars and normalize it.
    ///
    /// The backing file is read exactly once; all later interactions work
    /// against the in-memory frame.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        // Use lazy evaluation for memory efficiency, then collect
        let df = LazyCsvReader::new(path.as_ref().to_path_buf())
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        Self::from_frame(df)
    }

    /// Build a dataset from an already-loaded frame: normalize column
    /// names, check the required columns and coerce the churn indicator.
    pub fn from_frame(mut df: DataFrame) -> Result<Self, LoaderError> {
        normalize_columns(&mut df)?;

        for required in REQUIRED_COLUMNS {
            if !df
                .get_column_names()
                .iter()
                .any(|name| name.as_str() == required)
            {
                return Err(LoaderError::MissingColumn(required.to_string()));
            }
        }

        coerce_churn(&mut df)?;

        let options = FilterOptions::from_frame(&df);
        Ok(Self { df, options })
    }

    /// The normalized frame.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Distinct values per filterable column, as observed at load time.
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.df.width()
    }
}

/// Normalize a single column name: trim, lower-case, spaces to
/// underscores. Applying it twice yields the same result as once.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Rename every column of the frame with [`normalize_column_name`].
fn normalize_columns(df: &mut DataFrame) -> Result<(), LoaderError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| normalize_column_name(name.as_str()))
        .collect();
    df.set_column_names(names)?;
    Ok(())
}

/// Coerce the churn column to 0/1 integers.
///
/// Textual "Yes"/"No" is mapped to 1/0, booleans and numeric 0/1 pass
/// through. Anything else, nulls included, is a hard error rather than
/// a silent "not churned".
fn coerce_churn(df: &mut DataFrame) -> Result<(), LoaderError> {
    let coerced: Vec<i32> = {
        let column = df.column(CHURN_COLUMN)?;

        match column.dtype() {
            DataType::String => {
                let values = column.str()?;
                values
                    .into_iter()
                    .map(|value| match value {
                        Some("Yes") => Ok(1),
                        Some("No") => Ok(0),
                        Some(other) => Err(LoaderError::InvalidChurnValue(other.to_string())),
                        None => Err(LoaderError::InvalidChurnValue("null".to_string())),
                    })
                    .collect::<Result<_, _>>()?
            }
            DataType::Boolean => {
                let values = column.bool()?;
                values
                    .into_iter()
                    .map(|value| match value {
                        Some(true) => Ok(1),
                        Some(false) => Ok(0),
                        None => Err(LoaderError::InvalidChurnValue("null".to_string())),
                    })
                    .collect::<Result<_, _>>()?
            }
            DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => {
                let as_f64 = column.cast(&DataType::Float64)?;
                let values = as_f64.f64()?;
                values
                    .into_iter()
                    .map(|value| match value {
                        Some(v) if v == 0.0 => Ok(0),
                        Some(v) if v == 1.0 => Ok(1),
                        Some(v) => Err(LoaderError::InvalidChurnValue(v.to_string())),
                        None => Err(LoaderError::InvalidChurnValue("null".to_string())),
                    })
                    .collect::<Result<_, _>>()?
            }
            other => return Err(LoaderError::InvalidChurnValue(format!("dtype {other}"))),
        }
    };

    df.with_column(Column::new(CHURN_COLUMN.into(), coerced))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        df!(
            " Country" => ["US", "US", "DE"],
            "Gender" => ["F", "M", "F"],
            "Subscription Type" => ["Free", "Premium", "Free"],
            "Device Type" => ["Mobile", "Desktop", "Mobile"],
            "Listening Time " => [2.0, 4.0, 3.0],
            "Songs Played Per Day" => [10.0, 25.0, 15.0],
            "Skip Rate" => [0.5, 0.1, 0.3],
            "Is Churned" => ["Yes", "No", "No"]
        )
        .unwrap()
    }

    #[test]
    fn column_names_are_normalized() {
        let dataset = ChurnDataset::from_frame(sample_frame()).unwrap();
        let names: Vec<String> = dataset
            .frame()
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "country",
                "gender",
                "subscription_type",
                "device_type",
                "listening_time",
                "songs_played_per_day",
                "skip_rate",
                "is_churned",
            ]
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["  Listening Time ", "skip_rate", "Device Type"] {
            let once = normalize_column_name(raw);
            assert_eq!(normalize_column_name(&once), once);
        }
    }

    #[test]
    fn textual_churn_maps_to_binary() {
        let dataset = ChurnDataset::from_frame(sample_frame()).unwrap();
        let churned = dataset.frame().column(CHURN_COLUMN).unwrap();
        assert_eq!(churned.dtype(), &DataType::Int32);

        let values: Vec<i32> = churned.i32().unwrap().into_iter().flatten().collect();
        assert_eq!(values, vec![1, 0, 0]);
    }

    #[test]
    fn numeric_and_boolean_churn_pass_through() {
        let mut numeric = sample_frame();
        numeric
            .with_column(Column::new("Is Churned".into(), vec![0i64, 1, 1]))
            .unwrap();
        let dataset = ChurnDataset::from_frame(numeric).unwrap();
        let values: Vec<i32> = dataset
            .frame()
            .column(CHURN_COLUMN)
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(values, vec![0, 1, 1]);

        let mut boolean = sample_frame();
        boolean
            .with_column(Column::new("Is Churned".into(), vec![true, false, true]))
            .unwrap();
        let dataset = ChurnDataset::from_frame(boolean).unwrap();
        let values: Vec<i32> = dataset
            .frame()
            .column(CHURN_COLUMN)
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(values, vec![1, 0, 1]);
    }

    #[test]
    fn churn_values_stay_binary() {
        let dataset = ChurnDataset::from_frame(sample_frame()).unwrap();
        let values = dataset.frame().column(CHURN_COLUMN).unwrap();
        for value in values.i32().unwrap().into_iter().flatten() {
            assert!(value == 0 || value == 1);
        }
    }

    #[test]
    fn unknown_churn_text_fails_loudly() {
        let mut frame = sample_frame();
        frame
            .with_column(Column::new("Is Churned".into(), vec!["Yes", "Maybe", "No"]))
            .unwrap();
        let err = ChurnDataset::from_frame(frame).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidChurnValue(v) if v == "Maybe"));
    }

    #[test]
    fn out_of_range_numeric_churn_fails_loudly() {
        let mut frame = sample_frame();
        frame
            .with_column(Column::new("Is Churned".into(), vec![0i64, 2, 1]))
            .unwrap();
        let err = ChurnDataset::from_frame(frame).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidChurnValue(_)));
    }

    #[test]
    fn missing_required_column_is_reported_by_name() {
        let frame = sample_frame().drop("Skip Rate").unwrap();
        let err = ChurnDataset::from_frame(frame).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(name) if name == "skip_rate"));
    }

    #[test]
    fn distinct_options_are_captured_sorted() {
        let dataset = ChurnDataset::from_frame(sample_frame()).unwrap();
        let options = dataset.options();
        assert_eq!(options.countries, vec!["DE", "US"]);
        assert_eq!(options.genders, vec!["F", "M"]);
        assert_eq!(options.subscription_types, vec!["Free", "Premium"]);
    }
}
