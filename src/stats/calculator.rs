//! Summary Calculator Module
//! Computes the dashboard's summary metrics, grouped churn rates and
//! chart series from the filtered view.

use polars::prelude::*;

use crate::data::{ChurnDataset, FilterSelection};

/// Rows included in the tabular preview handed to the presentation layer.
const TABLE_PREVIEW_ROWS: usize = 200;

/// Scalar metrics over the filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSummary {
    pub total_users: usize,
    pub total_churned: i64,
    /// Mean listening time in hours, rounded to 2 decimals.
    pub avg_listening_time: f64,
}

/// Churn rate of one group of the filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupChurnRate {
    pub group: String,
    /// Fraction of churned users in the group, in [0, 1].
    pub churn_rate: f64,
}

/// One point of a churn-coloured scatter chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub churned: bool,
}

/// String-rendered preview of the filtered rows for tabular display.
#[derive(Debug, Clone)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Full height of the filtered view, of which `rows` is a prefix.
    pub total_rows: usize,
}

/// Everything the dashboard draws for a non-empty filtered view.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub summary: AggregateSummary,
    pub churn_by_subscription: Vec<GroupChurnRate>,
    pub churn_by_device: Vec<GroupChurnRate>,
    /// Songs played per day vs listening time.
    pub listening_scatter: Vec<ScatterPoint>,
    /// Songs played per day vs skip rate.
    pub skip_scatter: Vec<ScatterPoint>,
    pub table: TableData,
}

/// Result of one filter-and-aggregate pass.
///
/// `Empty` is the designated "no data for the current selection" state;
/// no metrics or groupings are computed for it.
#[derive(Debug, Clone)]
pub enum ViewModel {
    Empty,
    Ready(DashboardData),
}

impl ViewModel {
    /// Number of rows that passed the filter.
    pub fn row_count(&self) -> usize {
        match self {
            ViewModel::Empty => 0,
            ViewModel::Ready(data) => data.summary.total_users,
        }
    }
}

/// Run the whole pipeline for one interaction: apply the selection to
/// the dataset and aggregate the result.
///
/// Pure with respect to its inputs; the dataset is never written to, so
/// repeated calls with the same selection produce the same view.
pub fn render(dataset: &ChurnDataset, selection: &FilterSelection) -> PolarsResult<ViewModel> {
    let filtered = selection.apply(dataset.frame())?;
    if filtered.height() == 0 {
        return Ok(ViewModel::Empty);
    }

    let summary = compute_summary(&filtered)?;
    let churn_by_subscription = churn_rate_by(&filtered, "subscription_type")?;
    let churn_by_device = churn_rate_by(&filtered, "device_type")?;
    let listening_scatter = scatter_points(&filtered, "songs_played_per_day", "listening_time")?;
    let skip_scatter = scatter_points(&filtered, "songs_played_per_day", "skip_rate")?;
    let table = table_data(&filtered);

    Ok(ViewModel::Ready(DashboardData {
        summary,
        churn_by_subscription,
        churn_by_device,
        listening_scatter,
        skip_scatter,
        table,
    }))
}

/// Scalar metrics; callers guarantee a non-empty frame.
fn compute_summary(df: &DataFrame) -> PolarsResult<AggregateSummary> {
    let total_users = df.height();
    let total_churned = df
        .column("is_churned")?
        .i32()?
        .sum()
        .map(i64::from)
        .unwrap_or(0);

    let listening = df.column("listening_time")?.cast(&DataType::Float64)?;
    let avg_listening_time = round2(listening.f64()?.mean().unwrap_or(f64::NAN));

    Ok(AggregateSummary {
        total_users,
        total_churned,
        avg_listening_time,
    })
}

/// Mean churn per distinct value of `group_column`, in lexicographic
/// group order so repeated runs report groups identically.
fn churn_rate_by(df: &DataFrame, group_column: &str) -> PolarsResult<Vec<GroupChurnRate>> {
    let grouped = df
        .clone()
        .lazy()
        .group_by([col(group_column)])
        .agg([col("is_churned").mean().alias("churn_rate")])
        .sort([group_column], SortMultipleOptions::default())
        .collect()?;

    let groups = grouped.column(group_column)?.as_materialized_series();
    let rates = grouped.column("churn_rate")?.f64()?;

    let mut out = Vec::with_capacity(grouped.height());
    for i in 0..grouped.height() {
        let group = match groups.get(i) {
            Ok(val) if !val.is_null() => val.to_string().trim_matches('"').to_string(),
            _ => continue,
        };
        let churn_rate = rates.get(i).unwrap_or(f64::NAN);
        out.push(GroupChurnRate { group, churn_rate });
    }

    Ok(out)
}

/// Pair two numeric columns into scatter points tagged with churn status.
fn scatter_points(
    df: &DataFrame,
    x_column: &str,
    y_column: &str,
) -> PolarsResult<Vec<ScatterPoint>> {
    let x_f64 = df.column(x_column)?.cast(&DataType::Float64)?;
    let x_ca = x_f64.f64()?;
    let y_f64 = df.column(y_column)?.cast(&DataType::Float64)?;
    let y_ca = y_f64.f64()?;
    let churned_ca = df.column("is_churned")?.i32()?;

    let mut points = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Some(x), Some(y), Some(c)) = (x_ca.get(i), y_ca.get(i), churned_ca.get(i)) {
            if !x.is_nan() && !y.is_nan() {
                points.push(ScatterPoint {
                    x,
                    y,
                    churned: c == 1,
                });
            }
        }
    }

    Ok(points)
}

/// Render the first rows of the filtered view as display strings.
fn table_data(df: &DataFrame) -> TableData {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let series: Vec<&Series> = df
        .get_columns()
        .iter()
        .map(|col| col.as_materialized_series())
        .collect();

    let preview = df.height().min(TABLE_PREVIEW_ROWS);
    let mut rows = Vec::with_capacity(preview);
    for i in 0..preview {
        let row: Vec<String> = series
            .iter()
            .map(|s| match s.get(i) {
                Ok(val) if !val.is_null() => val.to_string().trim_matches('"').to_string(),
                _ => String::new(),
            })
            .collect();
        rows.push(row);
    }

    TableData {
        columns,
        rows,
        total_rows: df.height(),
    }
}

/// Round to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_row_dataset() -> ChurnDataset {
        ChurnDataset::from_frame(
            df!(
                "country" => ["US", "US"],
                "gender" => ["F", "M"],
                "subscription_type" => ["Free", "Premium"],
                "device_type" => ["Mobile", "Desktop"],
                "listening_time" => [2.0, 4.0],
                "songs_played_per_day" => [12.0, 30.0],
                "skip_rate" => [0.4, 0.1],
                "is_churned" => ["Yes", "No"]
            )
            .unwrap(),
        )
        .unwrap()
    }

    fn five_row_dataset() -> ChurnDataset {
        ChurnDataset::from_frame(
            df!(
                "country" => ["US", "US", "DE", "DE", "FR"],
                "gender" => ["F", "M", "F", "M", "F"],
                "subscription_type" => ["Free", "Free", "Free", "Premium", "Premium"],
                "device_type" => ["Mobile", "Desktop", "Mobile", "Mobile", "Desktop"],
                "listening_time" => [2.0, 4.0, 3.0, 5.0, 1.0],
                "songs_played_per_day" => [12.0, 30.0, 20.0, 40.0, 5.0],
                "skip_rate" => [0.4, 0.1, 0.2, 0.05, 0.8],
                "is_churned" => ["Yes", "Yes", "No", "No", "No"]
            )
            .unwrap(),
        )
        .unwrap()
    }

    fn ready(view: ViewModel) -> DashboardData {
        match view {
            ViewModel::Ready(data) => data,
            ViewModel::Empty => panic!("expected a non-empty view"),
        }
    }

    #[test]
    fn default_selection_reports_whole_dataset() {
        let dataset = two_row_dataset();
        let selection = FilterSelection::all_of(dataset.options());
        let data = ready(render(&dataset, &selection).unwrap());

        assert_eq!(data.summary.total_users, 2);
        assert_eq!(data.summary.total_churned, 1);
        assert_eq!(data.summary.avg_listening_time, 3.0);
        assert_eq!(
            data.churn_by_subscription,
            vec![
                GroupChurnRate {
                    group: "Free".to_string(),
                    churn_rate: 1.0
                },
                GroupChurnRate {
                    group: "Premium".to_string(),
                    churn_rate: 0.0
                },
            ]
        );
        assert_eq!(
            data.churn_by_device,
            vec![
                GroupChurnRate {
                    group: "Desktop".to_string(),
                    churn_rate: 0.0
                },
                GroupChurnRate {
                    group: "Mobile".to_string(),
                    churn_rate: 1.0
                },
            ]
        );
    }

    #[test]
    fn narrowed_selection_recomputes_metrics() {
        let dataset = two_row_dataset();
        let mut selection = FilterSelection::all_of(dataset.options());
        selection.subscription_types = ["Premium".to_string()].into();
        let data = ready(render(&dataset, &selection).unwrap());

        assert_eq!(data.summary.total_users, 1);
        assert_eq!(data.summary.total_churned, 0);
        assert_eq!(data.summary.avg_listening_time, 4.0);
    }

    #[test]
    fn no_matching_rows_yields_empty_view() {
        let dataset = two_row_dataset();
        let mut selection = FilterSelection::all_of(dataset.options());
        selection.countries = ["BR".to_string()].into();
        let view = render(&dataset, &selection).unwrap();

        assert!(matches!(view, ViewModel::Empty));
        assert_eq!(view.row_count(), 0);
    }

    #[test]
    fn churn_rates_match_their_definition() {
        let dataset = five_row_dataset();
        let selection = FilterSelection::all_of(dataset.options());
        let data = ready(render(&dataset, &selection).unwrap());

        // Free: 2 churned of 3, Premium: 0 of 2, in lexicographic order
        assert_eq!(data.churn_by_subscription.len(), 2);
        assert_eq!(data.churn_by_subscription[0].group, "Free");
        assert!((data.churn_by_subscription[0].churn_rate - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(data.churn_by_subscription[1].group, "Premium");
        assert_eq!(data.churn_by_subscription[1].churn_rate, 0.0);

        for rate in data
            .churn_by_subscription
            .iter()
            .chain(data.churn_by_device.iter())
        {
            assert!((0.0..=1.0).contains(&rate.churn_rate));
        }
    }

    #[test]
    fn rendering_is_idempotent() {
        let dataset = five_row_dataset();
        let mut selection = FilterSelection::all_of(dataset.options());
        selection.genders = ["F".to_string()].into();

        let first = ready(render(&dataset, &selection).unwrap());
        let second = ready(render(&dataset, &selection).unwrap());

        assert_eq!(first.summary, second.summary);
        assert_eq!(first.churn_by_subscription, second.churn_by_subscription);
        assert_eq!(first.churn_by_device, second.churn_by_device);
    }

    #[test]
    fn scatter_points_carry_churn_status_in_row_order() {
        let dataset = two_row_dataset();
        let selection = FilterSelection::all_of(dataset.options());
        let data = ready(render(&dataset, &selection).unwrap());

        assert_eq!(
            data.listening_scatter,
            vec![
                ScatterPoint {
                    x: 12.0,
                    y: 2.0,
                    churned: true
                },
                ScatterPoint {
                    x: 30.0,
                    y: 4.0,
                    churned: false
                },
            ]
        );
        assert_eq!(data.skip_scatter.len(), 2);
        assert_eq!(data.skip_scatter[1].y, 0.1);
    }

    #[test]
    fn table_preview_mirrors_the_filtered_view() {
        let dataset = five_row_dataset();
        let mut selection = FilterSelection::all_of(dataset.options());
        selection.countries = ["DE".to_string()].into();
        let data = ready(render(&dataset, &selection).unwrap());

        assert_eq!(data.table.total_rows, 2);
        assert_eq!(data.table.rows.len(), 2);
        assert_eq!(data.table.columns.len(), 8);
        assert_eq!(data.table.columns[0], "country");
        assert_eq!(data.table.rows[0][0], "DE");
    }

    #[test]
    fn round2_rounds_halves_away_from_zero() {
        assert_eq!(round2(2.625), 2.63);
        assert_eq!(round2(-2.625), -2.63);
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(4.0), 4.0);
    }
}
