//! Stats module - summary metrics and churn aggregation

mod calculator;

pub use calculator::{
    render, AggregateSummary, DashboardData, GroupChurnRate, ScatterPoint, TableData, ViewModel,
};
