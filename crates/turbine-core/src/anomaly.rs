use polars::prelude::*;
use tracing::{debug, info};

use crate::dataset::{require_column, require_numeric_power_output, turbine_ids, turbine_order, TurbineId};
use crate::error::Result;
use crate::{POWER_OUTPUT, TURBINE_ID};

/// Distance from the group mean, in sample standard deviations, beyond which a
/// measurement is flagged.
pub const STD_DEV_MULTIPLIER: f64 = 2.0;

/// Fewest non-null values a turbine needs for a sample deviation.
pub const MIN_VALID_VALUES: u32 = 2;

pub const VALID_COUNT: &str = "valid_count";
pub const MEAN_POWER_OUTPUT: &str = "mean_power_output";
pub const STD_POWER_OUTPUT: &str = "std_power_output";
pub const LOWER_BOUND: &str = "lower_bound";
pub const UPPER_BOUND: &str = "upper_bound";

const ROW_VALID_COUNT: &str = "__turbine_valid_count";
const ROW_MEAN: &str = "__turbine_mean";
const ROW_STD: &str = "__turbine_std";

#[derive(Debug, Clone)]
pub struct AnomalyReport {
    /// Flagged rows with the dataset's full column set, possibly empty.
    pub dataset: DataFrame,
    /// Turbines with fewer than two valid values; none of their rows are flagged.
    pub degenerate_groups: Vec<Option<TurbineId>>,
}

fn lower_bound(mean: Expr, std_dev: Expr) -> Expr {
    mean - lit(STD_DEV_MULTIPLIER) * std_dev
}

fn upper_bound(mean: Expr, std_dev: Expr) -> Expr {
    mean + lit(STD_DEV_MULTIPLIER) * std_dev
}

/// Per-turbine mean, sample standard deviation (n - 1) and the band outside
/// which a value is flagged, in the same order as the summary table.
pub fn turbine_bounds(df: &DataFrame) -> Result<DataFrame> {
    require_column(df, TURBINE_ID)?;
    require_numeric_power_output(df)?;

    Ok(df
        .clone()
        .lazy()
        .group_by([col(TURBINE_ID)])
        .agg([
            col(POWER_OUTPUT).count().alias(VALID_COUNT),
            col(POWER_OUTPUT).mean().alias(MEAN_POWER_OUTPUT),
            col(POWER_OUTPUT).std(1).alias(STD_POWER_OUTPUT),
        ])
        .with_columns([
            lower_bound(col(MEAN_POWER_OUTPUT), col(STD_POWER_OUTPUT)).alias(LOWER_BOUND),
            upper_bound(col(MEAN_POWER_OUTPUT), col(STD_POWER_OUTPUT)).alias(UPPER_BOUND),
        ])
        .sort([TURBINE_ID], turbine_order())
        .collect()?)
}

/// Flags rows whose `power_output` lies strictly outside their turbine's
/// `mean ± 2σ` band. Rows come out turbine by turbine, in dataset order
/// within each turbine. Missing values are never flagged.
pub fn detect_anomalies(df: &DataFrame) -> Result<AnomalyReport> {
    let bounds = turbine_bounds(df)?;
    let degenerate = bounds
        .clone()
        .lazy()
        .filter(col(VALID_COUNT).lt(lit(MIN_VALID_VALUES)))
        .select([col(TURBINE_ID)])
        .collect()?;
    let degenerate_groups = turbine_ids(degenerate.column(TURBINE_ID)?)?;
    for turbine_id in &degenerate_groups {
        debug!(?turbine_id, "too few values for a deviation bound; no rows flagged");
    }

    let by_turbine = || [col(TURBINE_ID)];
    let columns: Vec<Expr> = df
        .get_column_names()
        .into_iter()
        .map(|name| col(name.clone()))
        .collect();

    let dataset = df
        .clone()
        .lazy()
        .with_columns([
            col(POWER_OUTPUT).count().over(by_turbine()).alias(ROW_VALID_COUNT),
            col(POWER_OUTPUT).mean().over(by_turbine()).alias(ROW_MEAN),
            col(POWER_OUTPUT).std(1).over(by_turbine()).alias(ROW_STD),
        ])
        .filter(
            col(ROW_VALID_COUNT).gt_eq(lit(MIN_VALID_VALUES)).and(
                col(POWER_OUTPUT)
                    .lt(lower_bound(col(ROW_MEAN), col(ROW_STD)))
                    .or(col(POWER_OUTPUT).gt(upper_bound(col(ROW_MEAN), col(ROW_STD)))),
            ),
        )
        .sort([TURBINE_ID], turbine_order())
        .select(columns)
        .collect()?;

    info!(
        anomalies = dataset.height(),
        degenerate = degenerate_groups.len(),
        "detected anomalies"
    );

    Ok(AnomalyReport {
        dataset,
        degenerate_groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(turbines: &[&str], power: &[Option<f64>]) -> DataFrame {
        DataFrame::new(vec![
            Series::new(TURBINE_ID.into(), turbines.to_vec()).into(),
            Series::new(POWER_OUTPUT.into(), power.to_vec()).into(),
        ])
        .unwrap()
    }

    #[test]
    fn sample_deviation_uses_n_minus_one() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].map(Some);
        let df = frame(&["A"; 8], &values);

        let bounds = turbine_bounds(&df).unwrap();

        let mean = bounds.column(MEAN_POWER_OUTPUT).unwrap().f64().unwrap().get(0).unwrap();
        let std_dev = bounds.column(STD_POWER_OUTPUT).unwrap().f64().unwrap().get(0).unwrap();
        let upper = bounds.column(UPPER_BOUND).unwrap().f64().unwrap().get(0).unwrap();
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!((upper - (5.0 + 2.0 * std_dev)).abs() < 1e-12);
    }

    #[test]
    fn valid_count_skips_missing_values() {
        let df = frame(&["A", "A", "B"], &[Some(1.0), None, Some(3.0)]);

        let bounds = turbine_bounds(&df).unwrap();

        let counts = bounds.column(VALID_COUNT).unwrap().cast(&DataType::UInt32).unwrap();
        let counts: Vec<Option<u32>> = counts.u32().unwrap().into_iter().collect();
        assert_eq!(counts, vec![Some(1), Some(1)]);
    }
}
