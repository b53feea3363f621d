use polars::prelude::*;
use turbine_core::dataset::TurbineId;
use turbine_core::summary::{summarize, summary_records};

fn cleaned_frame(turbines: Vec<Option<i64>>, power: Vec<Option<f64>>) -> DataFrame {
    DataFrame::new(vec![
        Series::new("turbine_id".into(), turbines).into(),
        Series::new("power_output".into(), power).into(),
    ])
    .unwrap()
}

#[test]
fn min_max_mean_per_turbine() {
    let df = cleaned_frame(
        vec![Some(7), Some(7), Some(7)],
        vec![Some(10.0), Some(20.0), Some(30.0)],
    );

    let records = summary_records(&df).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].turbine_id, Some(TurbineId::Integer(7)));
    assert_eq!(records[0].min_power_output, Some(10.0));
    assert_eq!(records[0].max_power_output, Some(30.0));
    assert_eq!(records[0].avg_power_output, Some(20.0));
}

#[test]
fn missing_values_are_skipped_and_all_missing_group_is_null() {
    let df = cleaned_frame(
        vec![Some(2), Some(1), Some(2), Some(1)],
        vec![None, Some(4.0), None, None],
    );

    let records = summary_records(&df).unwrap();

    assert_eq!(records[0].turbine_id, Some(TurbineId::Integer(1)));
    assert_eq!(records[0].avg_power_output, Some(4.0));
    assert_eq!(records[1].turbine_id, Some(TurbineId::Integer(2)));
    assert_eq!(records[1].min_power_output, None);
    assert_eq!(records[1].max_power_output, None);
    assert_eq!(records[1].avg_power_output, None);
}

#[test]
fn summary_frame_is_sorted_and_keeps_id_type() {
    let df = cleaned_frame(
        vec![Some(10), Some(2), None, Some(10), Some(2)],
        vec![Some(1.0), Some(5.0), Some(9.0), Some(3.0), Some(7.0)],
    );

    let summary = summarize(&df).unwrap();

    assert_eq!(
        summary.get_column_names(),
        [
            "turbine_id",
            "min_power_output",
            "max_power_output",
            "avg_power_output"
        ]
    );
    let ids = summary.column("turbine_id").unwrap().i64().unwrap();
    assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![Some(2), Some(10), None]);

    let avg = summary.column("avg_power_output").unwrap().f64().unwrap();
    assert_eq!(avg.into_iter().collect::<Vec<_>>(), vec![Some(6.0), Some(2.0), Some(9.0)]);
}

#[test]
fn text_ids_sort_lexicographically() {
    let df = DataFrame::new(vec![
        Series::new("turbine_id".into(), vec!["WT-B", "WT-A"]).into(),
        Series::new("power_output".into(), vec![1.0f64, 2.0]).into(),
    ])
    .unwrap();

    let summary = summarize(&df).unwrap();
    let ids = summary.column("turbine_id").unwrap().str().unwrap();
    assert_eq!(ids.get(0), Some("WT-A"));
    assert_eq!(ids.get(1), Some("WT-B"));
}

#[test]
fn float_ids_sort_numerically() {
    let df = DataFrame::new(vec![
        Series::new("turbine_id".into(), vec![10.5f64, 2.5, 10.5]).into(),
        Series::new("power_output".into(), vec![1.0f64, 2.0, 3.0]).into(),
    ])
    .unwrap();

    let records = summary_records(&df).unwrap();

    assert_eq!(records[0].turbine_id, Some(TurbineId::Float(2.5)));
    assert_eq!(records[1].turbine_id, Some(TurbineId::Float(10.5)));
    assert_eq!(records[1].avg_power_output, Some(2.0));
}
