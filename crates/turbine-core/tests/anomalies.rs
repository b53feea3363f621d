use polars::prelude::*;
use turbine_core::anomaly::detect_anomalies;
use turbine_core::dataset::TurbineId;

fn cleaned_frame(turbines: Vec<&str>, power: Vec<Option<f64>>) -> DataFrame {
    let rows = turbines.len() as i64;
    DataFrame::new(vec![
        Series::new("sequence".into(), (0..rows).collect::<Vec<i64>>()).into(),
        Series::new("turbine_id".into(), turbines).into(),
        Series::new("power_output".into(), power).into(),
    ])
    .unwrap()
}

fn sequence(df: &DataFrame) -> Vec<Option<i64>> {
    df.column("sequence").unwrap().i64().unwrap().into_iter().collect()
}

#[test]
fn flags_values_outside_two_deviations() {
    let mut turbines = vec!["A"; 10];
    let mut power = vec![Some(10.0); 9];
    power.push(Some(50.0));
    turbines.extend(["B", "B"]);
    power.extend([Some(5.0), Some(6.0)]);

    let df = cleaned_frame(turbines, power);
    let report = detect_anomalies(&df).unwrap();

    assert_eq!(sequence(&report.dataset), vec![Some(9)]);
    assert_eq!(
        report.dataset.get_column_names(),
        ["sequence", "turbine_id", "power_output"]
    );
    assert!(report.degenerate_groups.is_empty());
}

#[test]
fn no_anomalies_yields_empty_frame_with_full_schema() {
    let df = cleaned_frame(vec!["A", "A", "A"], vec![Some(1.0), Some(2.0), Some(3.0)]);

    let report = detect_anomalies(&df).unwrap();

    assert_eq!(report.dataset.height(), 0);
    assert_eq!(report.dataset.schema(), df.schema());
}

#[test]
fn single_value_turbine_is_reported_as_degenerate() {
    let df = cleaned_frame(
        vec!["A", "C", "A", "C"],
        vec![Some(1.0), Some(7.0), Some(2.0), None],
    );

    let report = detect_anomalies(&df).unwrap();

    assert_eq!(report.dataset.height(), 0);
    assert_eq!(
        report.degenerate_groups,
        vec![Some(TurbineId::Text("C".to_string()))]
    );
}

#[test]
fn missing_values_are_never_flagged() {
    let mut turbines = vec!["A"; 11];
    turbines.push("A");
    let mut power = vec![Some(10.0); 10];
    power.push(Some(50.0));
    power.push(None);

    let df = cleaned_frame(turbines, power);
    let report = detect_anomalies(&df).unwrap();

    assert_eq!(sequence(&report.dataset), vec![Some(10)]);
}

#[test]
fn flagged_rows_come_out_turbine_by_turbine() {
    let mut turbines = Vec::new();
    let mut power = Vec::new();
    for _ in 0..9 {
        turbines.extend(["B", "A"]);
        power.extend([Some(1.0), Some(1.0)]);
    }
    turbines.extend(["B", "A"]);
    power.extend([Some(-30.0), Some(40.0)]);

    let df = cleaned_frame(turbines, power);
    let report = detect_anomalies(&df).unwrap();

    assert_eq!(sequence(&report.dataset), vec![Some(19), Some(18)]);
}

#[test]
fn band_of_mean_100_and_sigma_10_flags_121_but_not_115() {
    let mut turbines = Vec::new();
    let mut power = Vec::new();
    for _ in 0..500 {
        turbines.extend(["A", "A"]);
        power.extend([Some(90.0), Some(110.0)]);
    }
    turbines.extend(["A"; 4]);
    power.extend([Some(115.0), Some(121.0), Some(85.0), Some(79.0)]);

    let df = cleaned_frame(turbines, power);
    let report = detect_anomalies(&df).unwrap();

    let flagged: Vec<Option<f64>> = report
        .dataset
        .column("power_output")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(flagged, vec![Some(121.0), Some(79.0)]);
}

#[test]
fn float_ids_group_numerically() {
    let mut ids = vec![10.5f64; 10];
    ids.extend([2.5f64; 10]);
    let mut power = vec![Some(1.0); 9];
    power.push(Some(40.0));
    power.extend(vec![Some(1.0); 9]);
    power.push(Some(-30.0));

    let df = DataFrame::new(vec![
        Series::new("turbine_id".into(), ids).into(),
        Series::new("power_output".into(), power).into(),
    ])
    .unwrap();
    let report = detect_anomalies(&df).unwrap();

    let flagged = report.dataset.column("turbine_id").unwrap().f64().unwrap();
    assert_eq!(flagged.into_iter().collect::<Vec<_>>(), vec![Some(2.5), Some(10.5)]);
}
