//! Feature pipeline behaviour: encoding, column order, unseen categories, missing fields.

mod common;

use cvd_risk::features::{
    feature_names, CategoricalColumn, FeatureColumn, FeatureError, FeaturePipeline, LabeledTable,
    NumericColumn, RawRecord, FEATURE_DIM, UNSEEN_CATEGORY_CODE,
};

fn fitted(table: &LabeledTable) -> FeaturePipeline {
    let mut pipeline = FeaturePipeline::new();
    pipeline.fit_transform(table).unwrap();
    pipeline
}

fn gender_table() -> LabeledTable {
    let base = common::synthetic_table(3, 7);
    let records = base
        .records
        .into_iter()
        .zip(["Male", "Female", "Male"])
        .map(|(mut r, g)| {
            r.gender = Some(g.to_string());
            r
        })
        .collect();
    LabeledTable::new(records, vec![0, 1, 0])
}

#[test]
fn gender_codes_are_distinct_and_stable() {
    let table = gender_table();
    let pipeline = fitted(&table);
    let encoder = pipeline.encoder(CategoricalColumn::Gender).unwrap();
    let male = encoder.encode("Male").unwrap();
    let female = encoder.encode("Female").unwrap();
    assert_ne!(male, female);

    let mut query = table.records[1].clone();
    query.gender = Some("Male".to_string());
    let encoded = pipeline.encode(&query).unwrap();
    let gender = FeatureColumn::Encoded(CategoricalColumn::Gender);
    assert_eq!(encoded.get(gender), male as f64);
    assert_eq!(
        encoded.get(gender),
        pipeline.encode(&table.records[0]).unwrap().get(gender)
    );
}

#[test]
fn unseen_borough_encodes_as_zero() {
    let mut table = common::synthetic_table(4, 11);
    for (r, b) in table.records.iter_mut().zip(["Camden", "Hackney", "Camden", "Hackney"]) {
        r.borough = Some(b.to_string());
    }
    let pipeline = fitted(&table);

    let mut query = table.records[0].clone();
    query.borough = Some("Mars".to_string());
    let encoded = pipeline.encode(&query).unwrap();
    assert_eq!(
        encoded.get(FeatureColumn::Encoded(CategoricalColumn::Borough)),
        UNSEEN_CATEGORY_CODE as f64
    );
    assert!(pipeline.transform(&query).is_ok());
}

#[test]
fn missing_field_is_named() {
    let table = common::synthetic_table(20, 3);
    let pipeline = fitted(&table);

    let mut query = table.records[0].clone();
    query.systolic_bp = None;
    assert_eq!(
        pipeline.transform(&query),
        Err(FeatureError::MissingField {
            field: "SystolicBP"
        })
    );

    let mut query = table.records[0].clone();
    query.stress_level = None;
    match pipeline.transform(&query) {
        Err(e) => assert!(e.to_string().contains("StressLevel")),
        Ok(_) => panic!("transform accepted a record without StressLevel"),
    }
}

#[test]
fn transform_is_deterministic() {
    let table = common::synthetic_table(50, 5);
    let pipeline = fitted(&table);
    let a = pipeline.transform(&table.records[7]).unwrap();
    let b = pipeline.transform(&table.records[7]).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), FEATURE_DIM);
}

#[test]
fn column_order_ignores_input_key_order() {
    let table = common::synthetic_table(30, 9);
    let pipeline = fitted(&table);
    let record = &table.records[3];

    // Same record parsed from a JSON object with its keys reversed.
    let value = serde_json::to_value(record).unwrap();
    let fields: Vec<String> = value
        .as_object()
        .unwrap()
        .iter()
        .rev()
        .map(|(k, v)| format!("{:?}:{}", k, v))
        .collect();
    let shuffled: RawRecord = serde_json::from_str(&format!("{{{}}}", fields.join(","))).unwrap();

    let a = pipeline.transform(record).unwrap();
    let b = pipeline.transform(&shuffled).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.get(FeatureColumn::Numeric(NumericColumn::Age)),
        a.as_slice()[0]
    );
    assert_eq!(feature_names()[0], "Age");
    assert_eq!(feature_names()[9], "Borough_encoded");
    assert_eq!(feature_names()[20], "UrbanHeatIncrease");
}

#[test]
fn unfitted_pipeline_refuses_to_transform() {
    let pipeline = FeaturePipeline::new();
    let record = common::synthetic_table(1, 1).records.remove(0);
    assert_eq!(pipeline.transform(&record), Err(FeatureError::NotFitted));
}

#[test]
fn empty_and_mismatched_tables_rejected() {
    let mut pipeline = FeaturePipeline::new();
    assert_eq!(
        pipeline.fit_transform(&LabeledTable::default()).unwrap_err(),
        FeatureError::EmptyTable
    );
    let mut table = common::synthetic_table(3, 2);
    table.labels.pop();
    assert_eq!(
        pipeline.fit_transform(&table).unwrap_err(),
        FeatureError::LabelMismatch {
            records: 3,
            labels: 2
        }
    );
    assert!(!pipeline.is_fitted());
}

#[test]
fn refit_replaces_state() {
    let mut pipeline = fitted(&common::synthetic_table(40, 1));
    let before = pipeline.clone();
    pipeline.fit_transform(&common::synthetic_table(40, 2)).unwrap();
    assert_ne!(before, pipeline);
}

#[test]
fn table_gaps_use_training_medians() {
    let mut table = common::synthetic_table(5, 13);
    table.records[2].bmi = None;
    table.records[4].gender = None;
    let mut pipeline = FeaturePipeline::new();
    let (x, y) = pipeline.fit_transform(&table).unwrap();
    assert_eq!(x.dim(), (5, FEATURE_DIM));
    assert_eq!(y, table.labels);

    let mut present: Vec<f64> = table.records.iter().filter_map(|r| r.bmi).collect();
    present.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let expected = (present[1] + present[2]) / 2.0;
    assert_eq!(pipeline.median(NumericColumn::Bmi), Some(expected));

    let gender = pipeline.encoder(CategoricalColumn::Gender).unwrap();
    assert!(gender.classes().iter().any(|c| c == "nan"));
}

#[test]
fn scaled_training_columns_are_centred() {
    let table = common::synthetic_table(100, 21);
    let mut pipeline = FeaturePipeline::new();
    let (x, _) = pipeline.fit_transform(&table).unwrap();
    for col in x.columns() {
        let mean = col.sum() / col.len() as f64;
        assert!(mean.abs() < 1e-9);
    }
}
