//! Integration tests for parameter persistence through the JSON store.

use agrovar_rs::params::{
    DomainClass, JsonParametersStore, ParameterIo, ParameterKey, ParameterRecord, ParametersSet,
    PropertyTable, SetDescriptor, ValuesWriter,
};
use agrovar_rs::value::{Value, ValueType};
use agrovar_rs::variable::Variable;

#[derive(Default, Debug, Clone, PartialEq)]
struct CropParameters {
    yield_max: Option<f64>,
    layer_depths: Option<Vec<f64>>,
    sowing_window: Option<Vec<chrono::NaiveDate>>,
}

impl DomainClass for CropParameters {
    fn property_table() -> PropertyTable<Self> {
        PropertyTable::builder()
            .property(
                "YieldMax",
                ValueType::Double,
                |c: &CropParameters| c.yield_max.map(Value::Double),
                |c, v| {
                    if let Value::Double(d) = v {
                        c.yield_max = Some(d);
                    }
                },
            )
            .property(
                "LayerDepths",
                ValueType::ArrayDouble,
                |c| c.layer_depths.clone().map(Value::ArrayDouble),
                |c, v| {
                    if let Value::ArrayDouble(l) = v {
                        c.layer_depths = Some(l);
                    }
                },
            )
            .property(
                "SowingWindow",
                ValueType::ArrayDate,
                |c| c.sowing_window.clone().map(Value::ArrayDate),
                |c, v| {
                    if let Value::ArrayDate(w) = v {
                        c.sowing_window = Some(w);
                    }
                },
            )
            .build()
    }
}

fn definitions() -> Vec<Variable> {
    let mut yield_max = Variable::new("YieldMax");
    yield_max.set_value_type(ValueType::Double).unwrap();
    yield_max.set_bounds(0.0, 100.0);
    yield_max.set_units("t/ha");

    let mut layer_depths = Variable::new("LayerDepths");
    layer_depths.parse_value_type("double[3]").unwrap();

    let mut sowing_window = Variable::new("SowingWindow");
    sowing_window.parse_value_type("Date[2]").unwrap();

    vec![yield_max, layer_depths, sowing_window]
}

fn seeded_store(dir: &tempfile::TempDir) -> JsonParametersStore {
    let path = dir.path().join("crop_parameters.json");
    let descriptor = SetDescriptor {
        component: "CropGrowth".to_string(),
        model: "Wofost".to_string(),
        key_type: "Crop".to_string(),
        url: String::new(),
        description: "Crop parameters".to_string(),
    };
    let mut set = ParametersSet::new(descriptor, definitions());
    let mut record = ParameterRecord::new(ParameterKey::new(1, "wheat", "Winter wheat"));
    let values = record.values.as_mut().unwrap();
    values.insert("YieldMax".to_string(), vec!["8.5".to_string()]);
    values.insert(
        "LayerDepths".to_string(),
        vec!["0.1".to_string(), "0.3".to_string(), "0.6".to_string()],
    );
    values.insert(
        "SowingWindow".to_string(),
        vec!["2021-10-01".to_string(), "2021-11-15".to_string()],
    );
    set.records.push(record);

    let mut store = JsonParametersStore::new(&path);
    store.write_values(&set).unwrap();
    store
}

fn wheat_target() -> CropParameters {
    CropParameters {
        yield_max: Some(8.5),
        layer_depths: Some(vec![0.1, 0.3, 0.6]),
        sowing_window: Some(vec![
            chrono::NaiveDate::from_ymd_opt(2021, 10, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2021, 11, 15).unwrap(),
        ]),
    }
}

#[test]
fn load_fills_every_property() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir);
    let mut io = ParameterIo::new(store.clone(), store);

    let mut target = CropParameters::default();
    let warnings = io.load(&mut target, "wheat").unwrap();
    assert!(warnings.is_empty());
    assert_eq!(target, wheat_target());
}

#[test]
fn save_then_load_restores_property_values() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir);
    let mut io = ParameterIo::new(store.clone(), store);

    let mut modified = wheat_target();
    modified.yield_max = Some(12.5);
    modified.layer_depths = Some(vec![0.2, 0.4, 0.8]);

    let warning = io.save(&modified, "wheat").unwrap();
    assert!(warning.unwrap().contains("Overwriting"));

    let mut reloaded = CropParameters::default();
    io.load(&mut reloaded, "wheat").unwrap();
    assert_eq!(reloaded, modified);
}

#[test]
fn saving_a_new_key_preserves_other_records() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir);
    let mut io = ParameterIo::new(store.clone(), store);

    let maize = CropParameters {
        yield_max: Some(14.0),
        layer_depths: Some(vec![0.2, 0.5, 1.0]),
        sowing_window: Some(vec![
            chrono::NaiveDate::from_ymd_opt(2021, 4, 10).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2021, 5, 20).unwrap(),
        ]),
    };
    let warning = io.save(&maize, "maize").unwrap();
    assert!(warning.is_none());
    assert_eq!(io.current_set().unwrap().record("maize").unwrap().key.id, 2);

    // The wheat record is untouched
    let mut wheat = CropParameters::default();
    io.load(&mut wheat, "wheat").unwrap();
    assert_eq!(wheat, wheat_target());
}

#[test]
fn loading_a_missing_key_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir);
    let mut io = ParameterIo::new(store.clone(), store);

    let mut target = CropParameters::default();
    let err = io.load(&mut target, "barley").unwrap_err();
    assert!(err.to_string().contains("barley"));
}

#[test]
fn schema_drift_is_tolerated_and_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir);

    // Add a variable the target no longer declares
    let mut set = {
        use agrovar_rs::params::ValuesReader;
        store.read_values().unwrap()
    };
    let mut retired = Variable::new("RetiredParameter");
    retired.set_value_type(ValueType::Double).unwrap();
    set.parameters.push(retired);
    set.record_mut("wheat")
        .unwrap()
        .values
        .as_mut()
        .unwrap()
        .insert("RetiredParameter".to_string(), vec!["1.0".to_string()]);
    let mut writer = store.clone();
    writer.write_values(&set).unwrap();

    let mut io = ParameterIo::new(store.clone(), store);
    let mut target = CropParameters::default();
    let warnings = io.load(&mut target, "wheat").unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("RetiredParameter"));
    assert_eq!(target.yield_max, Some(8.5));
}

#[test]
fn populate_cloned_copy_deep_copies_values() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir);
    let io: ParameterIo<CropParameters> = ParameterIo::new(store.clone(), store);

    let source = wheat_target();
    let mut copy = CropParameters::default();
    io.populate_cloned_copy(&source, &mut copy);
    assert_eq!(copy, source);
}
