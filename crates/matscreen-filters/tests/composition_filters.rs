use std::sync::Arc;

use matscreen_core::batch::{BatchExecutor, WorkerPool};
use matscreen_core::errors::StepError;
use matscreen_core::model::{ArtifactId, Record, RecordCollection};
use matscreen_core::step::{Step, StepContext};
use matscreen_filters::registry::{default_registry, FilterSettings};
use matscreen_filters::steps::composition_filters;
use serde_json::json;

fn material(id: &str, formula: &str, n_elements: u64) -> Record {
    Record::try_from(json!({"MaterialId": id, "Reduced Formula": formula, "NElements": n_elements})).unwrap()
}

fn dataset() -> RecordCollection {
    RecordCollection::from(vec![material("m-1", "Fe2O3", 2),
                                material("m-2", "CH4", 2),
                                material("m-3", "NaCl", 2),
                                material("m-4", "Ti3C2", 2),
                                material("m-5", "CeO2", 2),
                                material("m-6", "UO2", 2),
                                material("m-7", "Ni3Al", 2),
                                material("m-8", "LiCuO2", 3),
                                material("m-9", "K2NiF4", 3),
                                material("m-10", "Li8N", 2),
                                material("m-11", "BaTiSiO5", 4)])
}

fn kept_ids(filter_name: &str) -> Vec<String> {
    let filter = composition_filters().into_iter()
                                      .find(|f| f.name() == filter_name)
                                      .unwrap_or_else(|| panic!("filter {filter_name} exists"));
    let previous = ArtifactId::checkpoint(0, "Database");
    let target = ArtifactId::checkpoint(1, filter_name);
    let ctx = StepContext { chain_id: "test", position: 0, previous: &previous, target: &target };
    let out = filter.run(dataset(), &ctx).expect("filter runs");
    assert!(out.failures.is_empty());
    out.records.iter().map(|r| r.get_str("MaterialId").unwrap().to_string()).collect()
}

#[test]
fn element_count_filters() {
    assert_eq!(kept_ids("BinaryComp").len(), 8);
    assert_eq!(kept_ids("Contains3orLessElem").len(), 10);
}

#[test]
fn membership_filters() {
    assert_eq!(kept_ids("Inorganic").len(), 10, "only CH4 is organic");
    assert_eq!(kept_ids("ContainsOxygen"), vec!["m-1", "m-5", "m-6", "m-8", "m-11"]);
    assert_eq!(kept_ids("ContainsHalogen"), vec!["m-3", "m-9"]);
    assert_eq!(kept_ids("Cu_or_Ni"), vec!["m-7", "m-8", "m-9"]);
    assert_eq!(kept_ids("ContainsCorN"), vec!["m-2", "m-4", "m-10"]);
}

#[test]
fn block_filters() {
    assert_eq!(kept_ids("ContainsFBlock"), vec!["m-5", "m-6"]);
    assert_eq!(kept_ids("AntiFBlock").len(), 9);
    assert!(!kept_ids("AntiActinide").contains(&"m-6".to_string()));
    assert!(kept_ids("AntiActinide").contains(&"m-5".to_string()));
    assert_eq!(kept_ids("ContainsTM"), vec!["m-1", "m-4", "m-7", "m-8", "m-9", "m-11"]);
    assert_eq!(kept_ids("ContainsTMorF"), vec!["m-1", "m-4", "m-5", "m-6", "m-7", "m-8", "m-9", "m-11"]);
}

#[test]
fn metal_and_ratio_filters() {
    assert!(!kept_ids("ContainsMetal").contains(&"m-2".to_string()));
    assert!(!kept_ids("RemoveIntermetallics").contains(&"m-7".to_string()));
    assert!(kept_ids("RemoveIntermetallics").contains(&"m-1".to_string()));
    assert_eq!(kept_ids("MXeneRatio"), vec!["m-4"]);
    assert!(!kept_ids("7to1Ratio").contains(&"m-10".to_string()));
}

#[test]
fn missing_formula_stops_the_filter() {
    let filter = composition_filters().into_iter().find(|f| f.name() == "ContainsOxygen").unwrap();
    let previous = ArtifactId::checkpoint(0, "Database");
    let target = ArtifactId::checkpoint(1, "ContainsOxygen");
    let ctx = StepContext { chain_id: "test", position: 0, previous: &previous, target: &target };
    let input = RecordCollection::from(vec![Record::try_from(json!({"MaterialId": "m-1"})).unwrap()]);
    let err = filter.run(input, &ctx).unwrap_err();
    assert!(matches!(err, StepError::MissingField(ref f) if f == "Reduced Formula"), "got {err}");
}

#[test]
fn default_registry_lists_every_step() {
    let settings = FilterSettings { executor: BatchExecutor::with_pool(Arc::new(WorkerPool::new(1).unwrap())),
                                    search_dir: "search".into(),
                                    structures_dir: "by_id".into(),
                                    batch_size: 10 };
    let registry = default_registry(&settings).expect("no duplicate names");
    assert_eq!(registry.len(), 18);
    for name in ["Inorganic", "7to1Ratio", "PutStructuresIntoDB", "GetStructures"] {
        assert!(registry.contains(name), "{name} registered");
    }
}
