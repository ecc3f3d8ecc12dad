use std::fs;
use std::path::Path;
use std::sync::Arc;

use matscreen::{run_search, AppError, SearchConfig, SearchRequest};
use matscreen_core::batch::{BatchExecutor, WorkerPool};
use matscreen_core::errors::CoreEngineError;
use serde_json::json;
use tempfile::TempDir;

fn executor() -> BatchExecutor {
    BatchExecutor::with_pool(Arc::new(WorkerPool::new(2).unwrap()))
}

fn config(root: &Path) -> SearchConfig {
    let mut cfg = SearchConfig::default();
    cfg.store.search_root = root.to_path_buf();
    cfg
}

fn request(source: &Path, filters: &[&str]) -> SearchRequest {
    SearchRequest { search: "Oxides".into(),
                    source: source.to_path_buf(),
                    filters: filters.iter().map(|f| f.to_string()).collect() }
}

fn write_json_source(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("gnome.json");
    let records = json!([
        {"MaterialId": "m-1", "Reduced Formula": "Fe2O3", "NElements": 2},
        {"MaterialId": "m-2", "Reduced Formula": "LiCoO2", "NElements": 3},
        {"MaterialId": "m-3", "Reduced Formula": "NaCl", "NElements": 2},
        {"MaterialId": "m-4", "Reduced Formula": "ZnO", "NElements": 2}
    ]);
    fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();
    path
}

#[test]
fn search_writes_checkpoints_log_and_exports() {
    let tmp = TempDir::new().unwrap();
    let source = write_json_source(tmp.path());
    let cfg = config(tmp.path());

    let report = run_search(&cfg, &request(&source, &["ContainsOxygen", "BinaryComp"]), executor()).unwrap();
    assert_eq!(report.executed(), 2);

    let search = tmp.path().join("Oxides");
    for file in ["0_Database.json", "1_ContainsOxygen.json", "2_BinaryComp.json", "2_BinaryComp.csv"] {
        assert!(search.join(file).is_file(), "{file} written");
    }
    let log = fs::read_to_string(search.join("SearchLog.txt")).unwrap();
    assert_eq!(log.lines().collect::<Vec<_>>(), vec!["Database: 4", "ContainsOxygen: 3", "BinaryComp: 2"]);
}

#[test]
fn rerunning_a_search_skips_finished_positions() {
    let tmp = TempDir::new().unwrap();
    let source = write_json_source(tmp.path());
    let cfg = config(tmp.path());
    let req = request(&source, &["ContainsOxygen", "BinaryComp"]);

    run_search(&cfg, &req, executor()).unwrap();
    let again = run_search(&cfg, &req, executor()).unwrap();
    assert_eq!(again.executed(), 0);
    assert_eq!(again.skipped(), 2);
}

#[test]
fn csv_sources_get_element_counts() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("gnome.csv");
    fs::write(&source,
              "MaterialId,Reduced Formula,Elements\n\
               m-1,Fe2O3,\"['Fe', 'O']\"\n\
               m-2,LiCoO2,\"['Li', 'Co', 'O']\"\n\
               m-3,NaCl,\"['Na', 'Cl']\"\n").unwrap();
    let mut cfg = config(tmp.path());
    cfg.store.export = false;

    let report = run_search(&cfg, &request(&source, &["BinaryComp"]), executor()).unwrap();
    assert_eq!(report.executed(), 1);
    let search = tmp.path().join("Oxides");
    assert!(!search.join("1_BinaryComp.csv").exists());
    let log = fs::read_to_string(search.join("SearchLog.txt")).unwrap();
    assert_eq!(log.lines().last(), Some("BinaryComp: 2"));
}

#[test]
fn unknown_filter_is_a_usage_error() {
    let tmp = TempDir::new().unwrap();
    let source = write_json_source(tmp.path());
    let err = run_search(&config(tmp.path()), &request(&source, &["ContainsUnobtainium"]), executor()).unwrap_err();
    assert!(matches!(err, AppError::Engine(CoreEngineError::UnknownStep(ref s)) if s == "ContainsUnobtainium"));
    assert_eq!(err.exit_code(), 2);
}
