// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 配置读写、默认值与持久化
// ==========================================


use std::path::PathBuf;

use campus_area_gap::config::{config_keys, ConfigManager};
use campus_area_gap::repository::RepositoryError;
use test_helpers::create_test_db;

#[test]
fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[test]
fn test_defaults_when_unset() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();

    assert_eq!(config.get_report_title().unwrap(), "高校建筑规模测算结果");
    assert!(config.list().unwrap().is_empty());
}

#[test]
fn test_values_persist_across_instances() {
    let (_temp_file, db_path) = create_test_db().unwrap();

    {
        let config = ConfigManager::new(&db_path).unwrap();
        config.set(config_keys::REPORT_TITLE, "2025年测算").unwrap();
        config.set(config_keys::EXPORT_DIR, "/tmp/area-reports").unwrap();
    }

    let config = ConfigManager::new(&db_path).unwrap();
    assert_eq!(config.get_report_title().unwrap(), "2025年测算");
    assert_eq!(
        config.get(config_keys::EXPORT_DIR).unwrap(),
        Some("/tmp/area-reports".to_string())
    );

    let all = config.list().unwrap();
    assert_eq!(all.len(), 2);

    let snapshot: serde_json::Value =
        serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot[config_keys::REPORT_TITLE], "2025年测算");
}

#[test]
fn test_blank_title_falls_back_to_default() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();

    config.set(config_keys::REPORT_TITLE, "   ").unwrap();
    assert_eq!(config.get_report_title().unwrap(), "高校建筑规模测算结果");
}

#[test]
fn test_export_dir_from_config() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();

    // 未设置环境变量时读取配置
    if std::env::var("CAMPUS_AREA_GAP_EXPORT_DIR").is_err() {
        assert_eq!(config.get_export_dir().unwrap(), PathBuf::from("output"));
        config.set(config_keys::EXPORT_DIR, "reports").unwrap();
        assert_eq!(config.get_export_dir().unwrap(), PathBuf::from("reports"));
    }
}

#[test]
fn test_empty_key_rejected() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();

    let err = config.set("", "value").unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError(_)));
}
