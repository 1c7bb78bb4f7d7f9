// ==========================================
// 高校建筑面积缺口测算系统 - 命令行入口
// ==========================================
// 数据库路径: --db > 环境变量 CAMPUS_AREA_GAP_DB_PATH > 用户数据目录
// 命令输出为 JSON（stdout），日志写到 stderr
// ==========================================

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use campus_area_gap::api::parse_year_filter;
use campus_area_gap::app::{get_default_db_path, AppState};
use campus_area_gap::{logging, APP_NAME, VERSION};

/// 高校建筑面积缺口测算系统
#[derive(Parser)]
#[command(name = "campus-area-gap")]
#[command(about = "按生均面积标准测算高校各类用房的应配面积与缺口")]
#[command(version)]
struct Cli {
    /// 数据库文件路径
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 在线测算（JSON 字符串或 @文件路径）
    Calculate {
        request: String,
        /// 测算后保存
        #[arg(long)]
        save: bool,
    },
    /// 导入 CSV/Excel 填报文件
    Import {
        file: PathBuf,
        /// 逐行保存成功测算的学校
        #[arg(long)]
        save: bool,
    },
    /// 历史记录
    History {
        /// 年份，all 表示全部
        year: Option<String>,
    },
    /// 某校历史记录
    School {
        name: String,
        #[arg(default_value_t = 50)]
        limit: usize,
    },
    /// 每校每年最新记录
    Latest { year: Option<String> },
    /// 记录详情
    Record { id: i64 },
    /// 已有年份
    Years,
    /// 统计概览
    Stats { year: Option<String> },
    /// 删除记录
    Delete { id: i64 },
    /// 清空全部数据
    Clear,
    /// 批量导出（每校每年最新记录）
    Export {
        /// 年份，all 表示全部
        #[arg(default_value = "all")]
        year: String,
        /// 学校类型，all 表示全部
        school_type: Option<String>,
    },
    /// 导出单条记录
    ExportRecord { id: i64 },
    /// 配置管理
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    List,
    Get { key: String },
    Set { key: String, value: String },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    tracing::info!("{} {}", APP_NAME, VERSION);

    let db_path = cli.db.clone().unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    run(&state, cli.command)
}

fn run(state: &AppState, command: Commands) -> Result<()> {
    let school_api = &state.school_api;
    let report_api = &state.report_api;

    match command {
        Commands::Calculate { request, save } => {
            let request = read_request(&request)?;
            let (school_data, subsidies) = split_request(&request);
            let response = if save {
                school_api.calculate_and_save(school_data, subsidies)?
            } else {
                school_api.calculate(school_data, subsidies)?
            };
            print_json(&response)
        }
        Commands::Import { file, save } => print_json(&school_api.import_file(&file, save)?),
        Commands::History { year } => print_json(&school_api.list_history(year_arg(year)?)?),
        Commands::School { name, limit } => print_json(&school_api.school_history(&name, limit)?),
        Commands::Latest { year } => print_json(&school_api.list_latest(year_arg(year)?, None)?),
        Commands::Record { id } => print_json(&school_api.get_record(id)?),
        Commands::Years => print_json(&school_api.list_years()?),
        Commands::Stats { year } => print_json(&school_api.get_statistics(year_arg(year)?)?),
        Commands::Delete { id } => {
            school_api.delete_record(id)?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        Commands::Clear => {
            let removed = school_api.clear_all()?;
            print_json(&serde_json::json!({ "removed": removed }))
        }
        Commands::Export { year, school_type } => {
            let year = parse_year_filter(&year)?;
            print_json(&report_api.export_batch(year, school_type.as_deref())?)
        }
        Commands::ExportRecord { id } => print_json(&report_api.export_record(id)?),
        Commands::Config { action } => {
            let config = &state.config_manager;
            match action {
                ConfigAction::List => print_json(&config.list()?),
                ConfigAction::Get { key } => print_json(&config.get(&key)?),
                ConfigAction::Set { key, value } => {
                    config.set(&key, &value)?;
                    print_json(&serde_json::json!({ "key": key, "value": value }))
                }
            }
        }
    }
}

fn year_arg(value: Option<String>) -> Result<Option<i32>> {
    match value {
        Some(v) => Ok(parse_year_filter(&v)?),
        None => Ok(None),
    }
}

/// `@路径` 从文件读取，否则按 JSON 字符串解析
fn read_request(raw: &str) -> Result<Value> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("无法读取文件: {}", path))?,
        None => raw.to_string(),
    };
    serde_json::from_str(&text).context("测算数据不是合法的 JSON")
}

/// 请求可以是 `{schoolData, specialSubsidies}`，也可以直接是学校数据
fn split_request(request: &Value) -> (&Value, Option<&Value>) {
    match request.get("schoolData") {
        Some(school_data) => (school_data, request.get("specialSubsidies")),
        None => (request, None),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_defaults() {
        let cli = Cli::parse_from(["campus-area-gap", "export"]);
        match cli.command {
            Commands::Export { year, school_type } => {
                assert_eq!(year, "all");
                assert_eq!(school_type, None);
            }
            _ => panic!("Expected Export"),
        }
    }

    #[test]
    fn test_split_request_wrapped() {
        let request = serde_json::json!({
            "schoolData": { "学校名称": "测试大学" },
            "specialSubsidies": [{ "特殊用房补助名称": "实验楼", "补助面积（m²）": 100 }]
        });
        let (school, subsidies) = split_request(&request);
        assert_eq!(school["学校名称"], "测试大学");
        assert!(subsidies.is_some());
    }

    #[test]
    fn test_split_request_plain() {
        let request = serde_json::json!({ "学校名称": "测试大学" });
        let (school, subsidies) = split_request(&request);
        assert_eq!(school["学校名称"], "测试大学");
        assert!(subsidies.is_none());
    }
}
