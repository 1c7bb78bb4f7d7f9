// ==========================================
// 高校建筑面积缺口测算系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 按生均面积标准测算高校各类用房的应配面积与缺口
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 学校类型解析与缺口测算（纯函数）
pub mod engine;

// 导入层 - 填报文件 / JSON
pub mod importer;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 运行参数
pub mod config;

// 报表层 - CSV 导出
pub mod report;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AreaCategory, CalcType, DegreeTier};

// 领域实体
pub use domain::{GapReport, SchoolInput, SchoolRecord, SchoolSubmission, SpecialSubsidy};

// 引擎
pub use engine::{calculate_building_area_gap, CalcError, CategoryResolver, GapCalculator};

// API
pub use api::{ReportApi, SchoolApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "高校建筑面积缺口测算系统";
