// ==========================================
// 高校建筑面积缺口测算系统 - 导入层
// ==========================================
// 职责: 填报文件 / JSON → SchoolSubmission
// 支持: Excel, CSV, JSON
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod school_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{parse_lenient, parse_subsidy_details, FieldMapper};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use school_importer::{ImportFailure, ImportSummary, ImportedSchool, SchoolImporter};
