// ==========================================
// 高校建筑面积缺口测算系统 - 报表层
// ==========================================
// 职责: 单校测算结果表、批量导出（明细/汇总/类型分析）
// 输出: 带 BOM 的 UTF-8 CSV，每个工作表一个文件
// ==========================================

pub mod batch_export;
pub mod calc_sheet;
pub mod error;
pub mod writer;

pub use batch_export::{BatchExport, BatchFilter, BatchSummary, TypeAnalysis};
pub use calc_sheet::CalculationSheet;
pub use error::{ReportError, ReportResult};
pub use writer::ReportWriter;

/// 一张工作表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn push<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn blank(&mut self) {
        self.rows.push(Vec::new());
    }

    /// 按首列查找行
    pub fn find_row(&self, first_cell: &str) -> Option<&[String]> {
        self.rows
            .iter()
            .find(|r| r.first().map(String::as_str) == Some(first_cell))
            .map(Vec::as_slice)
    }
}

/// 数值格式化: 整数不带小数点
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// 保留两位小数（四舍五入）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
