// ==========================================
// 高校建筑面积缺口测算系统 - 字段映射器
// ==========================================
// 职责: 中文填报字段（表格行 / JSON 对象）→ SchoolSubmission
// 约定: 数值字段宽松解析，空值/无法解析视为缺失（测算时按 0）
// ==========================================

use crate::domain::record::SchoolSubmission;
use crate::domain::school::{SchoolInput, SpecialSubsidy};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use serde_json::Value;
use std::collections::HashMap;

// ==========================================
// 字段名常量
// ==========================================
pub mod field_keys {
    pub const SCHOOL_NAME: &str = "学校名称";
    pub const SCHOOL_TYPE: &str = "学校类型";
    pub const YEAR: &str = "年份";
    pub const TOTAL_STUDENTS: &str = "学生总人数";
    pub const FULL_TIME_UNDERGRAD: &str = "全日制本专科生人数";
    pub const FULL_TIME_MASTER: &str = "全日制硕士生人数";
    pub const FULL_TIME_DOCTOR: &str = "全日制博士生人数";
    pub const INTL_UNDERGRAD: &str = "留学生本科生人数";
    pub const INTL_MASTER: &str = "留学生硕士生人数";
    pub const INTL_DOCTOR: &str = "留学生博士生人数";
    pub const TEACHING_AREA: &str = "现有教学及辅助用房面积";
    pub const OFFICE_AREA: &str = "现有办公用房面积";
    pub const TOTAL_LIVING_AREA: &str = "现有生活用房总面积";
    pub const DORMITORY_AREA: &str = "现有学生宿舍面积";
    pub const LOGISTICS_AREA: &str = "现有后勤辅助用房面积";
    pub const REMARKS: &str = "备注";
    pub const SUBSIDY_DETAILS: &str = "特殊补助明细";

    pub const SUBSIDY_NAME: &str = "特殊用房补助名称";
    pub const SUBSIDY_AREA: &str = "补助面积（m²）";
}

use field_keys::*;

/// 列名别名（批量导出表头、旧版模板）
fn aliases(key: &str) -> &'static [&'static str] {
    match key {
        YEAR => &["年份", "统计年份", "测算年份"],
        FULL_TIME_UNDERGRAD => &["全日制本专科生人数", "全日制本科生", "本专科生人数"],
        FULL_TIME_MASTER => &["全日制硕士生人数", "全日制硕士生", "硕士研究生人数"],
        FULL_TIME_DOCTOR => &["全日制博士生人数", "全日制博士生", "博士研究生人数"],
        INTL_UNDERGRAD => &["留学生本科生人数", "留学生本科生"],
        INTL_MASTER => &["留学生硕士生人数", "留学生硕士生"],
        INTL_DOCTOR => &["留学生博士生人数", "留学生博士生"],
        SCHOOL_NAME => &["学校名称"],
        SCHOOL_TYPE => &["学校类型"],
        TOTAL_STUDENTS => &["学生总人数"],
        TEACHING_AREA => &["现有教学及辅助用房面积"],
        OFFICE_AREA => &["现有办公用房面积"],
        TOTAL_LIVING_AREA => &["现有生活用房总面积"],
        DORMITORY_AREA => &["现有学生宿舍面积"],
        LOGISTICS_AREA => &["现有后勤辅助用房面积"],
        REMARKS => &["备注"],
        SUBSIDY_DETAILS => &["特殊补助明细"],
        _ => &[],
    }
}

// ==========================================
// FieldMapper
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMapper;

impl FieldMapper {
    /// 表格行 → 填报数据
    ///
    /// `row_number` 为表格中的行号（表头为第 1 行），仅用于错误信息。
    pub fn map_row(&self, row: &RawRow, row_number: usize) -> ImportResult<SchoolSubmission> {
        let school_name = self.get_string(row, SCHOOL_NAME).ok_or_else(|| {
            ImportError::InvalidRecord(format!("第{}行缺少学校名称", row_number))
        })?;

        let mut submission = self.map_fields(row, school_name);

        if let Some(details) = self.get_string(row, SUBSIDY_DETAILS) {
            submission.subsidies = parse_subsidy_details(&details).map_err(|e| match e {
                ImportError::InvalidSubsidyEntry { index, message } => {
                    ImportError::TypeConversionError {
                        row: row_number,
                        field: SUBSIDY_DETAILS.to_string(),
                        message: format!("第{}项: {}", index, message),
                    }
                }
                other => other,
            })?;
        }

        Ok(submission)
    }

    /// JSON 对象 → 填报数据（不含特殊补助）
    pub fn map_json(&self, value: &Value) -> ImportResult<SchoolSubmission> {
        let object = value
            .as_object()
            .ok_or_else(|| ImportError::InvalidRecord("缺少学校数据".to_string()))?;

        let mut row: RawRow = HashMap::new();
        for (key, v) in object {
            let text = match v {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                _ => continue,
            };
            row.insert(key.clone(), text);
        }

        let school_name = self.get_string(&row, SCHOOL_NAME).unwrap_or_default();
        Ok(self.map_fields(&row, school_name))
    }

    /// JSON 特殊补助数组 → 特殊补助列表
    ///
    /// 每项为 `{"特殊用房补助名称": .., "补助面积（m²）": ..}`，也接受 `name` / `area`。
    /// null 视为无补助；面积缺失按 0；面积为非数值字符串时报错。
    pub fn map_subsidies_json(&self, value: &Value) -> ImportResult<Vec<SpecialSubsidy>> {
        let items = match value {
            Value::Null => return Ok(Vec::new()),
            Value::Array(items) => items,
            _ => {
                return Err(ImportError::InvalidSubsidyList(
                    "特殊补助数据应为数组".to_string(),
                ))
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| map_subsidy_item(idx + 1, item))
            .collect()
    }

    fn map_fields(&self, row: &RawRow, school_name: String) -> SchoolSubmission {
        let input = SchoolInput {
            school_name,
            explicit_category_label: self.get_string(row, SCHOOL_TYPE),
            year: self.parse_year(row),
            total_students: self.parse_f64(row, TOTAL_STUDENTS),
            full_time_undergrad_and_specialist: self.parse_f64(row, FULL_TIME_UNDERGRAD),
            full_time_master: self.parse_f64(row, FULL_TIME_MASTER),
            full_time_doctor: self.parse_f64(row, FULL_TIME_DOCTOR),
            intl_undergrad: self.parse_f64(row, INTL_UNDERGRAD),
            intl_master: self.parse_f64(row, INTL_MASTER),
            intl_doctor: self.parse_f64(row, INTL_DOCTOR),
            existing_teaching_area: self.parse_f64(row, TEACHING_AREA),
            existing_office_area: self.parse_f64(row, OFFICE_AREA),
            existing_total_living_area: self.parse_f64(row, TOTAL_LIVING_AREA),
            existing_dormitory_area: self.parse_f64(row, DORMITORY_AREA),
            existing_logistics_area: self.parse_f64(row, LOGISTICS_AREA),
        };

        SchoolSubmission {
            input,
            subsidies: Vec::new(),
            remarks: self.get_string(row, REMARKS),
        }
    }

    /// 提取字符串字段，依次尝试各别名
    fn get_string(&self, row: &RawRow, key: &str) -> Option<String> {
        aliases(key)
            .iter()
            .filter_map(|alias| row.get(*alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn parse_f64(&self, row: &RawRow, key: &str) -> Option<f64> {
        self.get_string(row, key).and_then(|v| parse_lenient(&v))
    }

    /// 年份: 解析失败或为 0 时视为未填写
    fn parse_year(&self, row: &RawRow) -> Option<i32> {
        self.parse_f64(row, YEAR)
            .map(f64::trunc)
            .filter(|y| *y != 0.0 && y.abs() <= i32::MAX as f64)
            .map(|y| y as i32)
    }
}

fn map_subsidy_item(index: usize, item: &Value) -> ImportResult<SpecialSubsidy> {
    let object = item.as_object().ok_or_else(|| ImportError::InvalidSubsidyEntry {
        index,
        message: "补助项应为对象".to_string(),
    })?;

    let name = [SUBSIDY_NAME, "name"]
        .iter()
        .filter_map(|k| object.get(*k))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| ImportError::InvalidSubsidyEntry {
            index,
            message: "缺少补助名称".to_string(),
        })?;

    let raw_area = [SUBSIDY_AREA, "area"]
        .iter()
        .filter_map(|k| object.get(*k))
        .find(|v| !v.is_null());

    let area = match raw_area {
        None => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) if s.trim().is_empty() => 0.0,
        Some(Value::String(s)) => {
            parse_lenient(s).ok_or_else(|| ImportError::InvalidSubsidyEntry {
                index,
                message: format!("补助面积无法解析: {}", s),
            })?
        }
        Some(other) => {
            return Err(ImportError::InvalidSubsidyEntry {
                index,
                message: format!("补助面积类型不支持: {}", other),
            })
        }
    };

    Ok(SpecialSubsidy::new(name, area))
}

/// 解析导出格式的补助明细: `名称:面积m²; 名称:面积m²`
pub fn parse_subsidy_details(text: &str) -> ImportResult<Vec<SpecialSubsidy>> {
    let text = text.trim();
    if text.is_empty() || text == "无特殊补助" {
        return Ok(Vec::new());
    }

    let mut subsidies = Vec::new();
    for (idx, segment) in text
        .split(|c: char| c == ';' || c == '；')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
    {
        let index = idx + 1;
        let (name, area_text) = segment
            .rsplit_once(|c: char| c == ':' || c == '：')
            .ok_or_else(|| ImportError::InvalidSubsidyEntry {
                index,
                message: format!("缺少分隔符 ':': {}", segment),
            })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ImportError::InvalidSubsidyEntry {
                index,
                message: "缺少补助名称".to_string(),
            });
        }

        let area = parse_lenient(area_text).ok_or_else(|| ImportError::InvalidSubsidyEntry {
            index,
            message: format!("补助面积无法解析: {}", area_text.trim()),
        })?;

        subsidies.push(SpecialSubsidy::new(name, area));
    }

    Ok(subsidies)
}

/// 宽松数值解析: 忽略千分位逗号，取最长的数值前缀（"12000㎡" → 12000）
pub fn parse_lenient(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '，')
        .collect();
    let bytes = cleaned.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if !cleaned[digits_start..end].bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    // 指数部分需完整才计入
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    cleaned[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(parse_lenient("1000"), Some(1000.0));
        assert_eq!(parse_lenient(" 12,950.5 "), Some(12950.5));
        assert_eq!(parse_lenient("12000㎡"), Some(12000.0));
        assert_eq!(parse_lenient("200m²"), Some(200.0));
        assert_eq!(parse_lenient("-3.5"), Some(-3.5));
        assert_eq!(parse_lenient("1e3"), Some(1000.0));
        assert_eq!(parse_lenient("5e"), Some(5.0));
        assert_eq!(parse_lenient(".5"), Some(0.5));
        assert_eq!(parse_lenient("abc"), None);
        assert_eq!(parse_lenient(""), None);
        assert_eq!(parse_lenient("-"), None);
    }

    #[test]
    fn test_map_row_with_aliases() {
        let mapper = FieldMapper;
        let raw = row(&[
            ("学校名称", "上海大学"),
            ("统计年份", "2024"),
            ("学生总人数", "1,000"),
            ("全日制本科生", "900"),
            ("全日制硕士生", "10"),
            ("现有教学及辅助用房面积", "12000"),
            ("现有生活用房总面积", ""),
            ("备注", "  首次填报 "),
        ]);

        let submission = mapper.map_row(&raw, 2).unwrap();
        let input = &submission.input;

        assert_eq!(input.school_name, "上海大学");
        assert_eq!(input.year, Some(2024));
        assert_eq!(input.total_students, Some(1000.0));
        assert_eq!(input.full_time_undergrad_and_specialist, Some(900.0));
        assert_eq!(input.full_time_master, Some(10.0));
        assert_eq!(input.existing_teaching_area, Some(12000.0));
        assert_eq!(input.existing_total_living_area, None);
        assert_eq!(input.explicit_category_label, None);
        assert_eq!(submission.remarks.as_deref(), Some("首次填报"));
        assert!(submission.subsidies.is_empty());
    }

    #[test]
    fn test_map_row_requires_school_name() {
        let err = FieldMapper.map_row(&row(&[("学生总人数", "100")]), 5).unwrap_err();
        assert!(err.to_string().contains("第5行"));
    }

    #[test]
    fn test_map_row_parses_subsidy_details() {
        let raw = row(&[
            ("学校名称", "上海大学"),
            ("特殊补助明细", "实验室补助:200m²; 体育馆补助：80.5m²"),
        ]);
        let submission = FieldMapper.map_row(&raw, 2).unwrap();
        assert_eq!(
            submission.subsidies,
            vec![
                SpecialSubsidy::new("实验室补助", 200.0),
                SpecialSubsidy::new("体育馆补助", 80.5),
            ]
        );

        let none = row(&[("学校名称", "上海大学"), ("特殊补助明细", "无特殊补助")]);
        assert!(FieldMapper.map_row(&none, 3).unwrap().subsidies.is_empty());

        let bad = row(&[("学校名称", "上海大学"), ("特殊补助明细", "实验室补助:很多")]);
        let err = FieldMapper.map_row(&bad, 4).unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { row: 4, .. }));
    }

    #[test]
    fn test_map_json_accepts_numbers_and_strings() {
        let value = json!({
            "学校名称": "上海音乐学院",
            "学校类型": "艺术类",
            "年份": "2023",
            "学生总人数": 100,
            "全日制硕士生人数": "12",
            "现有办公用房面积": 350.5,
            "现有学生宿舍面积": "n/a",
            "其他字段": true
        });

        let submission = FieldMapper.map_json(&value).unwrap();
        let input = &submission.input;

        assert_eq!(input.school_name, "上海音乐学院");
        assert_eq!(input.explicit_category_label.as_deref(), Some("艺术类"));
        assert_eq!(input.year, Some(2023));
        assert_eq!(input.total_students, Some(100.0));
        assert_eq!(input.full_time_master, Some(12.0));
        assert_eq!(input.existing_office_area, Some(350.5));
        assert_eq!(input.existing_dormitory_area, None);
    }

    #[test]
    fn test_map_json_rejects_non_object() {
        let err = FieldMapper.map_json(&json!("上海大学")).unwrap_err();
        assert!(err.to_string().contains("缺少学校数据"));
    }

    #[test]
    fn test_year_zero_treated_as_missing() {
        let submission = FieldMapper.map_json(&json!({"学校名称": "上海大学", "年份": 0})).unwrap();
        assert_eq!(submission.input.year, None);
    }

    #[test]
    fn test_map_subsidies_json() {
        let value = json!([
            {"特殊用房补助名称": "实验室补助", "补助面积（m²）": 200},
            {"特殊用房补助名称": "体育馆补助", "补助面积（m²）": "80.5"},
            {"name": "图书馆补助", "area": null}
        ]);

        let subsidies = FieldMapper.map_subsidies_json(&value).unwrap();
        assert_eq!(
            subsidies,
            vec![
                SpecialSubsidy::new("实验室补助", 200.0),
                SpecialSubsidy::new("体育馆补助", 80.5),
                SpecialSubsidy::new("图书馆补助", 0.0),
            ]
        );

        assert!(FieldMapper.map_subsidies_json(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_map_subsidies_json_errors() {
        let not_object = json!([{"特殊用房补助名称": "实验室补助", "补助面积（m²）": 1}, 42]);
        let err = FieldMapper.map_subsidies_json(&not_object).unwrap_err();
        assert!(matches!(err, ImportError::InvalidSubsidyEntry { index: 2, .. }));

        let bad_area = json!([{"特殊用房补助名称": "实验室补助", "补助面积（m²）": "很多"}]);
        let err = FieldMapper.map_subsidies_json(&bad_area).unwrap_err();
        assert!(matches!(err, ImportError::InvalidSubsidyEntry { index: 1, .. }));

        let not_array = json!({"特殊用房补助名称": "实验室补助"});
        assert!(FieldMapper.map_subsidies_json(&not_array).is_err());
    }
}
