// ==========================================
// 高校建筑面积缺口测算系统 - 批量导出
// ==========================================
// 工作表: 学校详细数据 / 统计汇总 / 学校类型分析
// 数据源: 每校每年最新一次填报
// ==========================================

use crate::domain::record::SchoolRecord;
use crate::domain::types::compliance_label;
use crate::engine::round_half_up;
use crate::report::{format_number, round2, Sheet};
use chrono::NaiveDateTime;
use serde::Serialize;

pub const DETAIL_SHEET_NAME: &str = "学校详细数据";
pub const SUMMARY_SHEET_NAME: &str = "统计汇总";
pub const TYPE_SHEET_NAME: &str = "学校类型分析";

/// 未填写学校类型时的分组名
pub const UNKNOWN_TYPE: &str = "未知";

pub const DETAIL_HEADERS: [&str; 29] = [
    "学校名称",
    "学校类型",
    "统计年份",
    "录入时间",
    "学生总人数",
    "全日制本科生",
    "全日制硕士生",
    "全日制博士生",
    "留学生本科生",
    "留学生硕士生",
    "留学生博士生",
    "现有教学及辅助用房面积",
    "现有办公用房面积",
    "现有学生宿舍面积",
    "现有生活用房总面积",
    "现有后勤辅助用房面积",
    "现有建筑总面积",
    "应配建筑总面积",
    "建筑面积总缺口（不含补助）",
    "建筑面积总缺口（含补助）",
    "特殊补助总面积",
    "特殊补助项目数",
    "特殊补助明细",
    "整体达标情况",
    "教学用房达标情况",
    "办公用房达标情况",
    "学生宿舍达标情况",
    "其他生活用房达标情况",
    "后勤用房达标情况",
];

pub const TYPE_HEADERS: [&str; 12] = [
    "学校类型",
    "学校数量",
    "学生总数",
    "现有建筑总面积",
    "应配建筑总面积",
    "建筑面积总缺口",
    "达标学校数",
    "达标率(%)",
    "平均学生数/校",
    "平均现有面积/校",
    "平均应配面积/校",
    "平均缺口/校",
];

// ==========================================
// BatchFilter - 导出筛选条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchFilter {
    pub year: Option<i32>,
    pub school_type: Option<String>,
}

impl BatchFilter {
    /// 空字符串或 "all" 视为不筛选
    pub fn new(year: Option<i32>, school_type: Option<&str>) -> Self {
        let school_type = school_type
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"))
            .map(str::to_string);
        Self { year, school_type }
    }

    pub fn matches(&self, record: &SchoolRecord) -> bool {
        let year_ok = self.year.map_or(true, |y| record.year == y);
        let type_ok = self
            .school_type
            .as_deref()
            .map_or(true, |t| record.school_type.as_deref() == Some(t));
        year_ok && type_ok
    }

    /// 文件名中的筛选后缀，如 "2024年_综合类"
    pub fn file_suffix(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(year) = self.year {
            parts.push(format!("{}年", year));
        }
        if let Some(t) = &self.school_type {
            parts.push(t.clone());
        }
        (!parts.is_empty()).then(|| parts.join("_"))
    }
}

// ==========================================
// 汇总统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub school_count: usize,
    pub total_students: f64,
    pub total_current_area: i64,
    pub total_required_area: i64,
    pub total_gap: i64,
    pub compliant_count: usize,
    /// 百分比，保留两位小数；无数据时为 0
    pub compliance_rate: f64,
}

impl BatchSummary {
    pub fn from_records(records: &[SchoolRecord]) -> Self {
        let compliant_count = records
            .iter()
            .filter(|r| r.total_area_gap_with_subsidy <= 0)
            .count();
        Self {
            school_count: records.len(),
            total_students: records.iter().map(|r| r.total_students).sum(),
            total_current_area: records.iter().map(|r| r.current_building_area).sum(),
            total_required_area: records.iter().map(|r| r.required_building_area).sum(),
            total_gap: records.iter().map(|r| r.total_area_gap_with_subsidy).sum(),
            compliant_count,
            compliance_rate: rate(compliant_count, records.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeAnalysis {
    pub school_type: String,
    pub school_count: usize,
    pub total_students: f64,
    pub total_current_area: i64,
    pub total_required_area: i64,
    pub total_gap: i64,
    pub compliant_count: usize,
    pub compliance_rate: f64,
    pub avg_students: i64,
    pub avg_current_area: i64,
    pub avg_required_area: i64,
    pub avg_gap: i64,
}

impl TypeAnalysis {
    /// 按学校类型分组，保持首次出现的顺序
    pub fn from_records(records: &[SchoolRecord]) -> Vec<Self> {
        let mut groups: Vec<(String, Vec<&SchoolRecord>)> = Vec::new();
        for record in records {
            let key = record
                .school_type
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(UNKNOWN_TYPE);
            match groups.iter().position(|(name, _)| name == key) {
                Some(idx) => groups[idx].1.push(record),
                None => groups.push((key.to_string(), vec![record])),
            }
        }

        groups
            .into_iter()
            .map(|(school_type, members)| {
                let count = members.len();
                let n = count as f64;
                let total_students: f64 = members.iter().map(|r| r.total_students).sum();
                let total_current_area: i64 = members.iter().map(|r| r.current_building_area).sum();
                let total_required_area: i64 =
                    members.iter().map(|r| r.required_building_area).sum();
                let total_gap: i64 = members.iter().map(|r| r.total_area_gap_with_subsidy).sum();
                let compliant_count = members
                    .iter()
                    .filter(|r| r.total_area_gap_with_subsidy <= 0)
                    .count();

                TypeAnalysis {
                    school_type,
                    school_count: count,
                    total_students,
                    total_current_area,
                    total_required_area,
                    total_gap,
                    compliant_count,
                    compliance_rate: rate(compliant_count, count),
                    avg_students: round_half_up(total_students / n),
                    avg_current_area: round_half_up(total_current_area as f64 / n),
                    avg_required_area: round_half_up(total_required_area as f64 / n),
                    avg_gap: round_half_up(total_gap as f64 / n),
                }
            })
            .collect()
    }
}

fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    }
}

// ==========================================
// BatchExport - 三张工作表
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct BatchExport {
    pub detail: Sheet,
    pub summary: Sheet,
    pub type_analysis: Sheet,
}

impl BatchExport {
    pub fn build(records: &[SchoolRecord], filter: &BatchFilter, exported_at: NaiveDateTime) -> Self {
        Self {
            detail: detail_sheet(records),
            summary: summary_sheet(records, filter, exported_at),
            type_analysis: type_sheet(records),
        }
    }

    pub fn sheets(&self) -> [&Sheet; 3] {
        [&self.detail, &self.summary, &self.type_analysis]
    }
}

/// 导出格式的补助明细: `名称:面积m²; 名称:面积m²`
pub fn format_subsidy_details(record: &SchoolRecord) -> String {
    if record.special_subsidies.is_empty() {
        return "无特殊补助".to_string();
    }
    record
        .special_subsidies
        .iter()
        .map(|s| format!("{}:{}m²", s.name, format_number(s.area)))
        .collect::<Vec<_>>()
        .join("; ")
}

fn detail_sheet(records: &[SchoolRecord]) -> Sheet {
    let mut sheet = Sheet::new(DETAIL_SHEET_NAME);
    sheet.push(DETAIL_HEADERS);

    for r in records {
        let subsidy_area: f64 = r.special_subsidies.iter().map(|s| s.area).sum();
        sheet.push([
            r.school_name.clone(),
            r.school_type.clone().unwrap_or_default(),
            r.year.to_string(),
            r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            format_number(r.total_students),
            format_number(r.full_time_undergraduate),
            format_number(r.full_time_master),
            format_number(r.full_time_doctor),
            format_number(r.international_undergraduate),
            format_number(r.international_master),
            format_number(r.international_doctor),
            format_number(r.teaching_area),
            format_number(r.office_area),
            format_number(r.dormitory_area),
            format_number(r.total_living_area),
            format_number(r.logistics_area),
            r.current_building_area.to_string(),
            r.required_building_area.to_string(),
            r.total_area_gap_without_subsidy.to_string(),
            r.total_area_gap_with_subsidy.to_string(),
            format_number(subsidy_area),
            r.special_subsidies.len().to_string(),
            format_subsidy_details(r),
            compliance_label(r.total_area_gap_with_subsidy <= 0).to_string(),
            compliance_label(r.teaching_area_gap <= 0).to_string(),
            compliance_label(r.office_area_gap <= 0).to_string(),
            compliance_label(r.dormitory_area_gap <= 0).to_string(),
            compliance_label(r.other_living_area_gap <= 0).to_string(),
            compliance_label(r.logistics_area_gap <= 0).to_string(),
        ]);
    }
    sheet
}

fn summary_sheet(records: &[SchoolRecord], filter: &BatchFilter, exported_at: NaiveDateTime) -> Sheet {
    let s = BatchSummary::from_records(records);

    let mut sheet = Sheet::new(SUMMARY_SHEET_NAME);
    sheet.push(["统计项目", "数值", "单位"]);
    sheet.push([
        "导出时间".to_string(),
        exported_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        String::new(),
    ]);
    sheet.push(["导出学校数量".to_string(), s.school_count.to_string(), "所".to_string()]);
    if let Some(year) = filter.year {
        sheet.push(["筛选年份".to_string(), year.to_string(), String::new()]);
    }
    if let Some(t) = &filter.school_type {
        sheet.push(["筛选学校类型".to_string(), t.clone(), String::new()]);
    }

    sheet.blank();
    sheet.push(["=== 总体统计 ===", "", ""]);
    sheet.push(["学生总人数".to_string(), format_number(s.total_students), "人".to_string()]);
    sheet.push(["现有建筑总面积".to_string(), s.total_current_area.to_string(), "平方米".to_string()]);
    sheet.push(["应配建筑总面积".to_string(), s.total_required_area.to_string(), "平方米".to_string()]);
    sheet.push(["建筑面积总缺口".to_string(), s.total_gap.to_string(), "平方米".to_string()]);
    sheet.push(["整体达标学校数".to_string(), s.compliant_count.to_string(), "所".to_string()]);
    sheet.push(["整体达标率".to_string(), format_number(s.compliance_rate), "%".to_string()]);
    sheet
}

fn type_sheet(records: &[SchoolRecord]) -> Sheet {
    let mut sheet = Sheet::new(TYPE_SHEET_NAME);
    sheet.push(TYPE_HEADERS);

    for t in TypeAnalysis::from_records(records) {
        sheet.push([
            t.school_type,
            t.school_count.to_string(),
            format_number(t.total_students),
            t.total_current_area.to_string(),
            t.total_required_area.to_string(),
            t.total_gap.to_string(),
            t.compliant_count.to_string(),
            format_number(t.compliance_rate),
            t.avg_students.to_string(),
            t.avg_current_area.to_string(),
            t.avg_required_area.to_string(),
            t.avg_gap.to_string(),
        ]);
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::school::SpecialSubsidy;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn record(id: i64, name: &str, school_type: Option<&str>, year: i32, gap: i64) -> SchoolRecord {
        SchoolRecord {
            id,
            school_name: name.to_string(),
            school_type: school_type.map(str::to_string),
            year,
            full_time_undergraduate: 900.0,
            full_time_master: 100.0,
            full_time_doctor: 0.0,
            international_undergraduate: 0.0,
            international_master: 0.0,
            international_doctor: 0.0,
            total_students: 1000.0,
            teaching_area: 10000.0,
            office_area: 2000.0,
            total_living_area: 12000.0,
            dormitory_area: 10000.0,
            logistics_area: 1500.0,
            current_building_area: 25500,
            required_building_area: 25500 + gap,
            teaching_area_gap: gap,
            office_area_gap: 0,
            dormitory_area_gap: 0,
            other_living_area_gap: -10,
            logistics_area_gap: 5,
            total_area_gap_with_subsidy: gap,
            total_area_gap_without_subsidy: gap,
            special_subsidy_total: 0,
            overall_compliance: gap <= 0,
            calculation_results: None,
            remarks: None,
            created_at: timestamp(),
            special_subsidies: Vec::new(),
        }
    }

    #[test]
    fn test_filter_normalizes_all() {
        assert_eq!(BatchFilter::new(None, Some("all")), BatchFilter::default());
        assert_eq!(BatchFilter::new(None, Some(" ")), BatchFilter::default());

        let filter = BatchFilter::new(Some(2024), Some("工科类"));
        assert_eq!(filter.file_suffix().as_deref(), Some("2024年_工科类"));
        assert!(filter.matches(&record(1, "上海理工大学", Some("工科类"), 2024, 0)));
        assert!(!filter.matches(&record(2, "上海大学", Some("综合类"), 2024, 0)));
        assert!(!filter.matches(&record(3, "上海理工大学", Some("工科类"), 2023, 0)));
        assert_eq!(BatchFilter::default().file_suffix(), None);
    }

    #[test]
    fn test_summary_compliance_rate() {
        let records = vec![
            record(1, "A", Some("综合类"), 2024, 100),
            record(2, "B", Some("综合类"), 2024, 0),
            record(3, "C", Some("工科类"), 2024, -50),
        ];
        let summary = BatchSummary::from_records(&records);

        assert_eq!(summary.school_count, 3);
        assert_eq!(summary.compliant_count, 2);
        assert_eq!(summary.compliance_rate, 66.67);
        assert_eq!(summary.total_gap, 50);
        assert_eq!(summary.total_students, 3000.0);

        assert_eq!(BatchSummary::from_records(&[]).compliance_rate, 0.0);
    }

    #[test]
    fn test_type_analysis_groups_in_first_seen_order() {
        let records = vec![
            record(1, "A", Some("工科类"), 2024, 101),
            record(2, "B", Some("综合类"), 2024, 0),
            record(3, "C", Some("工科类"), 2024, 0),
            record(4, "D", None, 2024, 10),
        ];
        let analysis = TypeAnalysis::from_records(&records);

        assert_eq!(analysis.len(), 3);
        assert_eq!(analysis[0].school_type, "工科类");
        assert_eq!(analysis[0].school_count, 2);
        assert_eq!(analysis[0].compliance_rate, 50.0);
        assert_eq!(analysis[0].avg_gap, 51);
        assert_eq!(analysis[1].school_type, "综合类");
        assert_eq!(analysis[2].school_type, UNKNOWN_TYPE);
    }

    #[test]
    fn test_detail_sheet_rows() {
        let mut r = record(1, "上海大学", Some("综合类"), 2024, 100);
        r.special_subsidies = vec![
            SpecialSubsidy::new("实验室补助", 200.0),
            SpecialSubsidy::new("体育馆补助", 80.5),
        ];
        let export = BatchExport::build(&[r], &BatchFilter::default(), timestamp());

        let header = &export.detail.rows[0];
        assert_eq!(header.len(), DETAIL_HEADERS.len());
        assert_eq!(header.last().map(String::as_str), Some("后勤用房达标情况"));

        let row = export.detail.find_row("上海大学").unwrap();
        assert_eq!(row.len(), header.len());
        assert_eq!(row[3], "2024-09-01 10:30:00");
        assert_eq!(row[20], "280.5");
        assert_eq!(row[21], "2");
        assert_eq!(row[22], "实验室补助:200m²; 体育馆补助:80.5m²");
        assert_eq!(row[23], "不达标");
        assert_eq!(row[24], "不达标");
        assert_eq!(row[25], "达标");
        assert_eq!(row[27], "达标");
        assert_eq!(row[28], "不达标");

        assert_eq!(export.summary.find_row("整体达标率").unwrap()[1], "0");
        assert!(export.summary.find_row("筛选年份").is_none());
        assert_eq!(export.sheets().len(), 3);
    }
}
