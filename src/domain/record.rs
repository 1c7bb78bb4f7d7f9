// ==========================================
// 高校建筑面积缺口测算系统 - 填报记录
// ==========================================
// 职责: 持久化实体（school_info + special_subsidies）与统计结果
// ==========================================

use crate::domain::school::{SchoolInput, SpecialSubsidy};
use chrono::{Datelike, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// SchoolSubmission - 一次填报
// ==========================================
/// 一次填报: 测算输入 + 特殊补助 + 备注
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolSubmission {
    pub input: SchoolInput,
    pub subsidies: Vec<SpecialSubsidy>,
    pub remarks: Option<String>,
}

impl SchoolSubmission {
    /// 统计年份，未填写时取当前年份
    pub fn resolved_year(&self) -> i32 {
        self.input.year.unwrap_or_else(current_year)
    }
}

pub fn current_year() -> i32 {
    Local::now().year()
}

// ==========================================
// SchoolRecord - 已保存的填报记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    pub id: i64,
    pub school_name: String,
    /// 解析后的详细学校类型
    pub school_type: Option<String>,
    pub year: i32,

    // 学生人数
    pub full_time_undergraduate: f64,
    pub full_time_master: f64,
    pub full_time_doctor: f64,
    pub international_undergraduate: f64,
    pub international_master: f64,
    pub international_doctor: f64,
    pub total_students: f64,

    // 现有面积
    pub teaching_area: f64,
    pub office_area: f64,
    pub total_living_area: f64,
    pub dormitory_area: f64,
    pub logistics_area: f64,

    // 测算结果
    pub current_building_area: i64,
    pub required_building_area: i64,
    pub teaching_area_gap: i64,
    pub office_area_gap: i64,
    pub dormitory_area_gap: i64,
    pub other_living_area_gap: i64,
    pub logistics_area_gap: i64,
    pub total_area_gap_with_subsidy: i64,
    pub total_area_gap_without_subsidy: i64,
    pub special_subsidy_total: i64,
    pub overall_compliance: bool,
    /// 完整测算结果（GapReport JSON）
    pub calculation_results: Option<String>,

    pub remarks: Option<String>,
    pub created_at: NaiveDateTime,
    pub special_subsidies: Vec<SpecialSubsidy>,
}

impl SchoolRecord {
    /// 还原测算输入（用于重新测算/生成报表）
    pub fn to_input(&self) -> SchoolInput {
        SchoolInput {
            school_name: self.school_name.clone(),
            explicit_category_label: self.school_type.clone(),
            year: Some(self.year),
            total_students: Some(self.total_students),
            full_time_undergrad_and_specialist: Some(self.full_time_undergraduate),
            full_time_master: Some(self.full_time_master),
            full_time_doctor: Some(self.full_time_doctor),
            intl_undergrad: Some(self.international_undergraduate),
            intl_master: Some(self.international_master),
            intl_doctor: Some(self.international_doctor),
            existing_teaching_area: Some(self.teaching_area),
            existing_office_area: Some(self.office_area),
            existing_total_living_area: Some(self.total_living_area),
            existing_dormitory_area: Some(self.dormitory_area),
            existing_logistics_area: Some(self.logistics_area),
        }
    }
}

// ==========================================
// 统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallStatistics {
    pub total_schools: i64,
    pub total_students: f64,
    pub total_current_area: i64,
    pub total_required_area: i64,
    pub total_gap: i64,
    pub compliant_schools: i64,
    pub avg_students: Option<f64>,
    pub avg_current_area: Option<f64>,
    pub earliest_year: Option<i32>,
    pub latest_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeStatistics {
    pub school_type: String,
    pub count: i64,
    pub students: f64,
    pub current_area: i64,
    pub required_area: i64,
    pub gap: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolStatistics {
    pub overall: OverallStatistics,
    pub by_type: Vec<TypeStatistics>,
}
