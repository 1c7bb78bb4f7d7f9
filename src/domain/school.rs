// ==========================================
// 高校建筑面积缺口测算系统 - 学校填报数据
// ==========================================
// 职责: 测算输入（学生人数 + 现有面积 + 特殊补助）
// 约定: 缺失或非有限数值一律按 0 处理（宽松输入策略）
// ==========================================

use crate::domain::types::{AreaCategory, DegreeTier};
use serde::{Deserialize, Serialize};

// ==========================================
// SchoolInput - 学校测算输入
// ==========================================
/// 学校测算输入
///
/// 数值字段均为可选: `None` 与 NaN/∞ 在 [`SchoolInput::student_counts`] 等
/// 规范化方法中统一视为 0。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchoolInput {
    pub school_name: String,
    /// 显式学校类型（如 "综合类"、"工科类"），学校名称未收录时使用
    pub explicit_category_label: Option<String>,
    pub year: Option<i32>,

    // 学生人数
    pub total_students: Option<f64>,
    pub full_time_undergrad_and_specialist: Option<f64>,
    pub full_time_master: Option<f64>,
    pub full_time_doctor: Option<f64>,
    pub intl_undergrad: Option<f64>,
    pub intl_master: Option<f64>,
    pub intl_doctor: Option<f64>,

    // 现有面积（㎡）
    pub existing_teaching_area: Option<f64>,
    pub existing_office_area: Option<f64>,
    pub existing_total_living_area: Option<f64>,
    pub existing_dormitory_area: Option<f64>,
    pub existing_logistics_area: Option<f64>,
}

impl SchoolInput {
    pub fn new(school_name: impl Into<String>) -> Self {
        Self {
            school_name: school_name.into(),
            ..Default::default()
        }
    }

    /// 学生总人数（调用方提供，不按分层人数重新汇总）
    pub fn total_students_value(&self) -> f64 {
        coerce(self.total_students)
    }

    /// 规范化后的分层学生人数
    pub fn student_counts(&self) -> StudentCounts {
        StudentCounts {
            full_time_undergrad: coerce(self.full_time_undergrad_and_specialist),
            full_time_master: coerce(self.full_time_master),
            full_time_doctor: coerce(self.full_time_doctor),
            intl_undergrad: coerce(self.intl_undergrad),
            intl_master: coerce(self.intl_master),
            intl_doctor: coerce(self.intl_doctor),
        }
    }

    /// 规范化后的现有面积
    pub fn existing_area(&self) -> ExistingArea {
        ExistingArea {
            teaching: coerce(self.existing_teaching_area),
            office: coerce(self.existing_office_area),
            total_living: coerce(self.existing_total_living_area),
            dormitory: coerce(self.existing_dormitory_area),
            logistics: coerce(self.existing_logistics_area),
        }
    }
}

/// 缺失/非法数值 → 0
pub fn coerce(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

// ==========================================
// StudentCounts - 分层学生人数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StudentCounts {
    pub full_time_undergrad: f64, // 全日制本专科生
    pub full_time_master: f64,
    pub full_time_doctor: f64,
    pub intl_undergrad: f64,
    pub intl_master: f64,
    pub intl_doctor: f64,
}

impl StudentCounts {
    pub fn all_undergrad(&self) -> f64 {
        self.full_time_undergrad + self.intl_undergrad
    }

    pub fn all_master(&self) -> f64 {
        self.full_time_master + self.intl_master
    }

    pub fn all_doctor(&self) -> f64 {
        self.full_time_doctor + self.intl_doctor
    }

    pub fn all_international(&self) -> f64 {
        self.intl_undergrad + self.intl_master + self.intl_doctor
    }

    /// 补贴系数对应的层次人数
    pub fn tier_headcount(&self, tier: DegreeTier) -> f64 {
        match tier {
            DegreeTier::Master => self.all_master(),
            DegreeTier::Doctorate => self.all_doctor(),
            DegreeTier::International => self.all_international(),
        }
    }
}

// ==========================================
// ExistingArea - 现有面积
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExistingArea {
    pub teaching: f64,
    pub office: f64,
    pub total_living: f64, // 生活用房总面积（含宿舍）
    pub dormitory: f64,
    pub logistics: f64,
}

impl ExistingArea {
    /// 其他生活用房 = 生活用房总面积 - 学生宿舍面积，不为负
    pub fn other_living(&self) -> f64 {
        (self.total_living - self.dormitory).max(0.0)
    }

    pub fn get(&self, category: AreaCategory) -> f64 {
        match category {
            AreaCategory::Teaching => self.teaching,
            AreaCategory::Office => self.office,
            AreaCategory::Dormitory => self.dormitory,
            AreaCategory::OtherLiving => self.other_living(),
            AreaCategory::Logistics => self.logistics,
        }
    }
}

// ==========================================
// SpecialSubsidy - 特殊用房补助
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialSubsidy {
    pub name: String,
    pub area: f64,
}

impl SpecialSubsidy {
    pub fn new(name: impl Into<String>, area: f64) -> Self {
        Self {
            name: name.into(),
            area,
        }
    }
}
