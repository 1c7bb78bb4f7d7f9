// ==========================================
// 高校建筑面积缺口测算系统 - 测算结果
// ==========================================
// 所有面积数值均已取整（四舍五入，.5 向正无穷进位）
// 缺口 = 应配 - 现有，正值表示缺口
// ==========================================

use crate::domain::school::SpecialSubsidy;
use crate::domain::types::{AreaCategory, CalcType};
use serde::{Deserialize, Serialize};

// ==========================================
// GapReport - 建筑面积缺口测算结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    pub school_name: String,
    /// 解析后的详细学校类型（如 "工科类"）
    pub resolved_category_label: String,
    pub calculation_type_code: CalcType,
    /// 计算使用类型（五大类名称）
    pub calculation_type_label: String,
    pub student_totals: StudentTotals,
    pub existing_total_living_area: i64,
    pub existing_dormitory_area: i64,
    pub existing_other_living_area_computed: i64,
    pub per_category: PerCategory,
    pub totals: GapTotals,
    pub special_subsidy_details: Vec<SpecialSubsidy>,
}

/// 各层次学生总数（全日制 + 留学生）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentTotals {
    pub total: f64,
    pub undergrad: f64,
    pub master: f64,
    pub doctor: f64,
    pub international: f64,
}

/// 单类用房测算结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGap {
    pub basic_required: i64,
    pub subsidized_required: i64,
    pub total_required: i64,
    pub existing: i64,
    pub gap: i64,
    pub compliant: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerCategory {
    pub teaching: CategoryGap,
    pub office: CategoryGap,
    pub dormitory: CategoryGap,
    pub other_living: CategoryGap,
    pub logistics: CategoryGap,
}

impl PerCategory {
    pub fn get(&self, category: AreaCategory) -> &CategoryGap {
        match category {
            AreaCategory::Teaching => &self.teaching,
            AreaCategory::Office => &self.office,
            AreaCategory::Dormitory => &self.dormitory,
            AreaCategory::OtherLiving => &self.other_living,
            AreaCategory::Logistics => &self.logistics,
        }
    }

    /// 按 A/B/C1/C2/D 顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (AreaCategory, &CategoryGap)> + '_ {
        AreaCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// 汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapTotals {
    pub existing_sum: i64,
    pub required_sum: i64,
    /// 补贴总面积（各类补贴应配面积之和）
    pub subsidized_sum: i64,
    pub gap_without_subsidy: i64,
    /// 含特殊补助缺口 = 不含补助缺口 + 特殊补助总面积
    pub gap_with_subsidy: i64,
    pub special_subsidy_total: i64,
    pub special_subsidy_count: usize,
    pub overall_compliant: bool,
}

impl GapReport {
    pub fn category(&self, category: AreaCategory) -> &CategoryGap {
        self.per_category.get(category)
    }
}
