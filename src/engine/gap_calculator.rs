// ==========================================
// 高校建筑面积缺口测算系统 - 建筑面积缺口测算引擎
// ==========================================
// 输入: SchoolInput + 特殊补助列表
// 输出: GapReport（分类应配/现有/缺口/达标 + 汇总）
// ==========================================
// 应配面积 = 基础系数 × 学生总人数 + Σ 补贴系数[层次] × 层次人数
// 缺口 = 应配 - 现有（正值为缺口）
// 含补助缺口 = 不含补助缺口 + 特殊补助总面积
// ==========================================

use crate::domain::report::{CategoryGap, GapReport, GapTotals, PerCategory, StudentTotals};
use crate::domain::school::{ExistingArea, SchoolInput, SpecialSubsidy, StudentCounts};
use crate::domain::types::{AreaCategory, CalcType, DegreeTier};
use crate::engine::category_resolver::CategoryResolver;
use crate::engine::error::{CalcError, CalcResult};
use crate::engine::standards::AreaStandardsTable;
use tracing::{debug, instrument};

/// 四舍五入取整（.5 向正无穷进位，-2.5 → -2）
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// 单类用房的未取整中间值
#[derive(Debug, Clone, Copy)]
struct CategoryFigures {
    basic: f64,
    subsidized: f64,
    existing: f64,
}

impl CategoryFigures {
    fn required(&self) -> f64 {
        self.basic + self.subsidized
    }

    fn to_gap(self) -> CategoryGap {
        let gap = round_half_up(self.required() - self.existing);
        CategoryGap {
            basic_required: round_half_up(self.basic),
            subsidized_required: round_half_up(self.subsidized),
            total_required: round_half_up(self.required()),
            existing: round_half_up(self.existing),
            gap,
            compliant: gap <= 0,
        }
    }
}

// ==========================================
// GapCalculator - 缺口测算引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct GapCalculator {
    resolver: CategoryResolver,
}

impl GapCalculator {
    pub fn new() -> Self {
        Self {
            resolver: CategoryResolver::new(),
        }
    }

    /// 测算建筑面积缺口
    ///
    /// 纯函数: 无 I/O，同样输入得到同样结果。
    ///
    /// # 错误
    /// - 特殊补助面积为 NaN/∞ 或负数时整体失败
    #[instrument(skip_all, fields(school = %input.school_name, subsidies = subsidies.len()))]
    pub fn calculate(
        &self,
        input: &SchoolInput,
        subsidies: &[SpecialSubsidy],
    ) -> CalcResult<GapReport> {
        let special_subsidy_total = validate_subsidies(subsidies)?;

        let resolved = self
            .resolver
            .resolve(&input.school_name, input.explicit_category_label.as_deref());
        let calc_type = resolved.calc_type;

        let total_students = input.total_students_value();
        let counts = input.student_counts();
        let existing = input.existing_area();

        debug!(
            calc_type = %calc_type,
            detailed = %resolved.detailed_label,
            total_students,
            "学校类型已解析"
        );

        let figures = AreaCategory::ALL.map(|category| {
            category_figures(calc_type, category, total_students, &counts, &existing)
        });

        let existing_sum: f64 = figures.iter().map(|f| f.existing).sum();
        let required_sum: f64 = figures.iter().map(CategoryFigures::required).sum();
        let subsidized_sum: f64 = figures.iter().map(|f| f.subsidized).sum();

        for (label, value) in [
            ("现有建筑总面积", existing_sum),
            ("应配建筑总面积", required_sum),
            ("特殊补助总面积", special_subsidy_total),
        ] {
            if !value.is_finite() {
                return Err(CalcError::NonFiniteResult(format!("{}={}", label, value)));
            }
        }

        let [teaching, office, dormitory, other_living, logistics] =
            figures.map(CategoryFigures::to_gap);

        let existing_sum = round_half_up(existing_sum);
        let required_sum = round_half_up(required_sum);
        let gap_without_subsidy = required_sum - existing_sum;
        let special_subsidy_total = round_half_up(special_subsidy_total);
        let gap_with_subsidy = gap_without_subsidy + special_subsidy_total;

        let totals = GapTotals {
            existing_sum,
            required_sum,
            subsidized_sum: round_half_up(subsidized_sum),
            gap_without_subsidy,
            gap_with_subsidy,
            special_subsidy_total,
            special_subsidy_count: subsidies.len(),
            overall_compliant: gap_with_subsidy <= 0,
        };

        debug!(
            required_sum,
            existing_sum,
            gap_without_subsidy,
            gap_with_subsidy,
            "缺口测算完成"
        );

        Ok(GapReport {
            school_name: input.school_name.clone(),
            resolved_category_label: resolved.detailed_label,
            calculation_type_code: calc_type,
            calculation_type_label: calc_type.broad_label().to_string(),
            student_totals: StudentTotals {
                total: total_students,
                undergrad: counts.all_undergrad(),
                master: counts.all_master(),
                doctor: counts.all_doctor(),
                international: counts.all_international(),
            },
            existing_total_living_area: round_half_up(existing.total_living),
            existing_dormitory_area: round_half_up(existing.dormitory),
            existing_other_living_area_computed: round_half_up(existing.other_living()),
            per_category: PerCategory {
                teaching,
                office,
                dormitory,
                other_living,
                logistics,
            },
            totals,
            special_subsidy_details: subsidies.to_vec(),
        })
    }
}

/// 便捷入口
pub fn calculate_building_area_gap(
    input: &SchoolInput,
    subsidies: &[SpecialSubsidy],
) -> CalcResult<GapReport> {
    GapCalculator::new().calculate(input, subsidies)
}

fn category_figures(
    calc_type: CalcType,
    category: AreaCategory,
    total_students: f64,
    counts: &StudentCounts,
    existing: &ExistingArea,
) -> CategoryFigures {
    let basic = AreaStandardsTable::basic(calc_type).get(category) * total_students;
    let tiers = AreaStandardsTable::subsidized(calc_type).get(category);
    let subsidized: f64 = DegreeTier::ALL
        .iter()
        .map(|tier| tiers.get(*tier) * counts.tier_headcount(*tier))
        .sum();

    CategoryFigures {
        basic,
        subsidized,
        existing: existing.get(category),
    }
}

/// 校验特殊补助并返回面积合计
fn validate_subsidies(subsidies: &[SpecialSubsidy]) -> CalcResult<f64> {
    let mut total = 0.0;
    for (idx, subsidy) in subsidies.iter().enumerate() {
        if !subsidy.area.is_finite() {
            return Err(CalcError::InvalidSubsidyArea {
                index: idx + 1,
                name: subsidy.name.clone(),
                value: subsidy.area.to_string(),
            });
        }
        if subsidy.area < 0.0 {
            return Err(CalcError::NegativeSubsidyArea {
                index: idx + 1,
                name: subsidy.name.clone(),
                area: subsidy.area,
            });
        }
        total += subsidy.area;
    }
    Ok(total)
}

#[cfg(test)]
mod tests;
