// ==========================================
// 高校建筑面积缺口测算系统 - 单校测算结果表
// ==========================================
// 布局: 标题 / 测算年份 / 学校信息 / 规划学生数 / 测算结果 / 总缺口
// 附表: 特殊补助明细（有补助时生成）
// ==========================================

use crate::domain::report::GapReport;
use crate::domain::school::SchoolInput;
use crate::engine::CategoryResolver;
use crate::report::{format_number, Sheet};

pub const MAIN_SHEET_NAME: &str = "建筑规模测算结果";
pub const SUBSIDY_SHEET_NAME: &str = "特殊补助明细";

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationSheet {
    pub main: Sheet,
    pub subsidies: Option<Sheet>,
}

impl CalculationSheet {
    pub fn build(input: &SchoolInput, report: &GapReport, year: i32, title: &str) -> Self {
        let counts = input.student_counts();
        let pc = &report.per_category;
        let totals = &report.totals;

        let mut main = Sheet::new(MAIN_SHEET_NAME);
        main.push([title]);
        main.blank();
        main.push(["测算年份".to_string(), year.to_string()]);
        main.push([
            "单位/学校(机构)名称(章)",
            report.school_name.as_str(),
            "学校类型",
            report.resolved_category_label.as_str(),
        ]);
        main.push([
            "测算类型".to_string(),
            report.calculation_type_label.clone(),
            "同类学校类型".to_string(),
            CategoryResolver::new()
                .detailed_labels_for(report.calculation_type_code)
                .join("、"),
        ]);
        main.blank();

        main.push(["规划学生数"]);
        main.push([
            "本专科学生数(人)".to_string(),
            format_number(counts.full_time_undergrad),
            "学生总人数(人)".to_string(),
            format_number(report.student_totals.total),
        ]);
        main.push([
            "硕士学生数(人)".to_string(),
            format_number(counts.full_time_master),
            "博士学生数(人)".to_string(),
            format_number(counts.full_time_doctor),
        ]);
        main.push([
            "本科留学生数(人)".to_string(),
            format_number(counts.intl_undergrad),
            "硕士留学生数(人)".to_string(),
            format_number(counts.intl_master),
        ]);
        main.push([
            "博士留学生数(人)".to_string(),
            format_number(counts.intl_doctor),
        ]);
        main.blank();

        main.push(["测算结果"]);
        main.push(["用房类型", "规划建筑面积(㎡)", "现状建筑面积(㎡)", "建筑面积缺口(㎡)"]);

        let result_row = |label: &str, required: i64, existing: i64, gap: i64| {
            vec![
                label.to_string(),
                required.to_string(),
                existing.to_string(),
                gap.to_string(),
            ]
        };

        main.rows.push(result_row(
            "教学及辅助用房",
            pc.teaching.total_required,
            pc.teaching.existing,
            pc.teaching.gap,
        ));
        main.rows.push(result_row(
            "办公用房",
            pc.office.total_required,
            pc.office.existing,
            pc.office.gap,
        ));
        main.rows.push(result_row(
            "后勤辅助用房",
            pc.logistics.total_required,
            pc.logistics.existing,
            pc.logistics.gap,
        ));
        // 生活配套用房 = 学生宿舍 + 其他生活用房，现状取生活用房总面积
        main.rows.push(result_row(
            "生活配套用房",
            pc.dormitory.total_required + pc.other_living.total_required,
            report.existing_total_living_area,
            pc.dormitory.gap + pc.other_living.gap,
        ));
        main.rows.push(result_row(
            "其中:学生宿舍",
            pc.dormitory.total_required,
            pc.dormitory.existing,
            pc.dormitory.gap,
        ));
        main.rows.push(result_row(
            "其中:其他生活用房",
            pc.other_living.total_required,
            pc.other_living.existing,
            pc.other_living.gap,
        ));
        main.blank();

        for (label, value) in [
            ("建筑面积总缺口(不含补助)(㎡)", totals.gap_without_subsidy),
            ("补助建筑总面积(㎡)", totals.special_subsidy_total),
            ("建筑面积总缺口(含补助)(㎡)", totals.gap_with_subsidy),
        ] {
            main.push([label.to_string(), String::new(), String::new(), value.to_string()]);
        }

        let subsidies = (!report.special_subsidy_details.is_empty()).then(|| {
            let mut sheet = Sheet::new(SUBSIDY_SHEET_NAME);
            sheet.push([SUBSIDY_SHEET_NAME]);
            sheet.blank();
            sheet.push(["补助项目名称", "补助面积(㎡)"]);
            for subsidy in &report.special_subsidy_details {
                sheet.push([subsidy.name.clone(), format_number(subsidy.area)]);
            }
            sheet
        });

        Self { main, subsidies }
    }

    pub fn sheets(&self) -> Vec<&Sheet> {
        std::iter::once(&self.main)
            .chain(self.subsidies.as_ref())
            .collect()
    }
}
