use super::*;
use crate::domain::types::CalcType;

// ==========================================
// 测试辅助函数
// ==========================================

fn school(name: &str, total_students: f64) -> SchoolInput {
    let mut input = SchoolInput::new(name);
    input.total_students = Some(total_students);
    input
}

/// 现有面积与 X 类 1000 人的基础应配面积一致
fn fully_equipped_x_1000() -> SchoolInput {
    let mut input = school("上海大学", 1000.0);
    input.existing_teaching_area = Some(12950.0);
    input.existing_office_area = Some(2000.0);
    input.existing_dormitory_area = Some(10000.0);
    input.existing_total_living_area = Some(12000.0);
    input.existing_logistics_area = Some(1550.0);
    input
}

// ==========================================
// 典型场景
// ==========================================

#[test]
fn test_comprehensive_school_without_existing_area() {
    let report = calculate_building_area_gap(&school("上海大学", 1000.0), &[]).unwrap();

    assert_eq!(report.calculation_type_code, CalcType::X);
    assert_eq!(report.resolved_category_label, "综合类");
    assert_eq!(report.calculation_type_label, "综合师范");

    assert_eq!(report.per_category.teaching.total_required, 12950);
    assert_eq!(report.per_category.office.total_required, 2000);
    assert_eq!(report.per_category.dormitory.total_required, 10000);
    assert_eq!(report.per_category.other_living.total_required, 2000);
    assert_eq!(report.per_category.logistics.total_required, 1550);

    assert_eq!(report.totals.required_sum, 28500);
    assert_eq!(report.totals.existing_sum, 0);
    assert_eq!(report.totals.gap_without_subsidy, 28500);
    assert_eq!(report.totals.special_subsidy_total, 0);
    assert_eq!(report.totals.gap_with_subsidy, 28500);
    assert!(!report.totals.overall_compliant);
    for (_, gap) in report.per_category.iter() {
        assert!(!gap.compliant);
        assert_eq!(gap.subsidized_required, 0);
    }
}

#[test]
fn test_existing_equals_required_is_compliant() {
    let report = calculate_building_area_gap(&fully_equipped_x_1000(), &[]).unwrap();

    for (category, gap) in report.per_category.iter() {
        assert_eq!(gap.gap, 0, "{} 缺口应为 0", category);
        assert!(gap.compliant);
    }
    assert_eq!(report.existing_other_living_area_computed, 2000);
    assert_eq!(report.totals.gap_without_subsidy, 0);
    assert_eq!(report.totals.gap_with_subsidy, 0);
    assert!(report.totals.overall_compliant);
}

#[test]
fn test_master_students_add_subsidized_area() {
    let mut input = school("上海大学", 1000.0);
    input.full_time_master = Some(10.0);

    let report = calculate_building_area_gap(&input, &[]).unwrap();
    let pc = &report.per_category;

    assert_eq!(pc.teaching.subsidized_required, 30);
    assert_eq!(pc.office.subsidized_required, 20);
    assert_eq!(pc.dormitory.subsidized_required, 50);
    assert_eq!(pc.other_living.subsidized_required, 0);
    assert_eq!(pc.logistics.subsidized_required, 0);

    assert_eq!(pc.teaching.basic_required, 12950);
    assert_eq!(pc.teaching.total_required, 12980);
    assert_eq!(pc.dormitory.total_required, 10050);
    assert_eq!(report.totals.subsidized_sum, 100);
    assert_eq!(report.totals.required_sum, 28600);
}

#[test]
fn test_international_students_count_in_master_and_international_tiers() {
    let mut input = school("XYZ University", 0.0);
    input.intl_master = Some(2.0);
    input.intl_doctor = Some(1.0);
    input.intl_undergrad = Some(3.0);

    let report = calculate_building_area_gap(&input, &[]).unwrap();
    let pc = &report.per_category;

    assert_eq!(report.student_totals.master, 2.0);
    assert_eq!(report.student_totals.doctor, 1.0);
    assert_eq!(report.student_totals.international, 6.0);
    assert_eq!(report.student_totals.undergrad, 3.0);

    // A: 3×2 + 3×1
    assert_eq!(pc.teaching.subsidized_required, 9);
    // C1: 5×2 + 14×1
    assert_eq!(pc.dormitory.subsidized_required, 24);
    // C2: 19×6
    assert_eq!(pc.other_living.subsidized_required, 114);
}

#[test]
fn test_other_living_existing_clamped_to_zero() {
    let mut input = school("上海大学", 0.0);
    input.existing_total_living_area = Some(500.0);
    input.existing_dormitory_area = Some(800.0);

    let report = calculate_building_area_gap(&input, &[]).unwrap();

    assert_eq!(report.existing_other_living_area_computed, 0);
    assert_eq!(report.per_category.other_living.existing, 0);
    assert_eq!(report.existing_total_living_area, 500);
    assert_eq!(report.existing_dormitory_area, 800);
    assert_eq!(report.totals.existing_sum, 800);
}

#[test]
fn test_special_subsidy_increases_gap() {
    let mut input = fully_equipped_x_1000();
    input.existing_teaching_area = Some(12850.0);

    let subsidies = vec![SpecialSubsidy::new("实验室补助", 200.0)];
    let report = calculate_building_area_gap(&input, &subsidies).unwrap();

    assert_eq!(report.totals.gap_without_subsidy, 100);
    assert_eq!(report.totals.special_subsidy_total, 200);
    assert_eq!(report.totals.special_subsidy_count, 1);
    assert_eq!(report.totals.gap_with_subsidy, 300);
    assert!(!report.totals.overall_compliant);
    assert_eq!(report.special_subsidy_details, subsidies);
}

#[test]
fn test_unknown_school_uses_comprehensive_coefficients() {
    let report = calculate_building_area_gap(&school("XYZ University", 100.0), &[]).unwrap();

    assert_eq!(report.calculation_type_code, CalcType::X);
    assert_eq!(report.per_category.teaching.basic_required, 1295);
    assert_eq!(report.per_category.logistics.basic_required, 155);
}

#[test]
fn test_arts_school_coefficients() {
    let report = calculate_building_area_gap(&school("上海音乐学院", 100.0), &[]).unwrap();

    assert_eq!(report.calculation_type_code, CalcType::M);
    assert_eq!(report.per_category.teaching.total_required, 5350);
    assert_eq!(report.per_category.office.total_required, 350);
    assert_eq!(report.per_category.dormitory.total_required, 1000);
    assert_eq!(report.per_category.other_living.total_required, 250);
    assert_eq!(report.per_category.logistics.total_required, 200);
    assert_eq!(report.totals.required_sum, 7150);
}

#[test]
fn test_explicit_label_used_for_unlisted_school() {
    let mut input = school("某医科大学", 100.0);
    input.explicit_category_label = Some("医学类".to_string());

    let report = calculate_building_area_gap(&input, &[]).unwrap();
    assert_eq!(report.calculation_type_code, CalcType::Y);
    assert_eq!(report.per_category.teaching.basic_required, 1595);
}

// ==========================================
// 性质测试
// ==========================================

#[test]
fn test_deterministic_output() {
    let mut input = fully_equipped_x_1000();
    input.full_time_doctor = Some(7.0);
    let subsidies = vec![
        SpecialSubsidy::new("实验室补助", 120.5),
        SpecialSubsidy::new("体育馆补助", 80.0),
    ];

    let first = calculate_building_area_gap(&input, &subsidies).unwrap();
    let second = calculate_building_area_gap(&input, &subsidies).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_missing_fields_equal_explicit_zero() {
    let missing = SchoolInput::new("上海理工大学");

    let mut zeros = SchoolInput::new("上海理工大学");
    zeros.total_students = Some(0.0);
    zeros.full_time_undergrad_and_specialist = Some(0.0);
    zeros.full_time_master = Some(0.0);
    zeros.full_time_doctor = Some(0.0);
    zeros.intl_undergrad = Some(0.0);
    zeros.intl_master = Some(0.0);
    zeros.intl_doctor = Some(0.0);
    zeros.existing_teaching_area = Some(0.0);
    zeros.existing_office_area = Some(0.0);
    zeros.existing_total_living_area = Some(0.0);
    zeros.existing_dormitory_area = Some(0.0);
    zeros.existing_logistics_area = Some(0.0);

    let a = calculate_building_area_gap(&missing, &[]).unwrap();
    let b = calculate_building_area_gap(&zeros, &[]).unwrap();
    assert_eq!(a, b);

    let mut nan = SchoolInput::new("上海理工大学");
    nan.total_students = Some(f64::NAN);
    assert_eq!(calculate_building_area_gap(&nan, &[]).unwrap(), a);
}

#[test]
fn test_gap_identity_and_compliance_consistency() {
    let subsidy_sets = [
        vec![],
        vec![SpecialSubsidy::new("补助一", 0.4)],
        vec![
            SpecialSubsidy::new("补助一", 0.4),
            SpecialSubsidy::new("补助二", 0.4),
        ],
        vec![SpecialSubsidy::new("补助三", 3000.0)],
    ];

    for existing_teaching in [0.0, 12949.6, 12950.4, 20000.0] {
        for subsidies in &subsidy_sets {
            let mut input = fully_equipped_x_1000();
            input.existing_teaching_area = Some(existing_teaching);
            input.intl_master = Some(3.3);

            let report = calculate_building_area_gap(&input, subsidies).unwrap();
            let t = &report.totals;

            assert_eq!(t.gap_with_subsidy, t.gap_without_subsidy + t.special_subsidy_total);
            assert_eq!(t.gap_without_subsidy, t.required_sum - t.existing_sum);
            assert_eq!(t.overall_compliant, t.gap_with_subsidy <= 0);
            for (_, gap) in report.per_category.iter() {
                assert_eq!(gap.compliant, gap.gap <= 0);
            }
        }
    }
}

#[test]
fn test_total_students_not_derived_from_tiers() {
    let mut input = school("上海大学", 10.0);
    input.full_time_undergrad_and_specialist = Some(5000.0);

    let report = calculate_building_area_gap(&input, &[]).unwrap();
    assert_eq!(report.per_category.dormitory.basic_required, 100);
    assert_eq!(report.student_totals.total, 10.0);
    assert_eq!(report.student_totals.undergrad, 5000.0);
}

// ==========================================
// 取整与错误
// ==========================================

#[test]
fn test_round_half_up() {
    assert_eq!(round_half_up(2.5), 3);
    assert_eq!(round_half_up(2.49), 2);
    assert_eq!(round_half_up(-2.5), -2);
    assert_eq!(round_half_up(-2.51), -3);
    assert_eq!(round_half_up(-0.4), 0);
}

#[test]
fn test_compliance_follows_reported_gap() {
    // 差 0.4㎡ 取整后缺口为 0，按达标输出
    let mut input = fully_equipped_x_1000();
    input.existing_teaching_area = Some(12949.6);
    let report = calculate_building_area_gap(&input, &[]).unwrap();
    assert_eq!(report.per_category.teaching.gap, 0);
    assert!(report.per_category.teaching.compliant);
    assert_eq!(report.totals.gap_with_subsidy, 0);
    assert!(report.totals.overall_compliant);

    // 差 0.6㎡ 取整后缺口为 1
    input.existing_teaching_area = Some(12949.4);
    let report = calculate_building_area_gap(&input, &[]).unwrap();
    assert_eq!(report.per_category.teaching.gap, 1);
    assert!(!report.per_category.teaching.compliant);
    assert_eq!(report.totals.gap_with_subsidy, 1);
    assert!(!report.totals.overall_compliant);
}

#[test]
fn test_invalid_subsidy_area_fails_whole_calculation() {
    let subsidies = vec![
        SpecialSubsidy::new("正常补助", 100.0),
        SpecialSubsidy::new("异常补助", f64::NAN),
    ];
    let err = calculate_building_area_gap(&school("上海大学", 1000.0), &subsidies).unwrap_err();

    match err {
        CalcError::InvalidSubsidyArea { index, name, .. } => {
            assert_eq!(index, 2);
            assert_eq!(name, "异常补助");
        }
        other => panic!("Expected InvalidSubsidyArea, got {:?}", other),
    }
}

#[test]
fn test_negative_subsidy_area_rejected() {
    let subsidies = vec![SpecialSubsidy::new("负面积", -5.0)];
    let err = calculate_building_area_gap(&school("上海大学", 1000.0), &subsidies).unwrap_err();
    assert!(matches!(err, CalcError::NegativeSubsidyArea { index: 1, .. }));
    assert!(err.to_string().contains("负面积"));
}

#[test]
fn test_overflowing_input_reports_error() {
    let input = school("上海音乐学院", f64::MAX);
    let err = calculate_building_area_gap(&input, &[]).unwrap_err();
    assert!(matches!(err, CalcError::NonFiniteResult(_)));
}
