// ==========================================
// 高校建筑面积缺口测算系统 - 学校类型解析
// ==========================================
// 职责: 学校名称 / 显式类型 → 详细类型 → 计算类型 (X/Y/Z/M/T)
// 顺序: 名称表 → 显式类型 → 默认 "综合类"；
//       详细类型表 → 五大类名称 → 默认 X
// 红线: 解析永不失败，未知学校按综合类估算
// ==========================================

use crate::domain::types::CalcType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// 默认详细类型
pub const DEFAULT_DETAILED_CATEGORY: &str = "综合类";

/// 学校名称 → 详细类型
const SCHOOL_NAME_TO_DETAILED: &[(&str, &str)] = &[
    ("上海大学", "综合类"),
    ("上海交通大学医学院", "医学类"),
    ("上海理工大学", "工科类"),
    ("上海师范大学", "师范类"),
    ("上海科技大学", "工科类"),
    ("华东政法大学", "政法类"),
    ("上海海事大学", "工科类"),
    ("上海海洋大学", "工科类"),
    ("上海中医药大学", "医学类"),
    ("上海体育大学", "体育类"),
    ("上海音乐学院", "艺术类"),
    ("上海戏剧学院", "艺术类"),
    ("上海电力大学", "工科类"),
    ("上海对外经贸大学", "财经类"),
    ("上海应用技术大学", "工科类"),
    ("上海立信会计金融学院", "财经类"),
    ("上海工程技术大学", "工科类"),
    ("上海第二工业大学", "工科类"),
    ("上海商学院", "财经类"),
    ("上海电机学院", "工科类"),
    ("上海政法学院", "政法类"),
    ("上海健康医学院", "医学类"),
    ("上海出版印刷高等专科学校", "工科类"),
    ("上海旅游高等专科学校", "工科类"),
    ("上海城建职业学院", "工科类"),
    ("上海电子信息职业技术学院", "工科类"),
    ("上海工艺美术职业学院", "工科类"),
    ("上海农林职业技术学院", "农林类"),
    (
        "上海健康医学院附属卫生学校(上海健康护理职业学院(筹))",
        "医学类",
    ),
];

/// 详细类型 → 计算类型
const DETAILED_TO_CALC_TYPE: &[(&str, CalcType)] = &[
    ("综合类", CalcType::X),
    ("师范类", CalcType::X),
    ("工科类", CalcType::Y),
    ("医学类", CalcType::Y),
    ("农林类", CalcType::Y),
    ("政法类", CalcType::Z),
    ("财经类", CalcType::Z),
    ("外语类", CalcType::Z),
    ("艺术类", CalcType::M),
    ("体育类", CalcType::T),
];

fn school_name_table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| SCHOOL_NAME_TO_DETAILED.iter().copied().collect())
}

fn detailed_table() -> &'static HashMap<&'static str, CalcType> {
    static TABLE: OnceLock<HashMap<&'static str, CalcType>> = OnceLock::new();
    TABLE.get_or_init(|| DETAILED_TO_CALC_TYPE.iter().copied().collect())
}

/// 详细类型的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionSource {
    SchoolName,    // 名称表命中
    ExplicitLabel, // 调用方显式类型
    Default,       // 默认综合类
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCategory {
    pub detailed_label: String,
    pub calc_type: CalcType,
    pub source: ResolutionSource,
}

// ==========================================
// CategoryResolver - 学校类型解析器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryResolver;

impl CategoryResolver {
    pub fn new() -> Self {
        Self
    }

    /// 解析学校类型
    pub fn resolve(&self, school_name: &str, explicit_label: Option<&str>) -> ResolvedCategory {
        let (detailed_label, source) = match school_name_table().get(school_name.trim()) {
            Some(label) => (label.to_string(), ResolutionSource::SchoolName),
            None => match explicit_label.map(str::trim).filter(|l| !l.is_empty()) {
                Some(label) => (label.to_string(), ResolutionSource::ExplicitLabel),
                None => (
                    DEFAULT_DETAILED_CATEGORY.to_string(),
                    ResolutionSource::Default,
                ),
            },
        };

        let calc_type = self.calc_type_for_label(&detailed_label);

        ResolvedCategory {
            detailed_label,
            calc_type,
            source,
        }
    }

    /// 详细类型或五大类名称 → 计算类型，无法识别时为 X
    pub fn calc_type_for_label(&self, label: &str) -> CalcType {
        detailed_table()
            .get(label)
            .copied()
            .or_else(|| CalcType::from_broad_label(label))
            .unwrap_or(CalcType::X)
    }

    /// 计算类型 → 详细类型列表（测算表"同类学校类型"一栏）
    pub fn detailed_labels_for(&self, calc_type: CalcType) -> Vec<&'static str> {
        DETAILED_TO_CALC_TYPE
            .iter()
            .filter(|(_, t)| *t == calc_type)
            .map(|(label, _)| *label)
            .collect()
    }
}
