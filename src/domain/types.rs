// ==========================================
// 高校建筑面积缺口测算系统 - 领域类型定义
// ==========================================
// 计算类型: X/Y/Z/M/T 五大类
// 用房类别: A/B/C1/C2/D
// 学历层次: 硕士 / 博士 / 留学生
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 计算类型 (Calculation Type)
// ==========================================
// 决定基础生均面积系数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalcType {
    X, // 综合师范
    Y, // 工科医学农林
    Z, // 政法财经外语
    M, // 艺术
    T, // 体育
}

impl CalcType {
    pub const ALL: [CalcType; 5] = [
        CalcType::X,
        CalcType::Y,
        CalcType::Z,
        CalcType::M,
        CalcType::T,
    ];

    /// 单字母类型代码
    pub fn code(&self) -> &'static str {
        match self {
            CalcType::X => "X",
            CalcType::Y => "Y",
            CalcType::Z => "Z",
            CalcType::M => "M",
            CalcType::T => "T",
        }
    }

    /// 五大类名称（计算使用类型）
    pub fn broad_label(&self) -> &'static str {
        match self {
            CalcType::X => "综合师范",
            CalcType::Y => "工科医学农林",
            CalcType::Z => "政法财经外语",
            CalcType::M => "艺术",
            CalcType::T => "体育",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "X" => Some(CalcType::X),
            "Y" => Some(CalcType::Y),
            "Z" => Some(CalcType::Z),
            "M" => Some(CalcType::M),
            "T" => Some(CalcType::T),
            _ => None,
        }
    }

    /// 按五大类名称反查
    pub fn from_broad_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|t| t.broad_label() == label)
    }
}

impl fmt::Display for CalcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 用房类别 (Area Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaCategory {
    Teaching,    // A 教学及辅助用房
    Office,      // B 办公用房
    Dormitory,   // C1 学生宿舍
    OtherLiving, // C2 其他生活用房
    Logistics,   // D 后勤辅助用房
}

impl AreaCategory {
    pub const ALL: [AreaCategory; 5] = [
        AreaCategory::Teaching,
        AreaCategory::Office,
        AreaCategory::Dormitory,
        AreaCategory::OtherLiving,
        AreaCategory::Logistics,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            AreaCategory::Teaching => "A",
            AreaCategory::Office => "B",
            AreaCategory::Dormitory => "C1",
            AreaCategory::OtherLiving => "C2",
            AreaCategory::Logistics => "D",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AreaCategory::Teaching => "教学及辅助用房",
            AreaCategory::Office => "办公用房",
            AreaCategory::Dormitory => "学生宿舍",
            AreaCategory::OtherLiving => "其他生活用房",
            AreaCategory::Logistics => "后勤辅助用房",
        }
    }
}

impl fmt::Display for AreaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.label(), self.code())
    }
}

// ==========================================
// 学历层次 (Degree Tier)
// ==========================================
// 补贴系数按层次人数计算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DegreeTier {
    Master,
    Doctorate,
    International,
}

impl DegreeTier {
    pub const ALL: [DegreeTier; 3] = [
        DegreeTier::Master,
        DegreeTier::Doctorate,
        DegreeTier::International,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DegreeTier::Master => "硕士生",
            DegreeTier::Doctorate => "博士生",
            DegreeTier::International => "留学生",
        }
    }
}

impl fmt::Display for DegreeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 达标情况文案
pub fn compliance_label(compliant: bool) -> &'static str {
    if compliant {
        "达标"
    } else {
        "不达标"
    }
}
