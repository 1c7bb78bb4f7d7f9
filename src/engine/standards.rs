// ==========================================
// 高校建筑面积缺口测算系统 - 建筑面积标准表
// ==========================================
// 基础系数: 生均应配面积（按学生总人数）
// 补贴系数: 按硕士/博士/留学生人数额外增加的生均面积
// 红线: 数值必须与标准原表完全一致
// ==========================================

use crate::domain::types::{AreaCategory, CalcType, DegreeTier};

/// 基础生均面积系数（㎡/人）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicCoefficients {
    pub teaching: f64,
    pub office: f64,
    pub dormitory: f64,
    pub other_living: f64,
    pub logistics: f64,
}

impl BasicCoefficients {
    pub fn get(&self, category: AreaCategory) -> f64 {
        match category {
            AreaCategory::Teaching => self.teaching,
            AreaCategory::Office => self.office,
            AreaCategory::Dormitory => self.dormitory,
            AreaCategory::OtherLiving => self.other_living,
            AreaCategory::Logistics => self.logistics,
        }
    }
}

/// 单类用房的分层补贴系数（㎡/人）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierCoefficients {
    pub master: f64,
    pub doctorate: f64,
    pub international: f64,
}

impl TierCoefficients {
    pub fn get(&self, tier: DegreeTier) -> f64 {
        match tier {
            DegreeTier::Master => self.master,
            DegreeTier::Doctorate => self.doctorate,
            DegreeTier::International => self.international,
        }
    }
}

/// 补贴系数（5 类用房 × 3 个层次）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubsidizedCoefficients {
    pub teaching: TierCoefficients,
    pub office: TierCoefficients,
    pub dormitory: TierCoefficients,
    pub other_living: TierCoefficients,
    pub logistics: TierCoefficients,
}

impl SubsidizedCoefficients {
    pub fn get(&self, category: AreaCategory) -> &TierCoefficients {
        match category {
            AreaCategory::Teaching => &self.teaching,
            AreaCategory::Office => &self.office,
            AreaCategory::Dormitory => &self.dormitory,
            AreaCategory::OtherLiving => &self.other_living,
            AreaCategory::Logistics => &self.logistics,
        }
    }
}

// ==========================================
// 基础应配面积标准
// ==========================================

pub const BASIC_X: BasicCoefficients = BasicCoefficients {
    teaching: 12.95,
    office: 2.0,
    dormitory: 10.0,
    other_living: 2.0,
    logistics: 1.55,
};

pub const BASIC_Y: BasicCoefficients = BasicCoefficients {
    teaching: 15.95,
    office: 2.0,
    dormitory: 10.0,
    other_living: 2.0,
    logistics: 1.55,
};

pub const BASIC_Z: BasicCoefficients = BasicCoefficients {
    teaching: 7.95,
    office: 2.0,
    dormitory: 10.0,
    other_living: 2.0,
    logistics: 1.55,
};

pub const BASIC_M: BasicCoefficients = BasicCoefficients {
    teaching: 53.5,
    office: 3.5,
    dormitory: 10.0,
    other_living: 2.5,
    logistics: 2.0,
};

pub const BASIC_T: BasicCoefficients = BasicCoefficients {
    teaching: 22.0,
    office: 2.2,
    dormitory: 10.0,
    other_living: 2.0,
    logistics: 1.8,
};

// ==========================================
// 补贴应配面积标准
// ==========================================
// 五类学校目前共用同一张补贴表
pub const SUBSIDIZED_COMMON: SubsidizedCoefficients = SubsidizedCoefficients {
    teaching: TierCoefficients {
        master: 3.0,
        doctorate: 3.0,
        international: 0.0,
    },
    office: TierCoefficients {
        master: 2.0,
        doctorate: 2.0,
        international: 0.0,
    },
    dormitory: TierCoefficients {
        master: 5.0,
        doctorate: 14.0,
        international: 0.0,
    },
    other_living: TierCoefficients {
        master: 0.0,
        doctorate: 0.0,
        international: 19.0,
    },
    logistics: TierCoefficients {
        master: 0.0,
        doctorate: 0.0,
        international: 0.0,
    },
};

// ==========================================
// AreaStandardsTable - 标准查询
// ==========================================
pub struct AreaStandardsTable;

impl AreaStandardsTable {
    pub fn basic(calc_type: CalcType) -> &'static BasicCoefficients {
        match calc_type {
            CalcType::X => &BASIC_X,
            CalcType::Y => &BASIC_Y,
            CalcType::Z => &BASIC_Z,
            CalcType::M => &BASIC_M,
            CalcType::T => &BASIC_T,
        }
    }

    pub fn subsidized(calc_type: CalcType) -> &'static SubsidizedCoefficients {
        match calc_type {
            CalcType::X | CalcType::Y | CalcType::Z | CalcType::M | CalcType::T => {
                &SUBSIDIZED_COMMON
            }
        }
    }
}
