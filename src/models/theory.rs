//! # 半经验方法
//!
//! sqm 支持的 `qm_theory` 取值，固定的封闭集合。
//!
//! ## 依赖关系
//! - 被 `parsers/sqm_in.rs`, `cli/` 使用

use crate::error::{Result, SqmError};
use std::fmt;
use std::str::FromStr;

/// 半经验理论方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theory {
    Mndo,
    MndoD,
    Am1,
    Am1D,
    Pm3,
    Pddg,
    PddgMndo,
    PddgPm3,
    Rm1,
    Pm3Carb1,
    Pm3Mais,
    Pm6,
    Dftb,
    Pm3Znb,
    Pm6D,
    Pm6Dh,
}

impl Theory {
    pub const ALL: [Theory; 16] = [
        Theory::Mndo,
        Theory::MndoD,
        Theory::Am1,
        Theory::Am1D,
        Theory::Pm3,
        Theory::Pddg,
        Theory::PddgMndo,
        Theory::PddgPm3,
        Theory::Rm1,
        Theory::Pm3Carb1,
        Theory::Pm3Mais,
        Theory::Pm6,
        Theory::Dftb,
        Theory::Pm3Znb,
        Theory::Pm6D,
        Theory::Pm6Dh,
    ];

    /// 写入 `qm_theory='...'` 的标识符
    pub fn as_str(self) -> &'static str {
        match self {
            Theory::Mndo => "MNDO",
            Theory::MndoD => "MNDO/d",
            Theory::Am1 => "AM1",
            Theory::Am1D => "AM1/d",
            Theory::Pm3 => "PM3",
            Theory::Pddg => "PDDG",
            Theory::PddgMndo => "PDDG/MNDO",
            Theory::PddgPm3 => "PDDG/PM3",
            Theory::Rm1 => "RM1",
            Theory::Pm3Carb1 => "PM3CARB1",
            Theory::Pm3Mais => "PM3-MAIS",
            Theory::Pm6 => "PM6",
            Theory::Dftb => "DFTB",
            Theory::Pm3Znb => "PM3-ZnB",
            Theory::Pm6D => "PM6-D",
            Theory::Pm6Dh => "PM6-DH+",
        }
    }
}

impl fmt::Display for Theory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theory {
    type Err = SqmError;

    /// 不区分大小写匹配；集合外的名称直接报错，不回退到默认值
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Theory::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SqmError::UnknownTheory(s.to_string()))
    }
}
