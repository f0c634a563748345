//! # 物理单位
//!
//! 为 sqm 结果数值附加量纲，并支持同量纲单位间的换算。
//!
//! 每个单位归属一个量纲，并记录到该量纲基准单位的换算因子：
//! - 电荷: e
//! - 偶极矩: e·Å
//! - 能量: eV
//! - 长度: Å
//!
//! ## 依赖关系
//! - 被 `models/calculation.rs`, `models/molecule.rs`, `parsers/` 使用
//! - 使用 `serde` 序列化

use crate::error::{Result, SqmError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 1 kcal/mol 对应的 eV
const KCAL_PER_MOL_IN_EV: f64 = 0.043_364_104;
/// 1 kJ/mol 对应的 eV
const KJ_PER_MOL_IN_EV: f64 = 0.010_364_269_9;
/// 1 Hartree 对应的 eV (CODATA 2018)
const HARTREE_IN_EV: f64 = 27.211_386_245_988;
/// 1 bohr 对应的 Å (CODATA 2018)
const BOHR_IN_ANGSTROM: f64 = 0.529_177_210_903;
/// 1 Debye 对应的 e·Å
const DEBYE_IN_E_ANGSTROM: f64 = 0.208_194_34;

/// 物理量纲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Charge,
    DipoleMoment,
    Energy,
    Length,
}

/// 支持的单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "e")]
    ElementaryCharge,
    #[serde(rename = "e*angstrom")]
    ElementaryChargeAngstrom,
    #[serde(rename = "debye")]
    Debye,
    #[serde(rename = "eV")]
    ElectronVolt,
    #[serde(rename = "kcal/mol")]
    KcalPerMol,
    #[serde(rename = "kJ/mol")]
    KjPerMol,
    #[serde(rename = "hartree")]
    Hartree,
    #[serde(rename = "angstrom")]
    Angstrom,
    #[serde(rename = "bohr")]
    Bohr,
}

impl Unit {
    pub fn dimension(self) -> Dimension {
        match self {
            Unit::ElementaryCharge => Dimension::Charge,
            Unit::ElementaryChargeAngstrom | Unit::Debye => Dimension::DipoleMoment,
            Unit::ElectronVolt | Unit::KcalPerMol | Unit::KjPerMol | Unit::Hartree => {
                Dimension::Energy
            }
            Unit::Angstrom | Unit::Bohr => Dimension::Length,
        }
    }

    /// 到量纲基准单位的换算因子
    fn factor(self) -> f64 {
        match self {
            Unit::ElementaryCharge => 1.0,
            Unit::ElementaryChargeAngstrom => 1.0,
            Unit::Debye => DEBYE_IN_E_ANGSTROM,
            Unit::ElectronVolt => 1.0,
            Unit::KcalPerMol => KCAL_PER_MOL_IN_EV,
            Unit::KjPerMol => KJ_PER_MOL_IN_EV,
            Unit::Hartree => HARTREE_IN_EV,
            Unit::Angstrom => 1.0,
            Unit::Bohr => BOHR_IN_ANGSTROM,
        }
    }

    /// 计算从 `self` 到 `target` 的乘法因子
    pub fn conversion_factor(self, target: Unit) -> Result<f64> {
        if self.dimension() != target.dimension() {
            return Err(SqmError::IncompatibleUnits {
                from: self.to_string(),
                to: target.to_string(),
            });
        }
        Ok(self.factor() / target.factor())
    }

    /// 单位换算 (标量)
    pub fn convert(self, value: f64, target: Unit) -> Result<f64> {
        Ok(value * self.conversion_factor(target)?)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unit::ElementaryCharge => "e",
            Unit::ElementaryChargeAngstrom => "e·Å",
            Unit::Debye => "D",
            Unit::ElectronVolt => "eV",
            Unit::KcalPerMol => "kcal/mol",
            Unit::KjPerMol => "kJ/mol",
            Unit::Hartree => "Eh",
            Unit::Angstrom => "Å",
            Unit::Bohr => "bohr",
        };
        write!(f, "{}", s)
    }
}

/// 数值部分：标量或向量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    Vector(Vec<f64>),
}

/// 带单位的物理量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: Value,
    pub unit: Unit,
}

impl Quantity {
    pub fn scalar(value: f64, unit: Unit) -> Self {
        Quantity {
            value: Value::Scalar(value),
            unit,
        }
    }

    pub fn vector(values: Vec<f64>, unit: Unit) -> Self {
        Quantity {
            value: Value::Vector(values),
            unit,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self.value {
            Value::Scalar(v) => Some(v),
            Value::Vector(_) => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[f64]> {
        match &self.value {
            Value::Scalar(_) => None,
            Value::Vector(v) => Some(v),
        }
    }

    /// 转换为另一单位（量纲必须一致）
    pub fn to(&self, unit: Unit) -> Result<Quantity> {
        let k = self.unit.conversion_factor(unit)?;
        let value = match &self.value {
            Value::Scalar(v) => Value::Scalar(v * k),
            Value::Vector(vs) => Value::Vector(vs.iter().map(|v| v * k).collect()),
        };
        Ok(Quantity { value, unit })
    }

    /// 向量的欧几里得范数；标量返回绝对值
    pub fn magnitude(&self) -> f64 {
        match &self.value {
            Value::Scalar(v) => v.abs(),
            Value::Vector(vs) => vs.iter().map(|v| v * v).sum::<f64>().sqrt(),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::Scalar(v) => write!(f, "{:.6} {}", v, self.unit),
            Value::Vector(vs) => {
                let items: Vec<String> = vs.iter().map(|v| format!("{:.6}", v)).collect();
                write!(f, "[{}] {}", items.join(", "), self.unit)
            }
        }
    }
}
