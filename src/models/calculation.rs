//! # sqm 计算结果数据模型
//!
//! 结果名称 -> 带单位物理量 的映射。键只增不改：同一结果重复出现时保留首个值。
//!
//! ## 依赖关系
//! - 被 `parsers/sqm_out.rs` 使用
//! - 被 `commands/parse.rs`, `commands/run.rs`, `commands/collect.rs` 使用

use crate::models::units::{Quantity, Unit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 结果名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKey {
    PotentialEnergy,
    Dipole,
    Charges,
    MoEnergies,
}

impl ResultKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultKey::PotentialEnergy => "potential_energy",
            ResultKey::Dipole => "dipole",
            ResultKey::Charges => "charges",
            ResultKey::MoEnergies => "mo_energies",
        }
    }
}

impl fmt::Display for ResultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// sqm 单点计算结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqmResult {
    values: BTreeMap<ResultKey, Quantity>,
}

impl SqmResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入结果；键已存在时不覆盖，返回 false
    pub fn insert(&mut self, key: ResultKey, value: Quantity) -> bool {
        if self.values.contains_key(&key) {
            return false;
        }
        self.values.insert(key, value);
        true
    }

    pub fn get(&self, key: ResultKey) -> Option<&Quantity> {
        self.values.get(&key)
    }

    pub fn contains(&self, key: ResultKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResultKey, &Quantity)> {
        self.values.iter()
    }

    /// 生成热 (kcal/mol)
    pub fn potential_energy(&self) -> Option<f64> {
        self.get(ResultKey::PotentialEnergy)?.as_scalar()
    }

    /// 偶极矩向量，单位沿用 sqm 输出的 e·Å（未经物理核实）
    pub fn dipole(&self) -> Option<&[f64]> {
        self.get(ResultKey::Dipole)?.as_slice()
    }

    /// Mulliken 电荷 (e)
    pub fn charges(&self) -> Option<&[f64]> {
        self.get(ResultKey::Charges)?.as_slice()
    }

    /// 分子轨道能级 (eV)
    pub fn mo_energies(&self) -> Option<&[f64]> {
        self.get(ResultKey::MoEnergies)?.as_slice()
    }

    /// 偶极矩大小 (Debye)
    pub fn dipole_debye(&self) -> Option<f64> {
        let d = self.get(ResultKey::Dipole)?;
        d.to(Unit::Debye).ok().map(|q| q.magnitude())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_never_overwrites() {
        let mut r = SqmResult::new();
        assert!(r.insert(ResultKey::PotentialEnergy, Quantity::scalar(-1.0, Unit::KcalPerMol)));
        assert!(!r.insert(ResultKey::PotentialEnergy, Quantity::scalar(-2.0, Unit::KcalPerMol)));
        assert_eq!(r.potential_energy(), Some(-1.0));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn test_typed_accessors() {
        let mut r = SqmResult::new();
        r.insert(
            ResultKey::Charges,
            Quantity::vector(vec![0.1, -0.1], Unit::ElementaryCharge),
        );
        assert_eq!(r.charges(), Some(&[0.1, -0.1][..]));
        assert!(r.dipole().is_none());
        assert!(r.dipole_debye().is_none());
    }

    #[test]
    fn test_json_keys() {
        let mut r = SqmResult::new();
        r.insert(ResultKey::MoEnergies, Quantity::vector(vec![-10.0], Unit::ElectronVolt));
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"mo_energies":{"value":[-10.0],"unit":"eV"}}"#);
    }
}
