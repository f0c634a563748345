//! # 分子结构数据模型
//!
//! 有限分子（非周期体系）的统一表示，作为 sqm 输入生成的数据来源。
//!
//! ## 依赖关系
//! - 被 `parsers/xyz.rs`, `parsers/sqm_in.rs` 使用
//! - 使用 `models/units.rs`

use crate::error::{Result, SqmError};
use crate::models::units::Unit;
use periodic_table_on_an_enum::Element;
use serde::{Deserialize, Serialize};

/// 元素符号 -> 原子序数（不区分大小写）
pub fn atomic_number(symbol: &str) -> Result<u32> {
    let mut chars = symbol.chars();
    let normalized: String = match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    };

    Element::from_symbol(&normalized)
        .map(|el| el.get_atomic_number() as u32)
        .ok_or_else(|| SqmError::UnknownElement(symbol.to_string()))
}

/// 原子序数 -> 元素符号
pub fn element_symbol(atnum: u32) -> Option<&'static str> {
    if atnum == 0 {
        return None;
    }
    Element::from_atomic_number(atnum as usize).map(|el| el.get_symbol())
}

/// 原子信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atom {
    /// 原子序数
    pub atnum: u32,

    /// 原子名称（如 "C", "C1", "HW"）
    pub name: String,

    /// 笛卡尔坐标，单位见 `Molecule::length_unit`
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(atnum: u32, name: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            atnum,
            name: name.into(),
            position,
        }
    }

    /// 以元素符号作为原子名称创建
    pub fn from_symbol(symbol: &str, position: [f64; 3]) -> Result<Self> {
        let atnum = atomic_number(symbol)?;
        let name = element_symbol(atnum).unwrap_or(symbol);
        Ok(Atom::new(atnum, name, position))
    }

    pub fn symbol(&self) -> &'static str {
        element_symbol(self.atnum).unwrap_or("X")
    }
}

/// 分子
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Molecule {
    /// 分子名称
    pub name: String,

    /// 原子列表（顺序即输入顺序）
    pub atoms: Vec<Atom>,

    /// 坐标长度单位
    pub length_unit: Unit,

    /// 形式电荷
    pub charge: i32,
}

impl Molecule {
    pub fn new(name: impl Into<String>, atoms: Vec<Atom>) -> Self {
        Molecule {
            name: name.into(),
            atoms,
            length_unit: Unit::Angstrom,
            charge: 0,
        }
    }

    pub fn with_charge(mut self, charge: i32) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_length_unit(mut self, unit: Unit) -> Self {
        self.length_unit = unit;
        self
    }

    pub fn formal_charge(&self) -> i32 {
        self.charge
    }

    /// 按指定长度单位返回各原子坐标
    pub fn positions_in(&self, unit: Unit) -> Result<Vec<[f64; 3]>> {
        let k = self.length_unit.conversion_factor(unit)?;
        Ok(self
            .atoms
            .iter()
            .map(|a| [a.position[0] * k, a.position[1] * k, a.position[2] * k])
            .collect())
    }

    /// 计算化学式 (Hill 顺序：C, H, 其余按字母)
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.symbol()).or_insert(0) += 1;
        }

        let fmt = |el: &str, count: usize| {
            if count == 1 {
                el.to_string()
            } else {
                format!("{}{}", el, count)
            }
        };

        let mut parts = Vec::new();
        if let Some(c) = counts.remove("C") {
            parts.push(fmt("C", c));
            if let Some(h) = counts.remove("H") {
                parts.push(fmt("H", h));
            }
        }
        parts.extend(counts.into_iter().map(|(el, n)| fmt(el, n)));
        parts.join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Molecule {
        Molecule::new(
            "water",
            vec![
                Atom::new(8, "O", [0.0, 0.0, 0.117]),
                Atom::new(1, "H1", [0.0, 0.757, -0.469]),
                Atom::new(1, "H2", [0.0, -0.757, -0.469]),
            ],
        )
    }

    #[test]
    fn test_atomic_number_lookup() {
        assert_eq!(atomic_number("H").unwrap(), 1);
        assert_eq!(atomic_number("cl").unwrap(), 17);
        assert_eq!(atomic_number("Xe").unwrap(), 54);
        assert_eq!(atomic_number("RN").unwrap(), 86);
        assert!(matches!(atomic_number("Qq"), Err(SqmError::UnknownElement(_))));
        assert!(matches!(atomic_number(""), Err(SqmError::UnknownElement(_))));
    }

    #[test]
    fn test_element_symbol() {
        assert_eq!(element_symbol(6), Some("C"));
        assert_eq!(element_symbol(17), Some("Cl"));
        assert_eq!(element_symbol(0), None);
        assert_eq!(element_symbol(200), None);
    }

    #[test]
    fn test_formula_hill_order() {
        let mut mol = water();
        assert_eq!(mol.formula(), "H2O");

        mol.atoms.push(Atom::new(6, "C", [1.0, 0.0, 0.0]));
        assert_eq!(mol.formula(), "CH2O");
    }

    #[test]
    fn test_positions_in_angstrom_from_bohr() {
        let mol = Molecule::new("h", vec![Atom::new(1, "H", [1.0, 2.0, 0.0])])
            .with_length_unit(Unit::Bohr);
        let pos = mol.positions_in(Unit::Angstrom).unwrap();
        assert!((pos[0][0] - 0.529177).abs() < 1e-6);
        assert!((pos[0][1] - 1.058354).abs() < 1e-6);
    }

    #[test]
    fn test_formal_charge() {
        let mol = water().with_charge(-1);
        assert_eq!(mol.formal_charge(), -1);
    }
}
