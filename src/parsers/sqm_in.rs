//! # sqm 输入文件生成
//!
//! 将分子结构与半经验方法渲染为 sqm 的 namelist 输入 (`mol.in`)。
//!
//! ## mol.in 格式说明
//! ```text
//! SQM input for <molecule name>
//!  &qmmm
//!  qm_theory='AM1', qmcharge=0, printcharges=1, maxcyc=0
//!  /
//!  8  O  0.00000000 0.00000000 0.11700000
//!  ...
//! ```
//! `maxcyc=0` 固定为单点计算，不对外暴露。
//!
//! ## 依赖关系
//! - 被 `commands/input.rs`, `commands/run.rs`, `commands/submit.rs` 使用
//! - 使用 `models/molecule.rs`, `models/theory.rs`

use crate::error::Result;
use crate::models::{Molecule, Theory, Unit};

/// 输入文件名
pub const INPUT_FILE: &str = "mol.in";

/// 生成 mol.in 的各行
///
/// 原子数为零时只输出 4 行头部，交由 sqm 自行报错。
pub fn build_input(mol: &Molecule, theory: Theory, charge: i32) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(mol.atoms.len() + 4);

    lines.push(format!("SQM input for {}", mol.name));
    lines.push(" &qmmm".to_string());
    lines.push(format!(
        " qm_theory='{}', qmcharge={}, printcharges=1, maxcyc=0",
        theory, charge
    ));
    lines.push(" /".to_string());

    let positions = mol.positions_in(Unit::Angstrom)?;
    for (atom, pos) in mol.atoms.iter().zip(positions) {
        lines.push(format!(
            " {}  {}  {:.8} {:.8} {:.8}",
            atom.atnum, atom.name, pos[0], pos[1], pos[2]
        ));
    }

    Ok(lines)
}

/// 生成完整的 mol.in 文本
pub fn to_sqm_input_string(mol: &Molecule, theory: Theory, charge: i32) -> Result<String> {
    Ok(build_input(mol, theory, charge)?.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Atom;

    fn methane() -> Molecule {
        Molecule::new(
            "methane",
            vec![
                Atom::new(6, "C", [0.0, 0.0, 0.0]),
                Atom::new(1, "H1", [0.629118, 0.629118, 0.629118]),
                Atom::new(1, "H2", [-0.629118, -0.629118, 0.629118]),
                Atom::new(1, "H3", [-0.629118, 0.629118, -0.629118]),
                Atom::new(1, "H4", [0.629118, -0.629118, -0.629118]),
            ],
        )
    }

    #[test]
    fn test_header_lines() {
        let lines = build_input(&methane(), Theory::Am1, 0).unwrap();
        assert_eq!(lines[0], "SQM input for methane");
        assert_eq!(lines[1], " &qmmm");
        assert_eq!(
            lines[2],
            " qm_theory='AM1', qmcharge=0, printcharges=1, maxcyc=0"
        );
        assert_eq!(lines[3], " /");
    }

    #[test]
    fn test_atom_line_format() {
        let lines = build_input(&methane(), Theory::Pm3, 0).unwrap();
        assert_eq!(lines[4], " 6  C  0.00000000 0.00000000 0.00000000");
        assert_eq!(lines[5], " 1  H1  0.62911800 0.62911800 0.62911800");
    }

    #[test]
    fn test_line_count_and_field_count() {
        let mol = methane();
        let lines = build_input(&mol, Theory::Dftb, 0).unwrap();
        assert_eq!(lines.len(), mol.atoms.len() + 4);

        for line in &lines[4..] {
            assert_eq!(line.split_whitespace().count(), 5);
        }
    }

    #[test]
    fn test_coordinates_have_eight_decimals() {
        let mol = Molecule::new(
            "odd",
            vec![Atom::new(1, "H", [1.0 / 3.0, -123.456789012345, 1e-12])],
        );
        let lines = build_input(&mol, Theory::Am1, 0).unwrap();

        for coord in lines[4].split_whitespace().skip(2) {
            let (_, decimals) = coord.split_once('.').unwrap();
            assert_eq!(decimals.len(), 8, "coordinate '{}'", coord);
        }
    }

    #[test]
    fn test_empty_molecule_gives_header_only() {
        let mol = Molecule::new("empty", vec![]);
        let lines = build_input(&mol, Theory::Am1, 0).unwrap();
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_charge_and_theory_embedded_verbatim() {
        let lines = build_input(&methane(), Theory::PddgPm3, -2).unwrap();
        assert_eq!(
            lines[2],
            " qm_theory='PDDG/PM3', qmcharge=-2, printcharges=1, maxcyc=0"
        );
    }

    #[test]
    fn test_bohr_coordinates_are_written_in_angstrom() {
        let mol = Molecule::new("h", vec![Atom::new(1, "H", [1.0, 0.0, 0.0])])
            .with_length_unit(Unit::Bohr);
        let text = to_sqm_input_string(&mol, Theory::Am1, 0).unwrap();
        assert!(text.ends_with(" 1  H  0.52917721 0.00000000 0.00000000"));
    }
}
