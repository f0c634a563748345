//! # XYZ 分子结构解析器
//!
//! 读取标准 XYZ 格式，作为 sqm 输入的分子来源。
//!
//! ## .xyz 格式说明
//! ```text
//! 3
//! water
//! O    0.000000    0.000000    0.117300
//! H1   0.000000    0.757200   -0.469200
//! H2   0.000000   -0.757200   -0.469200
//! ```
//! 第二行非空时作为分子名称，否则使用文件名。原子标签保留为原子名称，
//! 元素由标签开头的字母确定（`H1` -> H，`CA` 先尝试 Ca）。
//!
//! ## 依赖关系
//! - 被 `commands/input.rs`, `commands/run.rs`, `commands/submit.rs` 使用
//! - 使用 `models/molecule.rs`

use crate::error::{Result, SqmError};
use crate::models::molecule::{atomic_number, element_symbol};
use crate::models::{Atom, Molecule, Unit};
use std::fs;
use std::path::Path;

/// 解析 .xyz 文件
pub fn parse_xyz_file(path: &Path, length_unit: Unit) -> Result<Molecule> {
    let content = fs::read_to_string(path).map_err(|e| SqmError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let default_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("molecule");

    parse_xyz_content(&content, default_name, length_unit).map_err(|e| match e {
        SqmError::ParseError { format, reason, .. } => SqmError::ParseError {
            format,
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

/// 从字符串内容解析 XYZ 格式
pub fn parse_xyz_content(content: &str, default_name: &str, length_unit: Unit) -> Result<Molecule> {
    let mut lines = content.lines();

    let count_line = lines.next().ok_or_else(|| parse_error(default_name, "Empty file"))?;
    let natoms: usize = count_line
        .trim()
        .parse()
        .map_err(|_| parse_error(default_name, &format!("Invalid atom count '{}'", count_line.trim())))?;

    let name = match lines.next().map(str::trim) {
        Some(comment) if !comment.is_empty() => comment.to_string(),
        _ => default_name.to_string(),
    };

    let mut atoms = Vec::with_capacity(natoms);
    for line in lines.filter(|l| !l.trim().is_empty()).take(natoms) {
        atoms.push(parse_atom_line(line, default_name)?);
    }

    if atoms.len() != natoms {
        return Err(parse_error(
            default_name,
            &format!("Expected {} atoms, found {}", natoms, atoms.len()),
        ));
    }

    Ok(Molecule::new(name, atoms).with_length_unit(length_unit))
}

/// 生成 XYZ 文本
pub fn to_xyz_string(mol: &Molecule) -> Result<String> {
    let positions = mol.positions_in(Unit::Angstrom)?;
    let mut result = format!("{}\n{}\n", mol.atoms.len(), mol.name);
    for (atom, pos) in mol.atoms.iter().zip(positions) {
        result.push_str(&format!(
            "{:<4} {:14.8} {:14.8} {:14.8}\n",
            atom.name, pos[0], pos[1], pos[2]
        ));
    }
    Ok(result)
}

fn parse_atom_line(line: &str, source: &str) -> Result<Atom> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(parse_error(source, &format!("Invalid atom line '{}'", line.trim())));
    }

    let label = parts[0];
    let mut position = [0.0; 3];
    for (i, token) in parts[1..4].iter().enumerate() {
        position[i] = token
            .parse()
            .map_err(|_| parse_error(source, &format!("Invalid coordinate '{}'", token)))?;
    }

    Ok(Atom::new(element_from_label(label)?, label, position))
}

/// 由原子标签推断原子序数
fn element_from_label(label: &str) -> Result<u32> {
    // 纯数字标签视为原子序数
    if let Ok(z) = label.parse::<u32>() {
        return match element_symbol(z) {
            Some(_) => Ok(z),
            None => Err(SqmError::UnknownElement(label.to_string())),
        };
    }

    let letters: String = label.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    if letters.len() >= 2 {
        if let Ok(z) = atomic_number(&letters[..2]) {
            return Ok(z);
        }
    }
    match letters.get(..1) {
        Some(first) => atomic_number(first),
        None => Err(SqmError::UnknownElement(label.to_string())),
    }
}

fn parse_error(source: &str, reason: &str) -> SqmError {
    SqmError::ParseError {
        format: "xyz".to_string(),
        path: source.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = r#"3
water
O    0.000000    0.000000    0.117300
H1   0.000000    0.757200   -0.469200
H2   0.000000   -0.757200   -0.469200
"#;

    #[test]
    fn test_parse_water() {
        let mol = parse_xyz_content(WATER, "fallback", Unit::Angstrom).unwrap();
        assert_eq!(mol.name, "water");
        assert_eq!(mol.atoms.len(), 3);
        assert_eq!(mol.atoms[0].atnum, 8);
        assert_eq!(mol.atoms[1].atnum, 1);
        assert_eq!(mol.atoms[1].name, "H1");
        assert!((mol.atoms[2].position[1] - (-0.7572)).abs() < 1e-9);
        assert_eq!(mol.formula(), "H2O");
    }

    #[test]
    fn test_blank_comment_uses_default_name() {
        let content = "1\n\nHe 0 0 0\n";
        let mol = parse_xyz_content(content, "helium", Unit::Angstrom).unwrap();
        assert_eq!(mol.name, "helium");
    }

    #[test]
    fn test_element_from_label() {
        assert_eq!(element_from_label("C").unwrap(), 6);
        assert_eq!(element_from_label("Cl3").unwrap(), 17);
        assert_eq!(element_from_label("HW").unwrap(), 1);
        assert_eq!(element_from_label("8").unwrap(), 8);
        assert!(element_from_label("Qz").is_err());
        assert!(element_from_label("*").is_err());
    }

    #[test]
    fn test_numeric_label_out_of_table() {
        assert!(matches!(element_from_label("0"), Err(SqmError::UnknownElement(_))));
        assert!(matches!(element_from_label("999"), Err(SqmError::UnknownElement(_))));

        let err = parse_xyz_content("1\nx\n0 0 0 0\n", "x", Unit::Angstrom).unwrap_err();
        assert!(matches!(err, SqmError::UnknownElement(ref l) if l == "0"));
    }

    #[test]
    fn test_truncated_file() {
        let content = "3\nbroken\nO 0 0 0\n";
        let err = parse_xyz_content(content, "broken", Unit::Angstrom).unwrap_err();
        assert!(matches!(err, SqmError::ParseError { .. }));
    }

    #[test]
    fn test_bad_coordinate() {
        let content = "1\nx\nC 0.0 abc 0.0\n";
        assert!(parse_xyz_content(content, "x", Unit::Angstrom).is_err());
    }

    #[test]
    fn test_xyz_round_trip() {
        let mol = parse_xyz_content(WATER, "water", Unit::Angstrom).unwrap();
        let text = to_xyz_string(&mol).unwrap();
        let parsed = parse_xyz_content(&text, "round_trip", Unit::Angstrom).unwrap();

        assert_eq!(parsed.atoms.len(), 3);
        assert_eq!(parsed.name, "water");
        assert!((parsed.atoms[0].position[2] - 0.1173).abs() < 1e-8);
    }

    #[test]
    fn test_parse_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xyz");
        fs::write(&path, "two\n").unwrap();

        match parse_xyz_file(&path, Unit::Angstrom) {
            Err(SqmError::ParseError { path: p, .. }) => assert!(p.ends_with("bad.xyz")),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
