//! # 解析器模块
//!
//! 提供分子结构读取、sqm 输入生成与 sqm 输出解析。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: xyz, sqm_in, sqm_out

pub mod sqm_in;
pub mod sqm_out;
pub mod xyz;

use crate::error::{Result, SqmError};
use crate::models::{Molecule, Unit};
use std::path::Path;

/// 从文件路径推断格式并读取分子
pub fn read_molecule_file(path: &Path, length_unit: Unit) -> Result<Molecule> {
    if !path.exists() {
        return Err(SqmError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xyz" => xyz::parse_xyz_file(path, length_unit),
        _ => Err(SqmError::UnsupportedFormat(format!(
            "Cannot determine molecule format for: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mol.pdb");
        std::fs::write(&path, "ATOM").unwrap();
        assert!(matches!(
            read_molecule_file(&path, Unit::Angstrom),
            Err(SqmError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_molecule_file(Path::new("/nonexistent/a.xyz"), Unit::Angstrom),
            Err(SqmError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_reads_xyz_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h2.XYZ");
        std::fs::write(&path, "2\n\nH 0 0 0\nH 0 0 0.74\n").unwrap();

        let mol = read_molecule_file(&path, Unit::Angstrom).unwrap();
        assert_eq!(mol.name, "h2");
        assert_eq!(mol.atoms.len(), 2);
    }
}
