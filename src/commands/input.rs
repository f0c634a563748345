//! # input 命令实现
//!
//! 读取分子结构并生成 sqm 输入文件。
//!
//! ## 依赖关系
//! - 使用 `cli/input.rs` 定义的参数
//! - 使用 `parsers/xyz.rs`, `parsers/sqm_in.rs`
//! - `load_molecule` 同时被 `commands/run.rs`, `commands/submit.rs` 使用

use crate::cli::input::{CalcArgs, InputArgs};
use crate::error::{Result, SqmError};
use crate::models::Molecule;
use crate::parsers::{self, sqm_in};
use crate::utils::output;

use std::fs;
use std::path::Path;

/// 执行 input 命令
pub fn execute(args: InputArgs) -> Result<()> {
    let mol = load_molecule(&args.structure, &args.calc)?;
    let text = sqm_in::to_sqm_input_string(&mol, args.calc.theory, mol.formal_charge())?;

    match args.output {
        Some(ref path) => {
            fs::write(path, format!("{}\n", text)).map_err(|e| SqmError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
            output::print_success(&format!(
                "{} ({}, {} atoms) -> {}",
                mol.name,
                mol.formula(),
                mol.atoms.len(),
                path.display()
            ));
        }
        None => println!("{}", text),
    }

    Ok(())
}

/// 读取分子并应用命令行中的电荷
pub fn load_molecule(path: &Path, calc: &CalcArgs) -> Result<Molecule> {
    let mut mol = parsers::read_molecule_file(path, calc.length_unit())?;
    if let Some(charge) = calc.charge {
        mol = mol.with_charge(charge);
    }

    if mol.atoms.is_empty() {
        output::print_warning(&format!("Molecule '{}' has no atoms", mol.name));
    }
    output::print_debug(&format!(
        "Loaded {} ({} atoms, charge {}) from {}",
        mol.name,
        mol.atoms.len(),
        mol.formal_charge(),
        path.display()
    ));

    Ok(mol)
}
