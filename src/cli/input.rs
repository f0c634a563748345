//! # input 子命令 CLI 定义
//!
//! 由分子结构生成 sqm 输入文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs`, `cli/run.rs`, `cli/submit.rs` 使用
//! - 参数传递给 `commands/input.rs`

use crate::models::{Theory, Unit};
use clap::Args;
use std::path::PathBuf;

/// 计算设置（input / run / submit 共用）
#[derive(Args, Debug, Clone)]
pub struct CalcArgs {
    /// Semi-empirical theory (MNDO, AM1, PM3, PM6, DFTB, ...)
    #[arg(long, default_value = "AM1")]
    pub theory: Theory,

    /// Formal charge (overrides the molecule's charge)
    #[arg(long, allow_hyphen_values = true)]
    pub charge: Option<i32>,

    /// Coordinates in the structure file are in bohr instead of angstrom
    #[arg(long, default_value_t = false)]
    pub bohr: bool,
}

impl CalcArgs {
    pub fn length_unit(&self) -> Unit {
        if self.bohr {
            Unit::Bohr
        } else {
            Unit::Angstrom
        }
    }
}

/// input 子命令参数
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Molecule structure file (.xyz)
    pub structure: PathBuf,

    #[command(flatten)]
    pub calc: CalcArgs,

    /// Write the input to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
