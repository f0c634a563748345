//! # parse 子命令 CLI 定义
//!
//! 解析 sqm 输出文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs`, `cli/run.rs` 使用
//! - 参数传递给 `commands/parse.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 结果输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable tables
    Table,
    /// JSON object keyed by result name
    Json,
    /// CSV rows (result, index, value, unit)
    Csv,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Table => write!(f, "table"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Csv => write!(f, "csv"),
        }
    }
}

/// 结果显示选项（parse / run 共用）
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: ReportFormat,

    /// Also print the per-atom Mulliken charge table
    #[arg(long, default_value_t = false)]
    pub charges: bool,

    /// Draw an MO energy level diagram to this PNG file
    #[arg(long)]
    pub plot_levels: Option<PathBuf>,
}

/// parse 子命令参数
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// sqm output file (mol.out)
    pub output_file: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}
