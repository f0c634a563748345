//! # collect 子命令 CLI 定义
//!
//! 收集 sqm 作业目录中的计算结果
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/collect.rs`

use clap::Args;
use std::path::PathBuf;

/// collect 子命令参数
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Root directory containing sqm job folders
    pub jobs_root: PathBuf,

    /// Output file name to look for in each job folder
    #[arg(long, default_value = crate::parsers::sqm_out::OUTPUT_FILE)]
    pub output_name: String,

    /// CSV summary file
    #[arg(long, default_value = "sqm_results.csv")]
    pub output: PathBuf,

    /// Number of structures to print in the ranking table
    #[arg(long, default_value_t = 10)]
    pub top_n: usize,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}
