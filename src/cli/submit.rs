//! # submit 子命令 CLI 定义
//!
//! 批量生成 sqm 作业目录并提交到 Slurm
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/submit.rs`

use super::input::CalcArgs;
use clap::Args;
use std::path::PathBuf;

/// submit 子命令参数
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Directory containing molecule structure files
    #[arg(long)]
    pub struct_dir: PathBuf,

    /// Glob pattern for structure files
    #[arg(long, default_value = "*.xyz")]
    pub pattern: String,

    /// Range of structures to prepare, 1-based in sorted order (e.g., '1-20,25,30-32')
    #[arg(long)]
    pub range: Option<String>,

    /// Root directory for job folders
    #[arg(long, default_value = "jobs")]
    pub jobs_root: PathBuf,

    #[command(flatten)]
    pub calc: CalcArgs,

    /// Command executed in each job directory
    #[arg(long, default_value = crate::job::SQM_COMMAND)]
    pub exec: String,

    /// Module list to load (comma-separated)
    #[arg(long, default_value = "", env = "SQMKIT_MODULES")]
    pub modules: String,

    // ─────────────────────────────────────────────────────────────
    // Slurm options
    // ─────────────────────────────────────────────────────────────
    /// Slurm partition
    #[arg(long, default_value = "cpu", env = "SQMKIT_PARTITION")]
    pub partition: String,

    /// Number of nodes
    #[arg(long, default_value_t = 1)]
    pub nodes: u32,

    /// Number of tasks
    #[arg(long, default_value_t = 1)]
    pub ntasks: u32,

    /// CPUs per task
    #[arg(long, default_value_t = 1)]
    pub cpus_per_task: u32,

    /// Memory per CPU
    #[arg(long, default_value = "2G")]
    pub mem_per_cpu: String,

    /// Time limit (e.g., '01:00:00')
    #[arg(long, default_value = "01:00:00")]
    pub time: String,

    // ─────────────────────────────────────────────────────────────
    // Execution control
    // ─────────────────────────────────────────────────────────────
    /// Only generate job files, do not submit
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Submit jobs to Slurm after generation
    #[arg(long, default_value_t = false)]
    pub submit: bool,

    /// Overwrite existing job directories
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
