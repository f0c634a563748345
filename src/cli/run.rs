//! # run 子命令 CLI 定义
//!
//! 单点计算：生成输入 -> 执行 sqm -> 解析输出
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use super::input::CalcArgs;
use super::parse::ReportArgs;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 执行后端选择
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum BackendKind {
    /// Run `sqm` from PATH on this machine
    Local,
    /// Run inside a container image (docker/podman)
    Docker,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Docker => write!(f, "docker"),
        }
    }
}

/// run 子命令参数
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Molecule structure file (.xyz)
    pub structure: PathBuf,

    #[command(flatten)]
    pub calc: CalcArgs,

    /// Execution backend
    #[arg(long, value_enum, default_value = "local", env = "SQMKIT_BACKEND")]
    pub backend: BackendKind,

    /// Container image providing `sqm` (docker backend)
    #[arg(long, default_value = "", env = "SQMKIT_IMAGE")]
    pub image: String,

    /// Container engine executable (docker backend)
    #[arg(long, default_value = "docker", env = "SQMKIT_ENGINE")]
    pub engine: String,

    /// Command executed in the job directory
    #[arg(long, default_value = crate::job::SQM_COMMAND)]
    pub command: String,

    /// Keep job files in this directory instead of a temporary one
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    #[command(flatten)]
    pub report: ReportArgs,
}
