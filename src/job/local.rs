//! # 本地执行后端
//!
//! 在工作目录中直接运行 `sh -c <command>`，要求 sqm 在 PATH 中。镜像字段被忽略。
//!
//! ## 依赖关系
//! - 被 `job/mod.rs` 导出
//! - 被 `commands/run.rs` 使用

use super::{run_command, Backend, JobSpec};
use crate::error::Result;

use std::path::Path;
use std::process::Command;

/// 本地 shell 后端
#[derive(Debug, Clone)]
pub struct LocalBackend {
    shell: String,
}

impl Default for LocalBackend {
    fn default() -> Self {
        LocalBackend {
            shell: "sh".to_string(),
        }
    }
}

impl Backend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    fn execute(&self, job: &JobSpec, workdir: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(&job.command).current_dir(workdir);
        run_command(cmd, &self.shell, job)?;
        Ok(())
    }
}
