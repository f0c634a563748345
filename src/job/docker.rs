//! # 容器执行后端
//!
//! 将工作目录挂载到容器的 `/work`，在镜像中运行作业命令：
//! ```text
//! docker run --rm -v <workdir>:/work -w /work <image> sh -c "<command>"
//! ```
//! 容器引擎可替换（如 `podman`）。
//!
//! ## 依赖关系
//! - 被 `job/mod.rs` 导出
//! - 被 `commands/run.rs` 使用

use super::{run_command, Backend, JobSpec};
use crate::error::{Result, SqmError};

use std::path::Path;
use std::process::Command;

/// 容器内挂载点
const CONTAINER_WORKDIR: &str = "/work";

/// 容器后端
#[derive(Debug, Clone)]
pub struct DockerBackend {
    engine: String,
}

impl DockerBackend {
    pub fn new(engine: impl Into<String>) -> Self {
        DockerBackend {
            engine: engine.into(),
        }
    }

    /// 组装容器运行参数
    fn arguments(&self, job: &JobSpec, workdir: &Path) -> Result<Vec<String>> {
        if job.image.trim().is_empty() {
            return Err(SqmError::InvalidArgument(format!(
                "Job '{}' has no container image (use --image or SQMKIT_IMAGE)",
                job.name
            )));
        }

        // 挂载需要绝对路径
        let host_dir = workdir
            .canonicalize()
            .map_err(|e| SqmError::FileReadError {
                path: workdir.display().to_string(),
                source: e,
            })?;

        Ok(vec![
            "run".to_string(),
            "--rm".to_string(),
            "-v".to_string(),
            format!("{}:{}", host_dir.display(), CONTAINER_WORKDIR),
            "-w".to_string(),
            CONTAINER_WORKDIR.to_string(),
            job.image.clone(),
            "sh".to_string(),
            "-c".to_string(),
            job.command.clone(),
        ])
    }
}

impl Default for DockerBackend {
    fn default() -> Self {
        DockerBackend::new("docker")
    }
}

impl Backend for DockerBackend {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn execute(&self, job: &JobSpec, workdir: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.engine);
        cmd.args(self.arguments(job, workdir)?);
        run_command(cmd, &self.engine, job)?;
        Ok(())
    }
}
