//! # Slurm 脚本生成工具
//!
//! 生成 sbatch 提交脚本，用于把 sqm 单点计算作为异步作业提交。
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 使用 `regex` 规范化作业名称

use crate::error::{Result, SqmError};
use regex::Regex;
use std::path::Path;

/// Slurm 作业配置
pub struct SlurmConfig {
    pub job_name: String,
    pub partition: String,
    pub nodes: u32,
    pub ntasks: u32,
    pub cpus_per_task: u32,
    pub mem_per_cpu: String,
    pub time_limit: String,
    pub modules: Vec<String>,
}

impl Default for SlurmConfig {
    fn default() -> Self {
        SlurmConfig {
            job_name: "sqm".to_string(),
            partition: "cpu".to_string(),
            nodes: 1,
            ntasks: 1,
            cpus_per_task: 1,
            mem_per_cpu: "2G".to_string(),
            time_limit: "01:00:00".to_string(),
            modules: vec![],
        }
    }
}

/// 生成 sbatch 脚本内容
pub fn generate_sbatch_script(config: &SlurmConfig, workdir: &Path, exec_cmd: &str) -> String {
    let module_loads = config
        .modules
        .iter()
        .map(|m| format!("module load {}", m))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"#!/bin/bash
#SBATCH --partition {}
#SBATCH --nodes={}
#SBATCH --mem-per-cpu {}
#SBATCH --time {}
#SBATCH -c {}
#SBATCH -n {}
#SBATCH -J {}
#SBATCH -o slurm_logs/%x.out
#SBATCH -e slurm_logs/%x.err

set -euo pipefail

module purge 2>&1 || true
{}

cd "{}"
echo "PWD=$(pwd)"
echo Running: {}
{}
"#,
        config.partition,
        config.nodes,
        config.mem_per_cpu,
        config.time_limit,
        config.cpus_per_task,
        config.ntasks,
        config.job_name,
        module_loads,
        workdir.display(),
        shell_quote(exec_cmd),
        exec_cmd,
    )
}

/// 单引号包裹，使字符串在 shell 中按字面输出
fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

/// 把分子名称规范化为可用作目录名与作业名的字符串
pub fn sanitize_job_name(name: &str) -> Result<String> {
    let pattern = Regex::new(r"[^A-Za-z0-9._-]+").map_err(|e| SqmError::Other(e.to_string()))?;
    let cleaned = pattern.replace_all(name.trim(), "_");
    let cleaned = cleaned.trim_matches('_');

    if cleaned.is_empty() {
        Ok("molecule".to_string())
    } else {
        Ok(cleaned.to_string())
    }
}
