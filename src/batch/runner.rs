//! # 批量执行器
//!
//! 并行执行批量处理任务。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代
//! - 进度条显示
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/collect.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{Result, SqmError};
use crate::utils::progress;

use rayon::prelude::*;
use std::path::PathBuf;

/// 单个文件处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult<T> {
    /// 处理成功
    Success(T),
    /// 跳过（如计算未完成）
    Skipped(String),
    /// 处理失败
    Failed(String), // 错误信息
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 跳过详情
    pub skips: Vec<(PathBuf, String)>,
    /// 失败详情
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchResult {
    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器（0 表示使用全部 CPU）
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    /// 并行处理文件列表，按输入顺序返回成功项
    pub fn run<T, F>(&self, files: Vec<PathBuf>, processor: F) -> Result<(Vec<(PathBuf, T)>, BatchResult)>
    where
        T: Send,
        F: Fn(&PathBuf) -> ProcessResult<T> + Sync + Send,
    {
        let pb = progress::create_progress_bar(files.len() as u64, "Processing");

        // 配置 rayon 线程池
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| SqmError::Other(format!("Failed to build thread pool: {}", e)))?;

        let results: Vec<(PathBuf, ProcessResult<T>)> = pool.install(|| {
            files
                .into_par_iter()
                .map(|file| {
                    let result = processor(&file);
                    pb.inc(1);
                    (file, result)
                })
                .collect()
        });

        pb.finish_and_clear();

        // 汇总结果
        let mut summary = BatchResult::default();
        let mut values = Vec::new();
        for (file, result) in results {
            match result {
                ProcessResult::Success(v) => {
                    summary.success += 1;
                    values.push((file, v));
                }
                ProcessResult::Skipped(reason) => {
                    summary.skipped += 1;
                    summary.skips.push((file, reason));
                }
                ProcessResult::Failed(err) => {
                    summary.failed += 1;
                    summary.failures.push((file, err));
                }
            }
        }

        Ok((values, summary))
    }
}
