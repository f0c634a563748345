//! # 作业执行模块
//!
//! 将一次 sqm 计算描述为作业（镜像、命令、输入文件），交给执行后端运行，
//! 完成后通过回调读取输出文件。
//!
//! ## 功能
//! - `JobSpec`: 作业描述
//! - `Backend`: 执行后端 trait（本地 shell / 容器）
//! - `run_job`: 写入输入、执行、完成回调
//!
//! 外部程序失败（找不到命令、非零退出）在这里报告，输出解析不负责此类错误。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 子模块: local, docker

pub mod docker;
pub mod local;

pub use docker::DockerBackend;
pub use local::LocalBackend;

use crate::error::{Result, SqmError};
use crate::utils::output;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// sqm 默认执行命令
pub const SQM_COMMAND: &str = "sqm -i mol.in -o mol.out";

/// 作业描述
#[derive(Debug, Clone)]
pub struct JobSpec {
    /// 作业名称
    pub name: String,
    /// 容器镜像
    pub image: String,
    /// shell 命令
    pub command: String,
    /// 输入文件名 -> 文件内容
    pub inputs: BTreeMap<String, String>,
}

impl JobSpec {
    pub fn new(name: impl Into<String>, image: impl Into<String>, command: impl Into<String>) -> Self {
        JobSpec {
            name: name.into(),
            image: image.into(),
            command: command.into(),
            inputs: BTreeMap::new(),
        }
    }

    pub fn with_input(mut self, filename: impl Into<String>, content: impl Into<String>) -> Self {
        self.inputs.insert(filename.into(), content.into());
        self
    }
}

/// 执行后端
pub trait Backend {
    /// 后端名称（用于日志）
    fn name(&self) -> &'static str;

    /// 在 `workdir` 中执行作业命令，输入文件已写入
    fn execute(&self, job: &JobSpec, workdir: &Path) -> Result<()>;
}

/// 已完成的作业，可读取输出文件
#[derive(Debug)]
pub struct FinishedJob {
    name: String,
    workdir: PathBuf,
}

impl FinishedJob {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// 按行读取输出文件
    pub fn get_output(&self, filename: &str) -> Result<Vec<String>> {
        let path = self.workdir.join(filename);
        if !path.exists() {
            return Err(SqmError::MissingOutput {
                job: self.name.clone(),
                file: filename.to_string(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| SqmError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(content.lines().map(str::to_string).collect())
    }
}

/// 运行作业并在完成后调用 `when_finished`
pub fn run_job<B, T, F>(backend: &B, job: &JobSpec, workdir: &Path, when_finished: F) -> Result<T>
where
    B: Backend + ?Sized,
    F: FnOnce(&FinishedJob) -> Result<T>,
{
    fs::create_dir_all(workdir).map_err(|e| SqmError::FileWriteError {
        path: workdir.display().to_string(),
        source: e,
    })?;

    for (filename, content) in &job.inputs {
        let path = workdir.join(filename);
        fs::write(&path, content).map_err(|e| SqmError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
    }

    output::print_debug(&format!(
        "Running job '{}' via {} in {}",
        job.name,
        backend.name(),
        workdir.display()
    ));

    backend.execute(job, workdir)?;

    let finished = FinishedJob {
        name: job.name.clone(),
        workdir: workdir.to_path_buf(),
    };
    when_finished(&finished)
}

/// 执行外部命令并把失败转换为作业错误
pub(crate) fn run_command(mut cmd: Command, program: &str, job: &JobSpec) -> Result<Output> {
    let out = cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SqmError::CommandNotFound {
                command: program.to_string(),
            }
        } else {
            SqmError::CommandFailed {
                command: program.to_string(),
                stderr: e.to_string(),
            }
        }
    })?;

    if !out.status.success() {
        return Err(SqmError::JobFailed {
            job: job.name.clone(),
            status: out.status.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// 记录调用并写出固定输出的测试后端
    struct FakeBackend {
        output: Option<&'static str>,
        seen_inputs: RefCell<Vec<String>>,
    }

    impl Backend for FakeBackend {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn execute(&self, job: &JobSpec, workdir: &Path) -> Result<()> {
            for filename in job.inputs.keys() {
                let content = fs::read_to_string(workdir.join(filename)).unwrap();
                self.seen_inputs.borrow_mut().push(content);
            }
            if let Some(out) = self.output {
                fs::write(workdir.join("mol.out"), out).unwrap();
            }
            Ok(())
        }
    }

    #[test]
    fn test_run_job_writes_inputs_and_calls_back() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend {
            output: Some("line one\nline two\n"),
            seen_inputs: RefCell::new(Vec::new()),
        };
        let job = JobSpec::new("test", "image", SQM_COMMAND).with_input("mol.in", "hello");

        let lines = run_job(&backend, &job, dir.path(), |f| {
            assert_eq!(f.name(), "test");
            f.get_output("mol.out")
        })
        .unwrap();

        assert_eq!(lines, vec!["line one", "line two"]);
        assert_eq!(backend.seen_inputs.borrow().as_slice(), ["hello"]);
    }

    #[test]
    fn test_missing_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend {
            output: None,
            seen_inputs: RefCell::new(Vec::new()),
        };
        let job = JobSpec::new("empty", "image", SQM_COMMAND);

        let err = run_job(&backend, &job, dir.path(), |f| f.get_output("mol.out")).unwrap_err();
        assert!(matches!(err, SqmError::MissingOutput { ref file, .. } if file == "mol.out"));
    }
}
