//! # run 命令实现
//!
//! 单点计算：生成 mol.in，交给执行后端运行 sqm，完成后解析 mol.out。
//!
//! ## 功能
//! - 读取分子结构
//! - 选择本地或容器后端
//! - 临时或指定工作目录
//! - 以 parse 命令相同的格式报告结果
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `job/`, `parsers/sqm_in.rs`, `parsers/sqm_out.rs`
//! - 使用 `commands/input.rs`, `commands/parse.rs`

use super::input::load_molecule;
use super::parse::report;
use crate::cli::run::{BackendKind, RunArgs};
use crate::error::{Result, SqmError};
use crate::job::{self, Backend, DockerBackend, JobSpec, LocalBackend};
use crate::models::{Molecule, SqmResult, Theory};
use crate::parsers::{sqm_in, sqm_out};
use crate::utils::{output, progress};

use std::fs;
use std::io;
use std::path::Path;

/// 执行 run 命令
pub fn execute(args: RunArgs) -> Result<()> {
    let mol = load_molecule(&args.structure, &args.calc)?;

    let backend: Box<dyn Backend> = match args.backend {
        BackendKind::Local => Box::new(LocalBackend::default()),
        BackendKind::Docker => Box::new(DockerBackend::new(&args.engine)),
    };

    let job = build_job(&mol, args.calc.theory, &args.image, &args.command)?;

    let spinner = progress::create_spinner(&format!(
        "{} single point on {} ({})",
        args.calc.theory,
        mol.name,
        backend.name()
    ));

    let result = match args.workdir {
        Some(ref dir) => run_single_point(backend.as_ref(), &job, dir),
        None => {
            let tmp = tempfile::Builder::new()
                .prefix("sqmkit-")
                .tempdir()
                .map_err(|e| SqmError::FileWriteError {
                    path: std::env::temp_dir().display().to_string(),
                    source: e,
                })?;
            run_single_point(backend.as_ref(), &job, tmp.path())
        }
    };

    spinner.finish_and_clear();
    let result = result?;

    if let Some(ref dir) = args.workdir {
        output::print_info(&format!("Job files kept in '{}'", dir.display()));
    }

    report(&result, Some(&mol), &args.report)
}

/// 组装 sqm 作业描述
pub fn build_job(mol: &Molecule, theory: Theory, image: &str, command: &str) -> Result<JobSpec> {
    let input = sqm_in::to_sqm_input_string(mol, theory, mol.formal_charge())?;

    Ok(JobSpec::new(
        format!("sqm single point, {}", mol.name),
        image,
        command,
    )
    .with_input(sqm_in::INPUT_FILE, input))
}

/// 运行作业并在完成回调中解析 mol.out
///
/// 工作目录中旧的 mol.out 在运行前删除，结果只来自本次计算。
pub fn run_single_point<B: Backend + ?Sized>(
    backend: &B,
    job: &JobSpec,
    workdir: &Path,
) -> Result<SqmResult> {
    let stale = workdir.join(sqm_out::OUTPUT_FILE);
    match fs::remove_file(&stale) {
        Ok(()) => output::print_debug(&format!("Removed previous {}", stale.display())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(SqmError::FileWriteError {
                path: stale.display().to_string(),
                source: e,
            })
        }
    }

    job::run_job(backend, job, workdir, |finished| {
        let lines = finished.get_output(sqm_out::OUTPUT_FILE)?;
        output::print_debug(&format!(
            "Job '{}' finished, {} output line(s) in {}",
            finished.name(),
            lines.len(),
            finished.workdir().display()
        ));
        sqm_out::parse_sqm_output(&lines)
    })
}
