//! # submit 命令实现
//!
//! 批量生成 sqm 作业并提交到 Slurm。
//!
//! ## 功能
//! - 收集结构文件并按范围选择
//! - 每个分子生成作业目录: mol.in, mol.xyz, submit.sbatch
//! - 可选自动 sbatch（提交后不等待，结果由 `collect` 收集）
//!
//! ## 依赖关系
//! - 使用 `cli/submit.rs` 定义的参数
//! - 使用 `batch/collector.rs`, `parsers/`, `utils/slurm.rs`, `utils/output.rs`

use super::input::load_molecule;
use crate::batch::FileCollector;
use crate::cli::submit::SubmitArgs;
use crate::error::{Result, SqmError};
use crate::parsers::{sqm_in, xyz};
use crate::utils::output;
use crate::utils::slurm::{generate_sbatch_script, sanitize_job_name, SlurmConfig};

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// sbatch 脚本文件名
const SBATCH_FILE: &str = "submit.sbatch";

/// 执行 submit 命令
pub fn execute(args: SubmitArgs) -> Result<()> {
    output::print_header("Batch sqm Job Preparation");

    // 验证结构目录
    if !args.struct_dir.exists() {
        return Err(SqmError::DirectoryNotFound {
            path: args.struct_dir.display().to_string(),
        });
    }

    // 收集结构文件
    let files = FileCollector::new(args.struct_dir.clone())
        .with_pattern(&args.pattern)?
        .collect();
    if files.is_empty() {
        return Err(SqmError::NoFilesFound {
            pattern: args.pattern.clone(),
        });
    }
    output::print_info(&format!("Found {} structure files", files.len()));

    // 解析范围
    let indices = match args.range {
        Some(ref range) => parse_range(range, files.len())?,
        None => (1..=files.len()).collect(),
    };
    output::print_info(&format!("Selected {} structures", indices.len()));

    // 创建作业根目录
    fs::create_dir_all(&args.jobs_root).map_err(|e| SqmError::FileWriteError {
        path: args.jobs_root.display().to_string(),
        source: e,
    })?;

    let mut generated = Vec::new();
    let mut submitted = Vec::new();
    let mut taken = BTreeSet::new();

    for &i in &indices {
        if i < 1 || i > files.len() {
            output::print_warning(&format!("Index {} out of range, skipping", i));
            continue;
        }
        let structure = &files[i - 1];

        let (job_name, sbatch_path) = match prepare_job(&args, structure, &mut taken)? {
            Some(prepared) => prepared,
            None => continue,
        };
        generated.push(job_name.clone());

        // 提交作业
        if args.submit && !args.dry_run {
            match submit_sbatch(&sbatch_path) {
                Ok(msg) => {
                    output::print_success(&format!("Submitted: {} - {}", job_name, msg));
                    submitted.push(job_name);
                }
                Err(e) => output::print_error(&format!("{}: {}", job_name, e)),
            }
        } else {
            output::print_info(&format!("[DRY] Generated job: {}", sbatch_path.display()));
        }
    }

    output::print_separator();
    output::print_done(&format!(
        "Processed {} entries, generated {} jobs, submitted {} jobs",
        indices.len(),
        generated.len(),
        submitted.len()
    ));

    Ok(())
}

/// 为单个分子生成作业目录，已存在且未要求覆盖时返回 None
///
/// `taken` 记录本次运行已分配的作业名，规范化后重名的结构加数字后缀。
fn prepare_job(
    args: &SubmitArgs,
    structure: &Path,
    taken: &mut BTreeSet<String>,
) -> Result<Option<(String, PathBuf)>> {
    let mol = load_molecule(structure, &args.calc)?;

    let stem = structure
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(mol.name.as_str());
    let base = sanitize_job_name(stem)?;
    let job_name = unique_job_name(&base, taken);
    if job_name != base {
        output::print_warning(&format!(
            "Job name '{}' already used by another structure, '{}' goes to '{}'",
            base,
            structure.display(),
            job_name
        ));
    }
    let job_dir = args.jobs_root.join(&job_name);

    if job_dir.join(sqm_in::INPUT_FILE).exists() && !args.overwrite {
        output::print_skip(&format!("{} already prepared", job_name));
        return Ok(None);
    }

    fs::create_dir_all(job_dir.join("slurm_logs")).map_err(|e| SqmError::FileWriteError {
        path: job_dir.display().to_string(),
        source: e,
    })?;

    let input = sqm_in::to_sqm_input_string(&mol, args.calc.theory, mol.formal_charge())?;
    write_file(&job_dir.join(sqm_in::INPUT_FILE), &format!("{}\n", input))?;
    write_file(&job_dir.join("mol.xyz"), &xyz::to_xyz_string(&mol)?)?;

    let modules: Vec<String> = args
        .modules
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let config = SlurmConfig {
        job_name: job_name.clone(),
        partition: args.partition.clone(),
        nodes: args.nodes,
        ntasks: args.ntasks,
        cpus_per_task: args.cpus_per_task,
        mem_per_cpu: args.mem_per_cpu.clone(),
        time_limit: args.time.clone(),
        modules,
    };

    // sbatch 中使用绝对路径
    let abs_dir = job_dir.canonicalize().unwrap_or_else(|_| job_dir.clone());
    let sbatch_path = job_dir.join(SBATCH_FILE);
    write_file(&sbatch_path, &generate_sbatch_script(&config, &abs_dir, &args.exec))?;

    Ok(Some((job_name, sbatch_path)))
}

/// 返回未被占用的作业名并登记
fn unique_job_name(base: &str, taken: &mut BTreeSet<String>) -> String {
    let mut name = base.to_string();
    let mut n = 2;
    while taken.contains(&name) {
        name = format!("{}_{}", base, n);
        n += 1;
    }
    taken.insert(name.clone());
    name
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| SqmError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 调用 sbatch 提交，返回 sbatch 的输出
fn submit_sbatch(sbatch_path: &Path) -> Result<String> {
    let job_dir = sbatch_path.parent().unwrap_or_else(|| Path::new("."));
    let out = Command::new("sbatch")
        .arg(SBATCH_FILE)
        .current_dir(job_dir)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SqmError::CommandNotFound {
                    command: "sbatch".to_string(),
                }
            } else {
                SqmError::CommandFailed {
                    command: "sbatch".to_string(),
                    stderr: e.to_string(),
                }
            }
        })?;

    if !out.status.success() {
        return Err(SqmError::CommandFailed {
            command: format!("sbatch {}", sbatch_path.display()),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
}

/// 解析范围字符串 (e.g., "1-5,8,10-12")，区间上界截断到 `limit`
fn parse_range(expr: &str, limit: usize) -> Result<Vec<usize>> {
    let mut items = Vec::new();

    for chunk in expr.split(',') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }

        if let Some((a, b)) = chunk.split_once('-') {
            let a: usize = a
                .trim()
                .parse()
                .map_err(|_| SqmError::InvalidRange(chunk.to_string()))?;
            let b: usize = b
                .trim()
                .parse()
                .map_err(|_| SqmError::InvalidRange(chunk.to_string()))?;
            if a < 1 || b < a {
                return Err(SqmError::InvalidRange(chunk.to_string()));
            }
            if b > limit {
                output::print_warning(&format!(
                    "Range {} exceeds {} structures, truncated",
                    chunk, limit
                ));
            }
            items.extend(a..=b.min(limit));
        } else {
            let v: usize = chunk
                .parse()
                .map_err(|_| SqmError::InvalidRange(chunk.to_string()))?;
            if v < 1 {
                return Err(SqmError::InvalidRange(chunk.to_string()));
            }
            items.push(v);
        }
    }

    items.sort();
    items.dedup();
    Ok(items)
}
