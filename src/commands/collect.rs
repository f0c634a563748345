//! # collect 命令实现
//!
//! 收集 sqm 作业目录中的计算结果并汇总。
//!
//! ## 功能
//! - 递归查找每个作业目录中的 mol.out
//! - 并行解析（未完成的计算跳过）
//! - 按生成热排序输出终端表格
//! - 写出 CSV 汇总
//!
//! ## 依赖关系
//! - 使用 `cli/collect.rs` 定义的参数
//! - 使用 `batch/`, `parsers/sqm_out.rs`
//! - 使用 `utils/output.rs`

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::collect::CollectArgs;
use crate::error::{Result, SqmError};
use crate::models::SqmResult;
use crate::parsers::sqm_out;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// sqm 正常结束时打印的标记
const FINISHED_MARKER: &str = "Calculation Completed";

/// 单个作业的汇总
#[derive(Debug, Clone)]
struct JobSummary {
    name: String,
    result: SqmResult,
}

/// 排名表行
#[derive(Debug, Clone, Tabled)]
struct ResultRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Structure")]
    structure: String,
    #[tabled(rename = "ΔHf (kcal/mol)")]
    heat: String,
    #[tabled(rename = "|μ| (D)")]
    dipole: String,
    #[tabled(rename = "Atoms")]
    atoms: String,
}

/// 执行 collect 命令
pub fn execute(args: CollectArgs) -> Result<()> {
    output::print_header("Collecting sqm Results");

    // 验证目录
    if !args.jobs_root.is_dir() {
        return Err(SqmError::DirectoryNotFound {
            path: args.jobs_root.display().to_string(),
        });
    }

    let files = FileCollector::new(args.jobs_root.clone())
        .with_pattern(&args.output_name)?
        .recursive(true)
        .collect();

    if files.is_empty() {
        return Err(SqmError::NoFilesFound {
            pattern: args.output_name.clone(),
        });
    }
    output::print_info(&format!(
        "Found {} '{}' files under '{}'",
        files.len(),
        args.output_name,
        args.jobs_root.display()
    ));

    let (values, summary) = BatchRunner::new(args.jobs).run(files, |path| process_output(path))?;

    for (path, reason) in &summary.skips {
        output::print_skip(&format!("{}: {}", path.display(), reason));
    }
    for (path, err) in &summary.failures {
        output::print_error(&format!("{}: {}", path.display(), err));
    }

    let mut jobs: Vec<JobSummary> = values.into_iter().map(|(_, job)| job).collect();
    if jobs.is_empty() {
        output::print_warning("No completed sqm calculations found.");
        return Ok(());
    }

    // 按生成热排序，缺失能量的排在最后
    jobs.sort_by(|a, b| {
        let ea = a.result.potential_energy().unwrap_or(f64::INFINITY);
        let eb = b.result.potential_energy().unwrap_or(f64::INFINITY);
        ea.partial_cmp(&eb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let rows: Vec<ResultRow> = jobs
        .iter()
        .take(args.top_n)
        .enumerate()
        .map(|(i, job)| ResultRow {
            rank: i + 1,
            structure: job.name.clone(),
            heat: fmt_opt(job.result.potential_energy(), 4),
            dipole: fmt_opt(job.result.dipole_debye(), 3),
            atoms: job
                .result
                .charges()
                .map(|q| q.len().to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    output::print_header(&format!(
        "Top {} Structures by Heat of Formation",
        rows.len()
    ));
    println!("{}", Table::new(&rows));

    save_results_csv(&jobs, &args.output)?;
    output::print_success(&format!("Summary saved to '{}'", args.output.display()));

    output::print_separator();
    output::print_done(&format!(
        "{} parsed, {} skipped, {} failed (of {})",
        summary.success,
        summary.skipped,
        summary.failed,
        summary.total()
    ));

    Ok(())
}

/// 解析单个输出文件
fn process_output(path: &PathBuf) -> ProcessResult<JobSummary> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return ProcessResult::Failed(e.to_string()),
    };

    if !content.contains(FINISHED_MARKER) {
        return ProcessResult::Skipped("calculation not finished".to_string());
    }

    match sqm_out::parse_sqm_output(content.lines()) {
        Ok(result) => ProcessResult::Success(JobSummary {
            name: job_name(path),
            result,
        }),
        Err(e) => ProcessResult::Failed(e.to_string()),
    }
}

/// 作业名称取输出文件所在目录名
fn job_name(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "-".to_string())
}

/// 保存结果到 CSV
fn save_results_csv(jobs: &[JobSummary], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "rank",
        "structure",
        "heat_of_formation_kcal_mol",
        "dipole_x",
        "dipole_y",
        "dipole_z",
        "dipole_debye",
        "n_atoms",
        "total_mulliken_charge",
        "n_orbitals",
    ])?;

    for (i, job) in jobs.iter().enumerate() {
        let r = &job.result;
        let dipole = r.dipole();
        let component = |k: usize| {
            dipole
                .and_then(|d| d.get(k))
                .map(|v| format!("{:.6}", v))
                .unwrap_or_default()
        };

        wtr.write_record(&[
            (i + 1).to_string(),
            job.name.clone(),
            r.potential_energy()
                .map(|h| format!("{:.8}", h))
                .unwrap_or_default(),
            component(0),
            component(1),
            component(2),
            r.dipole_debye()
                .map(|d| format!("{:.6}", d))
                .unwrap_or_default(),
            r.charges().map(|q| q.len().to_string()).unwrap_or_default(),
            r.charges()
                .map(|q| format!("{:.6}", q.iter().sum::<f64>()))
                .unwrap_or_default(),
            r.mo_energies()
                .map(|m| m.len().to_string())
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush().map_err(|e| SqmError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_job(root: &Path, name: &str, body: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("mol.out"), body).unwrap();
    }

    fn finished(heat: f64) -> String {
        format!(
            " Heat of formation = {} kcal/mol\n QM DIPOLE 0.0 0.0 0.5\n --------- Calculation Completed ----------\n",
            heat
        )
    }

    #[test]
    fn test_collect_writes_sorted_csv() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("jobs");
        write_job(&root, "high", &finished(-5.0));
        write_job(&root, "low", &finished(-20.0));
        write_job(&root, "running", " Heat of formation = -99.0 kcal/mol\n");
        write_job(
            &root,
            "broken",
            "Atomic Charges for Step 1\nnot a header\nCalculation Completed\n",
        );

        let csv_path = dir.path().join("summary.csv");
        execute(CollectArgs {
            jobs_root: root,
            output_name: "mol.out".to_string(),
            output: csv_path.clone(),
            top_n: 10,
            jobs: 2,
        })
        .unwrap();

        let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
        let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "low");
        assert_eq!(&records[0][2], "-20.00000000");
        assert_eq!(&records[1][1], "high");
        assert_eq!(&records[1][5], "0.500000");
    }

    #[test]
    fn test_process_output_states() {
        let dir = tempfile::tempdir().unwrap();
        write_job(dir.path(), "a", "no marker here\n");
        let p = dir.path().join("a").join("mol.out");
        assert!(matches!(process_output(&p), ProcessResult::Skipped(_)));

        write_job(dir.path(), "b", &finished(-1.5));
        let p = dir.path().join("b").join("mol.out");
        match process_output(&p) {
            ProcessResult::Success(job) => {
                assert_eq!(job.name, "b");
                assert_eq!(job.result.potential_energy(), Some(-1.5));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_missing_root() {
        let err = execute(CollectArgs {
            jobs_root: PathBuf::from("/nonexistent/jobs"),
            output_name: "mol.out".to_string(),
            output: PathBuf::from("unused.csv"),
            top_n: 5,
            jobs: 1,
        })
        .unwrap_err();
        assert!(matches!(err, SqmError::DirectoryNotFound { .. }));
    }
}
