//! # parse 命令实现
//!
//! 解析 sqm 输出文件并以表格 / JSON / CSV 报告结果。
//!
//! ## 功能
//! - 解析 mol.out
//! - 汇总表格（能量、偶极矩、电荷、轨道能级）
//! - 可选 Mulliken 电荷明细表
//! - 可选绘制分子轨道能级图
//!
//! ## 依赖关系
//! - 使用 `cli/parse.rs` 定义的参数
//! - 使用 `parsers/sqm_out.rs`
//! - 报告函数同时被 `commands/run.rs` 使用

use crate::cli::parse::{ParseArgs, ReportArgs, ReportFormat};
use crate::error::{Result, SqmError};
use crate::models::{Molecule, SqmResult, Unit};
use crate::models::units::Value;
use crate::parsers::sqm_out;
use crate::utils::output;

use std::io;
use std::path::Path;
use tabled::{Table, Tabled};

/// 汇总表行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: String,
}

/// 电荷表行
#[derive(Debug, Clone, Tabled)]
struct ChargeRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Atom")]
    atom: String,
    #[tabled(rename = "Mulliken (e)")]
    charge: String,
}

/// 执行 parse 命令
pub fn execute(args: ParseArgs) -> Result<()> {
    if !args.output_file.exists() {
        return Err(SqmError::FileNotFound {
            path: args.output_file.display().to_string(),
        });
    }

    let result = sqm_out::parse_sqm_output_file(&args.output_file)?;
    output::print_debug(&format!(
        "Parsed {} result(s) from {}",
        result.len(),
        args.output_file.display()
    ));

    report(&result, None, &args.report)
}

/// 按所选格式输出结果
pub fn report(result: &SqmResult, mol: Option<&Molecule>, args: &ReportArgs) -> Result<()> {
    match args.format {
        ReportFormat::Table => print_tables(result, mol, args.charges),
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        ReportFormat::Csv => write_csv(result, io::stdout())?,
    }

    if let Some(ref path) = args.plot_levels {
        match result.mo_energies() {
            Some(levels) if !levels.is_empty() => {
                plot_levels(levels, path)?;
                output::print_success(&format!("MO level diagram saved to '{}'", path.display()));
            }
            _ => output::print_warning("No MO eigenvalues in output, skipping level diagram"),
        }
    }

    Ok(())
}

/// 生成汇总表行
fn summary_rows(result: &SqmResult) -> Vec<SummaryRow> {
    let mut rows = Vec::new();

    if let Some(h) = result.potential_energy() {
        rows.push(SummaryRow {
            quantity: "Heat of formation".to_string(),
            value: format!("{:.6}", h),
            unit: Unit::KcalPerMol.to_string(),
        });
        if let Ok(ev) = Unit::KcalPerMol.convert(h, Unit::ElectronVolt) {
            rows.push(SummaryRow {
                quantity: "Heat of formation".to_string(),
                value: format!("{:.6}", ev),
                unit: Unit::ElectronVolt.to_string(),
            });
        }
    }

    if let Some(d) = result.dipole() {
        let comps: Vec<String> = d.iter().map(|v| format!("{:.4}", v)).collect();
        rows.push(SummaryRow {
            quantity: "Dipole (x, y, z)".to_string(),
            value: comps.join(", "),
            unit: format!("{} (unverified)", Unit::ElementaryChargeAngstrom),
        });
        if let Some(debye) = result.dipole_debye() {
            rows.push(SummaryRow {
                quantity: "|Dipole|".to_string(),
                value: format!("{:.4}", debye),
                unit: Unit::Debye.to_string(),
            });
        }
    }

    if let Some(q) = result.charges() {
        rows.push(SummaryRow {
            quantity: format!("Mulliken charges ({} atoms)", q.len()),
            value: format!("sum = {:.4}", q.iter().sum::<f64>()),
            unit: Unit::ElementaryCharge.to_string(),
        });
    }

    if let Some(mo) = result.mo_energies() {
        let lo = mo.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = mo.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        rows.push(SummaryRow {
            quantity: format!("MO eigenvalues ({} orbitals)", mo.len()),
            value: if mo.is_empty() {
                "-".to_string()
            } else {
                format!("{:.3} .. {:.3}", lo, hi)
            },
            unit: Unit::ElectronVolt.to_string(),
        });
    }

    rows
}

fn print_tables(result: &SqmResult, mol: Option<&Molecule>, show_charges: bool) {
    if result.is_empty() {
        output::print_warning("No recognised results found in sqm output");
        return;
    }

    output::print_header("sqm Results");
    println!("{}", Table::new(summary_rows(result)));

    if show_charges {
        if let Some(q) = result.charges() {
            let rows: Vec<ChargeRow> = q
                .iter()
                .enumerate()
                .map(|(i, c)| ChargeRow {
                    index: i + 1,
                    atom: mol
                        .and_then(|m| m.atoms.get(i))
                        .map(|a| a.name.clone())
                        .unwrap_or_else(|| "-".to_string()),
                    charge: format!("{:+.4}", c),
                })
                .collect();
            output::print_header("Mulliken Charges");
            println!("{}", Table::new(rows));
        }
    }
}

/// 写出 CSV：每个数值一行
fn write_csv<W: io::Write>(result: &SqmResult, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["result", "index", "value", "unit"])?;

    for (key, quantity) in result.iter() {
        let unit = quantity.unit.to_string();
        match &quantity.value {
            Value::Scalar(v) => {
                let value = format!("{:.10}", v);
                wtr.write_record([key.as_str(), "", value.as_str(), unit.as_str()])?;
            }
            Value::Vector(vs) => {
                for (i, v) in vs.iter().enumerate() {
                    let index = i.to_string();
                    let value = format!("{:.10}", v);
                    wtr.write_record([key.as_str(), index.as_str(), value.as_str(), unit.as_str()])?;
                }
            }
        }
    }

    wtr.flush().map_err(|e| SqmError::FileWriteError {
        path: "<stdout>".to_string(),
        source: e,
    })?;
    Ok(())
}

/// 绘制分子轨道能级图
fn plot_levels(levels: &[f64], output_path: &Path) -> Result<()> {
    use plotters::prelude::*;

    let y_min = levels.iter().copied().fold(f64::INFINITY, f64::min);
    let y_max = levels.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let y_margin = ((y_max - y_min).abs() * 0.05).max(1.0);

    let root = BitMapBackend::new(output_path, (400, 800)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| SqmError::Other(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("MO Energy Levels", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, (y_min - y_margin)..(y_max + y_margin))
        .map_err(|e| SqmError::Other(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .y_desc("Energy (eV)")
        .draw()
        .map_err(|e| SqmError::Other(e.to_string()))?;

    chart
        .draw_series(
            levels
                .iter()
                .map(|e| PathElement::new(vec![(0.25, *e), (0.75, *e)], BLUE.stroke_width(2))),
        )
        .map_err(|e| SqmError::Other(e.to_string()))?;

    root.present()
        .map_err(|e| SqmError::Other(e.to_string()))?;

    Ok(())
}
