//! # sqm 输出解析器
//!
//! 解析 sqm 输出文件 `mol.out`，提取生成热、偶极矩、Mulliken 电荷与分子轨道能级。
//!
//! ## 识别的段落
//! ```text
//! QM DIPOLE    0.123    -0.456    0.789  ...
//!
//! Atomic Charges for Step 1
//! Atom Element Mulliken Charge
//!    1    C       -0.143
//!    ...
//! Total Mulliken Charge = 0.000
//!
//! Final MO eigenvalues (eV):
//!  -32.1  -19.8  -19.8  -19.8   4.2
//!    4.5    4.5
//! <空行>
//!
//! Heat of formation   =   -12.5   kcal/mol   (   -0.52 eV)
//! ```
//! 其余行一律忽略。输出格式随 sqm 版本变化，因此对无关行的容忍是必需的。
//!
//! 段落用状态机表示；多行段落未结束时输入耗尽视为错误，
//! 段落之间输入结束则正常返回已收集的结果。任何错误都使整次解析失败，不返回部分结果。
//!
//! ## 依赖关系
//! - 被 `commands/parse.rs`, `commands/run.rs`, `commands/collect.rs` 使用
//! - 使用 `models/calculation.rs`, `models/units.rs`

use crate::error::{Result, Section, SqmError};
use crate::models::{Quantity, ResultKey, SqmResult, Unit};
use crate::utils::output;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// 输出文件名
pub const OUTPUT_FILE: &str = "mol.out";

const DIPOLE_PREFIX: [&str; 2] = ["QM", "DIPOLE"];
const CHARGES_SENTINEL: [&str; 5] = ["Atomic", "Charges", "for", "Step", "1"];
const CHARGES_HEADER: [&str; 4] = ["Atom", "Element", "Mulliken", "Charge"];
const CHARGES_TERMINATOR: [&str; 4] = ["Total", "Mulliken", "Charge", "="];
const MO_SENTINEL: [&str; 4] = ["Final", "MO", "eigenvalues", "(eV):"];
const HEAT_PREFIX: [&str; 3] = ["Heat", "of", "formation"];

/// 解析状态
enum State {
    /// 段落之间，逐行检查四个触发条件
    AwaitingSentinel,
    /// 已见到电荷段标记，下一行必须是表头
    MullikenHeader,
    /// 电荷表记录行
    MullikenRecords(Vec<f64>),
    /// 轨道能级行，空行结束
    MoEigenvalues(Vec<f64>),
}

impl State {
    fn section(&self) -> Option<Section> {
        match self {
            State::AwaitingSentinel => None,
            State::MullikenHeader | State::MullikenRecords(_) => Some(Section::MullikenCharges),
            State::MoEigenvalues(_) => Some(Section::MoEigenvalues),
        }
    }
}

/// 解析 sqm 输出文件
pub fn parse_sqm_output_file(path: &Path) -> Result<SqmResult> {
    let file = File::open(path).map_err(|e| SqmError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let lines = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .map_err(|e| SqmError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

    parse_sqm_output(&lines)
}

/// 从行序列解析 sqm 输出
pub fn parse_sqm_output<I, S>(lines: I) -> Result<SqmResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = SqmResult::new();
    let mut state = State::AwaitingSentinel;

    for (idx, line) in lines.into_iter().enumerate() {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.as_ref().split_whitespace().collect();

        state = match state {
            State::AwaitingSentinel => scan_triggers(&fields, line_no, &mut result)?,

            State::MullikenHeader => {
                if fields != CHARGES_HEADER {
                    return Err(SqmError::MalformedSection {
                        section: Section::MullikenCharges,
                        line: line_no,
                        reason: format!(
                            "expected header '{}', found '{}'",
                            CHARGES_HEADER.join(" "),
                            line.as_ref().trim()
                        ),
                    });
                }
                State::MullikenRecords(Vec::new())
            }

            State::MullikenRecords(mut charges) => {
                if fields.starts_with(&CHARGES_TERMINATOR) {
                    store(
                        &mut result,
                        ResultKey::Charges,
                        Quantity::vector(charges, Unit::ElementaryCharge),
                    );
                    State::AwaitingSentinel
                } else {
                    let token = fields.get(2).ok_or_else(|| SqmError::MalformedSection {
                        section: Section::MullikenCharges,
                        line: line_no,
                        reason: format!(
                            "atom record has {} field(s), expected at least 3",
                            fields.len()
                        ),
                    })?;
                    charges.push(parse_float(token, Section::MullikenCharges, line_no)?);
                    State::MullikenRecords(charges)
                }
            }

            State::MoEigenvalues(mut energies) => {
                if fields.is_empty() {
                    store(
                        &mut result,
                        ResultKey::MoEnergies,
                        Quantity::vector(energies, Unit::ElectronVolt),
                    );
                    State::AwaitingSentinel
                } else {
                    for token in &fields {
                        energies.push(parse_float(token, Section::MoEigenvalues, line_no)?);
                    }
                    State::MoEigenvalues(energies)
                }
            }
        };
    }

    match state.section() {
        None => Ok(result),
        Some(section) => Err(SqmError::UnexpectedEof { section }),
    }
}

/// 段落之间：四个触发条件分别独立检查
fn scan_triggers(fields: &[&str], line_no: usize, result: &mut SqmResult) -> Result<State> {
    let mut next = State::AwaitingSentinel;

    // 单位按 e·Å 记录，尚未核实
    if fields.starts_with(&DIPOLE_PREFIX) {
        let components = fields.get(2..5).ok_or_else(|| SqmError::MalformedSection {
            section: Section::Dipole,
            line: line_no,
            reason: "expected three dipole components".to_string(),
        })?;
        let dipole = components
            .iter()
            .map(|t| parse_float(t, Section::Dipole, line_no))
            .collect::<Result<Vec<f64>>>()?;
        store(
            result,
            ResultKey::Dipole,
            Quantity::vector(dipole, Unit::ElementaryChargeAngstrom),
        );
    }

    if fields == CHARGES_SENTINEL {
        next = State::MullikenHeader;
    }

    if fields == MO_SENTINEL {
        next = State::MoEigenvalues(Vec::new());
    }

    if fields.starts_with(&HEAT_PREFIX) {
        let token = fields.get(4).ok_or_else(|| SqmError::MalformedSection {
            section: Section::HeatOfFormation,
            line: line_no,
            reason: "missing value field".to_string(),
        })?;
        let heat = parse_float(token, Section::HeatOfFormation, line_no)?;
        store(
            result,
            ResultKey::PotentialEnergy,
            Quantity::scalar(heat, Unit::KcalPerMol),
        );
    }

    Ok(next)
}

fn store(result: &mut SqmResult, key: ResultKey, value: Quantity) {
    if !result.insert(key, value) {
        output::print_debug(&format!("Ignoring repeated '{}' result", key));
    }
}

fn parse_float(token: &str, section: Section, line: usize) -> Result<f64> {
    token.parse::<f64>().map_err(|e| SqmError::InvalidNumber {
        section,
        line,
        token: token.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
  --------------------------------------------------------
                   AMBER SQM VERSION 19
  --------------------------------------------------------

 QMMM: SINGLE POINT ENERGY CALCULATION

 Heat of formation       =       -12.5    kcal/mol        (      -0.52 eV)

 QM DIPOLE   0.1230  -0.4560   0.7890   ( 0.942 )

 Atomic Charges for Step 1
 Atom Element Mulliken Charge
    1      C        0.1
    2      H       -0.2
    3      H        0.1
 Total Mulliken Charge = 0.0

 Final MO eigenvalues (eV):
  -32.5   -19.8
  -19.8

 --------- Calculation Completed ----------
"#;

    fn approx_eq(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_parse_full_output() {
        let result = parse_sqm_output(SAMPLE.lines()).unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(result.potential_energy(), Some(-12.5));
        assert!(approx_eq(result.dipole().unwrap(), &[0.123, -0.456, 0.789]));
        assert!(approx_eq(result.charges().unwrap(), &[0.1, -0.2, 0.1]));
        assert!(approx_eq(result.mo_energies().unwrap(), &[-32.5, -19.8, -19.8]));
    }

    #[test]
    fn test_no_sentinels_gives_empty_result() {
        let lines = ["nothing to see here", "", "  QM energy = 1.0", "Heat"];
        let result = parse_sqm_output(lines).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let lines: Vec<String> = Vec::new();
        assert!(parse_sqm_output(lines).unwrap().is_empty());
    }

    #[test]
    fn test_dipole_unit_is_pinned() {
        // 单位按原样保留 (e·Å)，此处只固定数值与单位的对应，不断言其物理正确性
        let result = parse_sqm_output(["QM DIPOLE 1.0 2.0 3.0"]).unwrap();
        let dipole = result.get(ResultKey::Dipole).unwrap();
        assert_eq!(dipole.unit, Unit::ElementaryChargeAngstrom);
        assert!(approx_eq(dipole.as_slice().unwrap(), &[1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_mulliken_charges() {
        let lines = [
            "Atomic Charges for Step 1",
            "Atom Element Mulliken Charge",
            "  1  O   0.1",
            "  2  H  -0.2",
            "  3  H   0.1",
            "Total Mulliken Charge = 0.0",
        ];
        let result = parse_sqm_output(lines).unwrap();
        let charges = result.get(ResultKey::Charges).unwrap();
        assert_eq!(charges.unit, Unit::ElementaryCharge);
        assert!(approx_eq(charges.as_slice().unwrap(), &[0.1, -0.2, 0.1]));
    }

    #[test]
    fn test_mulliken_empty_table() {
        let lines = [
            "Atomic Charges for Step 1",
            "Atom Element Mulliken Charge",
            "Total Mulliken Charge = 0.0",
        ];
        let result = parse_sqm_output(lines).unwrap();
        assert_eq!(result.charges(), Some(&[][..]));
    }

    #[test]
    fn test_mulliken_wrong_header_is_structural_error() {
        let lines = [
            "Atomic Charges for Step 1",
            "Atom Element Charge",
            "  1  O   0.1",
            "Total Mulliken Charge = 0.0",
        ];
        let err = parse_sqm_output(lines).unwrap_err();
        assert!(matches!(
            err,
            SqmError::MalformedSection {
                section: Section::MullikenCharges,
                line: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_mulliken_missing_header_at_eof() {
        let err = parse_sqm_output(["Atomic Charges for Step 1"]).unwrap_err();
        assert!(matches!(
            err,
            SqmError::UnexpectedEof {
                section: Section::MullikenCharges
            }
        ));
    }

    #[test]
    fn test_mulliken_missing_terminator() {
        let lines = [
            "Atomic Charges for Step 1",
            "Atom Element Mulliken Charge",
            "  1  O   0.1",
        ];
        let err = parse_sqm_output(lines).unwrap_err();
        assert!(matches!(
            err,
            SqmError::UnexpectedEof {
                section: Section::MullikenCharges
            }
        ));
    }

    #[test]
    fn test_mulliken_short_record() {
        let lines = [
            "Atomic Charges for Step 1",
            "Atom Element Mulliken Charge",
            "",
            "Total Mulliken Charge = 0.0",
        ];
        let err = parse_sqm_output(lines).unwrap_err();
        assert!(matches!(
            err,
            SqmError::MalformedSection {
                section: Section::MullikenCharges,
                line: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_mo_energies_span_lines() {
        let lines = ["Final MO eigenvalues (eV):", "1.0 2.0", "3.0", "", "4.0"];
        let result = parse_sqm_output(lines).unwrap();
        let mo = result.get(ResultKey::MoEnergies).unwrap();
        assert_eq!(mo.unit, Unit::ElectronVolt);
        assert!(approx_eq(mo.as_slice().unwrap(), &[1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_mo_energies_blank_with_whitespace_terminates() {
        let lines = ["Final MO eigenvalues (eV):", "  -5.0", "   \t  "];
        let result = parse_sqm_output(lines).unwrap();
        assert!(approx_eq(result.mo_energies().unwrap(), &[-5.0]));
    }

    #[test]
    fn test_mo_energies_missing_blank_line() {
        let lines = ["Final MO eigenvalues (eV):", "1.0 2.0"];
        let err = parse_sqm_output(lines).unwrap_err();
        assert!(matches!(
            err,
            SqmError::UnexpectedEof {
                section: Section::MoEigenvalues
            }
        ));
    }

    #[test]
    fn test_heat_of_formation_field_index() {
        let line = "Heat of formation       =       -12.5    kcal/mol        (      -0.52 eV)";
        let result = parse_sqm_output([line]).unwrap();
        let e = result.get(ResultKey::PotentialEnergy).unwrap();
        assert_eq!(e.unit, Unit::KcalPerMol);
        assert_eq!(e.as_scalar(), Some(-12.5));
    }

    #[test]
    fn test_invalid_number_propagates() {
        let err = parse_sqm_output(["QM DIPOLE 1.0 abc 3.0"]).unwrap_err();
        assert!(matches!(
            err,
            SqmError::InvalidNumber {
                section: Section::Dipole,
                line: 1,
                ref token,
                ..
            } if token == "abc"
        ));
    }

    #[test]
    fn test_truncated_dipole_line() {
        let err = parse_sqm_output(["QM DIPOLE 1.0 2.0"]).unwrap_err();
        assert!(matches!(
            err,
            SqmError::MalformedSection {
                section: Section::Dipole,
                ..
            }
        ));
    }

    #[test]
    fn test_failure_is_atomic() {
        // 前面已完成的段落也不会被返回
        let lines = [
            "Heat of formation = -1.0 kcal/mol",
            "Final MO eigenvalues (eV):",
            "1.0 oops",
            "",
        ];
        assert!(parse_sqm_output(lines).is_err());
    }

    #[test]
    fn test_first_value_wins() {
        let lines = [
            "Heat of formation = -1.0 kcal/mol",
            "Heat of formation = -2.0 kcal/mol",
        ];
        let result = parse_sqm_output(lines).unwrap();
        assert_eq!(result.potential_energy(), Some(-1.0));
    }

    #[test]
    fn test_idempotent() {
        let a = parse_sqm_output(SAMPLE.lines()).unwrap();
        let b = parse_sqm_output(SAMPLE.lines()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OUTPUT_FILE);
        std::fs::write(&path, SAMPLE).unwrap();

        let result = parse_sqm_output_file(&path).unwrap();
        assert_eq!(result.potential_energy(), Some(-12.5));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_sqm_output_file(Path::new("/nonexistent/mol.out")).unwrap_err();
        assert!(matches!(err, SqmError::FileReadError { .. }));
    }
}
