//! # 统一错误处理模块
//!
//! 定义 sqmkit 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use std::fmt;
use thiserror::Error;

/// sqm 输出中的多行/单行段落
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dipole,
    MullikenCharges,
    MoEigenvalues,
    HeatOfFormation,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Dipole => write!(f, "QM DIPOLE"),
            Section::MullikenCharges => write!(f, "Mulliken charges"),
            Section::MoEigenvalues => write!(f, "MO eigenvalues"),
            Section::HeatOfFormation => write!(f, "Heat of formation"),
        }
    }
}

/// sqmkit 统一错误类型
#[derive(Error, Debug)]
pub enum SqmError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 结构输入错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown element: {0}")]
    UnknownElement(String),

    #[error("Unknown semi-empirical theory '{0}'")]
    UnknownTheory(String),

    // ─────────────────────────────────────────────────────────────
    // sqm 输出解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Malformed {section} section at line {line}: {reason}")]
    MalformedSection {
        section: Section,
        line: usize,
        reason: String,
    },

    #[error("Output ended inside the {section} section")]
    UnexpectedEof { section: Section },

    #[error("Invalid number '{token}' in {section} section at line {line}")]
    InvalidNumber {
        section: Section,
        line: usize,
        token: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    // ─────────────────────────────────────────────────────────────
    // 单位错误
    // ─────────────────────────────────────────────────────────────
    #[error("Cannot convert {from} to {to}")]
    IncompatibleUnits { from: String, to: String },

    // ─────────────────────────────────────────────────────────────
    // 外部命令 / 作业错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Job '{job}' failed ({status})\n{stderr}")]
    JobFailed {
        job: String,
        status: String,
        stderr: String,
    },

    #[error("Job '{job}' produced no output file '{file}'")]
    MissingOutput { job: String, file: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    // ─────────────────────────────────────────────────────────────
    // 序列化错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },

    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, SqmError>;
