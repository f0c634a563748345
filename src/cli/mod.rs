//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `input`: 生成 sqm 输入文件
//! - `parse`: 解析已有的 sqm 输出
//! - `run`: 单点计算（生成输入、执行、解析）
//! - `submit`: 批量生成 Slurm 作业
//! - `collect`: 批量收集 sqm 结果
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: input, parse, run, submit, collect

pub mod collect;
pub mod input;
pub mod parse;
pub mod run;
pub mod submit;

use clap::{Parser, Subcommand};

/// sqmkit - AmberTools sqm 半经验计算工具
#[derive(Parser)]
#[command(name = "sqmkit")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Semi-empirical single-point calculations with AmberTools sqm", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print debug messages
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Render an sqm input file (mol.in) from a molecule
    Input(input::InputArgs),

    /// Parse an existing sqm output file (mol.out)
    Parse(parse::ParseArgs),

    /// Run a single-point sqm calculation and report the results
    Run(run::RunArgs),

    /// Prepare (and optionally submit) Slurm jobs for a directory of molecules
    Submit(submit::SubmitArgs),

    /// Collect results from finished sqm job directories
    Collect(collect::CollectArgs),
}
