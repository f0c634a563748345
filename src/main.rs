//! # sqmkit - AmberTools sqm 半经验计算工具
//!
//! 把 sqm 半经验量子化学程序包装为统一的"势能"接口：
//! 生成输入、分派作业、解析输出为带单位的物理量。
//!
//! ## 子命令
//! - `input`   - 由分子结构生成 mol.in
//! - `parse`   - 解析 mol.out（生成热、偶极矩、Mulliken 电荷、轨道能级）
//! - `run`     - 本地或容器中运行单点计算
//! - `submit`  - 批量生成并提交 Slurm 作业
//! - `collect` - 收集作业目录中的结果
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (xyz / sqm 输入 / sqm 输出)
//!   │     ├── job/       (执行后端)
//!   │     ├── batch/     (批量处理)
//!   │     └── models/    (数据模型与单位)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod job;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::output::set_verbose(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
