//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `job/`, `batch/`, `utils/`
//! - 子模块: input, parse, run, submit, collect

pub mod collect;
pub mod input;
pub mod parse;
pub mod run;
pub mod submit;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Input(args) => input::execute(args),
        Commands::Parse(args) => parse::execute(args),
        Commands::Run(args) => run::execute(args),
        Commands::Submit(args) => submit::execute(args),
        Commands::Collect(args) => collect::execute(args),
    }
}
