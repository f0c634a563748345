//! # 数据模型模块
//!
//! 定义分子结构、半经验方法、物理单位与计算结果的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `job/` 和 `commands/` 使用
//! - 子模块: molecule, theory, units, calculation

pub mod calculation;
pub mod molecule;
pub mod theory;
pub mod units;

pub use calculation::{ResultKey, SqmResult};
pub use molecule::{Atom, Molecule};
pub use theory::Theory;
pub use units::{Quantity, Unit};
