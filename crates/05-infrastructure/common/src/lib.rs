//! # Infrastructure Common
//!
//! 依赖注入基础设施的公共类型。
//!
//! ## 核心内容
//!
//! - [`DependencyError`] / [`ConfigError`] - 错误类型
//! - [`Lifetime`] - 实例生命周期
//! - [`TypeInfo`] / [`RegistrationInfo`] - 类型与注册元数据

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
