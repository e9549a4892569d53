//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义服务键、注册和解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`ServiceKey`] / [`Implements`] - 服务键与具体实现的绑定关系
//! - [`Resolver`] / [`ResolverExt`] - 解析接口
//! - [`Registrar`] / [`RegistrarExt`] - 注册接口
//! - [`ServiceEntry`] - 注册句柄
//! - [`TypedBinding`] - 编译期确定类型的访问器

pub mod binding;
pub mod container;
pub mod key;
pub mod registration;
pub mod resolver;

pub use binding::*;
pub use container::*;
pub use key::*;
pub use registration::*;
pub use resolver::*;
