//! # DI Bindings
//!
//! `PersonType` 服务键与 `InjectablePerson` 实现之间的类型化访问器。
//!
//! - [`InjectablePersonResolverExt::resolve_injectable_person`] - 在任意解析器上按键解析具体实现
//! - [`InjectablePersonContainerExt::register_injectable_person`] - 在任意注册入口上注册工厂并返回注册句柄

pub mod assembly;
pub mod injectable_person;
pub mod person;

pub use assembly::{PersonAssembly, PersonSettings};
pub use injectable_person::{InjectablePersonContainerExt, InjectablePersonResolverExt};
pub use person::{InjectablePerson, Person, PersonType};
