//! # 依赖注入具体实现
//!
//! 提供具体的依赖注入容器、解析会话、构建器以及配置加载。
//!
//! ```ignore
//! use di_abstractions::{RegistrarExt, ResolverExt};
//! use di_impl::Container;
//!
//! let container = Container::new();
//! container.register::<PersonType, InjectablePerson, _>(|_| InjectablePerson::new("张三"));
//! let person = container.resolve::<PersonType>()?;
//! ```

pub mod builder;
pub mod config;
pub mod container;
pub mod session;

pub use builder::ContainerBuilder;
pub use config::{load_container_config, load_section};
pub use container::Container;
pub use session::ResolutionSession;
