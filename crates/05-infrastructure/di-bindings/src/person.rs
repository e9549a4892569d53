//! Person 服务契约与默认实现

use di_abstractions::{Implements, ServiceKey};
use std::fmt::Debug;
use std::sync::Arc;

/// Person 服务契约
pub trait Person: Send + Sync + Debug {
    /// 姓名
    fn name(&self) -> &str;

    /// 问候语
    fn greet(&self) -> String {
        format!("你好, 我是{}", self.name())
    }
}

/// `Person` 契约的服务键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersonType;

impl ServiceKey for PersonType {
    type Service = dyn Person;
}

/// 可注入的 Person 实现
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectablePerson {
    name: String,
}

impl InjectablePerson {
    /// 以姓名创建
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Person for InjectablePerson {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Implements<PersonType> for InjectablePerson {
    fn into_service(self: Arc<Self>) -> Arc<dyn Person> {
        self
    }
}
