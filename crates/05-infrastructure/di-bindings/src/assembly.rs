//! Person 装配单元

use crate::injectable_person::InjectablePersonContainerExt;
use crate::person::InjectablePerson;
use di_abstractions::{Assembly, Registrar};
use infrastructure_common::Lifetime;
use serde::Deserialize;

/// Person 装配配置, 对应配置文件中的 `[person]` 节
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PersonSettings {
    /// 注入的姓名
    pub name: String,
    /// 生命周期
    pub lifetime: Lifetime,
}

impl Default for PersonSettings {
    fn default() -> Self {
        Self {
            name: "匿名".to_string(),
            lifetime: Lifetime::Singleton,
        }
    }
}

/// 注册 `PersonType` -> `InjectablePerson`
#[derive(Debug, Clone, Default)]
pub struct PersonAssembly {
    settings: PersonSettings,
}

impl PersonAssembly {
    /// 按给定配置创建装配单元
    pub fn new(settings: PersonSettings) -> Self {
        Self { settings }
    }
}

impl Assembly for PersonAssembly {
    fn name(&self) -> &str {
        "person"
    }

    fn assemble(&self, registrar: &dyn Registrar) {
        let name = self.settings.name.clone();
        registrar
            .register_injectable_person(move |_| InjectablePerson::new(name.clone()))
            .in_scope(self.settings.lifetime);
    }
}
