//! 组件生命周期定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// 瞬时模式 - 每次请求都创建新实例
    Transient,
    /// 作用域模式 - 在同一次解析过程中共享实例
    Scoped,
    /// 单例模式 - 整个容器生命周期内只创建一个实例
    Singleton,
    /// 弱引用模式 - 只要外部仍持有实例就复用
    Weak,
}

impl Lifetime {
    /// 是否需要在注册信息上缓存实例
    pub fn caches_on_registration(self) -> bool {
        matches!(self, Self::Singleton | Self::Weak)
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::Scoped
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transient => "transient",
            Self::Scoped => "scoped",
            Self::Singleton => "singleton",
            Self::Weak => "weak",
        };
        f.write_str(name)
    }
}
