//! 依赖注入容器抽象接口
//!
//! 提供注册入口、装配单元以及容器配置

use crate::key::{Implements, ServiceId, ServiceKey};
use crate::registration::{Registration, ServiceEntry};
use crate::resolver::Resolver;
use infrastructure_common::{ConfigError, ConfigResult, DependencyResult, Lifetime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 注册入口 trait
pub trait Registrar {
    /// 写入一条注册, 同一标识的旧注册会被替换
    fn register_erased(&self, registration: Registration) -> Arc<Registration>;

    /// 未显式指定时使用的生命周期
    fn default_lifetime(&self) -> Lifetime;
}

/// 注册入口的泛型便捷方法
pub trait RegistrarExt: Registrar {
    /// 为服务键注册工厂
    fn register<K, C, F>(&self, factory: F) -> ServiceEntry<K>
    where
        K: ServiceKey,
        C: Implements<K>,
        F: Fn(&dyn Resolver) -> C + Send + Sync + 'static,
    {
        self.register_fallible::<K, C, _>(None, move |resolver| Ok(factory(resolver)))
    }

    /// 为服务键注册命名工厂
    fn register_named<K, C, F>(&self, name: impl Into<String>, factory: F) -> ServiceEntry<K>
    where
        K: ServiceKey,
        C: Implements<K>,
        F: Fn(&dyn Resolver) -> C + Send + Sync + 'static,
    {
        self.register_fallible::<K, C, _>(Some(name.into()), move |resolver| Ok(factory(resolver)))
    }

    /// 注册可能失败的工厂
    fn register_fallible<K, C, F>(&self, name: Option<String>, factory: F) -> ServiceEntry<K>
    where
        K: ServiceKey,
        C: Implements<K>,
        F: Fn(&dyn Resolver) -> DependencyResult<C> + Send + Sync + 'static,
    {
        let registration = Registration::new::<K, C, F>(
            ServiceId::with_name::<K>(name),
            self.default_lifetime(),
            factory,
        );
        ServiceEntry::new(self.register_erased(registration))
    }

    /// 注册现成实例（单例）
    fn register_instance<K, C>(&self, instance: C) -> ServiceEntry<K>
    where
        K: ServiceKey,
        C: Implements<K>,
    {
        let registration = Registration::from_instance::<K, C>(ServiceId::of::<K>(), Arc::new(instance));
        ServiceEntry::new(self.register_erased(registration))
    }
}

impl<T: Registrar + ?Sized> RegistrarExt for T {}

/// 装配单元
///
/// 把一组相关注册收拢在一起, 由容器构建器统一执行。
pub trait Assembly: Send + Sync {
    /// 装配单元名称, 用于日志
    fn name(&self) -> &str;

    /// 写入注册
    fn assemble(&self, registrar: &dyn Registrar);
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 最大解析深度
    pub max_resolution_depth: usize,
    /// 默认生命周期
    pub default_lifetime: Lifetime,
    /// 构建完成后是否立即验证所有注册
    pub validate_on_build: bool,
}

impl ContainerConfig {
    /// 默认最大解析深度
    pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 200;

    /// 从 TOML 文本读取 `[container]` 节, 缺省时使用默认值
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        #[derive(Deserialize)]
        struct Document {
            #[serde(default)]
            container: ContainerConfig,
        }

        let document: Document = toml::from_str(content).map_err(ConfigError::parse)?;
        document.container.validate()?;
        Ok(document.container)
    }

    /// 检查配置取值
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::validation("max_resolution_depth 必须大于 0"));
        }
        Ok(())
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: Self::DEFAULT_MAX_RESOLUTION_DEPTH,
            default_lifetime: Lifetime::default(),
            validate_on_build: false,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 已注册服务数量（不含父容器）
    pub registered_services: usize,
    /// 成功解析次数
    pub resolutions: usize,
    /// 解析错误次数
    pub resolution_errors: usize,
    /// 持有存活缓存实例的注册数量
    pub cached_instances: usize,
}
