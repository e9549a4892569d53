//! 依赖注入容器实现

use crate::builder::ContainerBuilder;
use crate::session::ResolutionSession;
use di_abstractions::{
    ContainerConfig, ContainerStats, Registrar, Registration, ResolvedInstance, Resolver,
    ServiceId, ServiceKey,
};
use infrastructure_common::{DependencyError, DependencyResult, Lifetime, RegistrationInfo};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 具体的依赖注入容器实现
pub struct Container {
    /// 服务注册信息
    registrations: RwLock<HashMap<ServiceId, Arc<Registration>>>,
    /// 父容器
    parent: Option<Arc<Container>>,
    /// 容器配置
    config: ContainerConfig,
    resolutions: AtomicUsize,
    resolution_errors: AtomicUsize,
}

impl Container {
    /// 使用默认配置创建容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建容器
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            registrations: RwLock::new(HashMap::new()),
            parent: None,
            config,
            resolutions: AtomicUsize::new(0),
            resolution_errors: AtomicUsize::new(0),
        }
    }

    /// 创建子容器, 沿用父容器的配置
    ///
    /// 子容器找不到注册时会继续向父容器查找。
    pub fn with_parent(parent: Arc<Container>) -> Self {
        let mut container = Self::with_config(parent.config.clone());
        container.parent = Some(parent);
        container
    }

    /// 创建构建器
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn set_parent(&mut self, parent: Arc<Container>) {
        self.parent = Some(parent);
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 父容器
    pub fn parent(&self) -> Option<&Arc<Container>> {
        self.parent.as_ref()
    }

    /// 查找注册信息, 本容器优先
    pub fn find_registration(&self, id: &ServiceId) -> Option<Arc<Registration>> {
        let local = self.registrations.read().get(id).cloned();
        local.or_else(|| self.parent.as_ref().and_then(|parent| parent.find_registration(id)))
    }

    /// 检查服务键是否已注册
    pub fn is_registered<K: ServiceKey>(&self) -> bool {
        self.find_registration(&ServiceId::of::<K>()).is_some()
    }

    /// 检查命名注册是否存在
    pub fn is_registered_named<K: ServiceKey>(&self, name: &str) -> bool {
        self.find_registration(&ServiceId::named::<K>(name)).is_some()
    }

    /// 获取本容器的注册元数据, 按显示名称排序
    pub fn registrations(&self) -> Vec<RegistrationInfo> {
        let mut infos: Vec<RegistrationInfo> = self
            .registrations
            .read()
            .values()
            .map(|registration| registration.info())
            .collect();
        infos.sort_by_key(|info| info.to_string());
        infos
    }

    /// 逐个解析本容器的注册, 收集全部错误
    ///
    /// 单例和弱引用注册会因此被提前创建。
    pub fn validate(&self) -> Result<(), Vec<DependencyError>> {
        info!("验证容器状态");

        let ids: Vec<ServiceId> = self.registrations.read().keys().cloned().collect();
        let errors: Vec<DependencyError> = ids
            .iter()
            .filter_map(|id| {
                let session = ResolutionSession::new(self);
                match session.resolve_instance(id) {
                    Ok(_) => {
                        debug!("服务 {} 验证成功", id);
                        None
                    }
                    Err(e) => {
                        warn!("服务 {} 验证失败: {}", id, e);
                        Some(e)
                    }
                }
            })
            .collect();

        if errors.is_empty() {
            info!("容器验证通过, 共 {} 个服务", ids.len());
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// 丢弃所有单例和弱引用缓存
    pub fn reset_cached_instances(&self) {
        for registration in self.registrations.read().values() {
            registration.reset_cache();
        }
        debug!("已清空缓存实例");
    }

    /// 移除全部注册
    pub fn clear(&self) {
        let removed = {
            let mut registrations = self.registrations.write();
            let count = registrations.len();
            registrations.clear();
            count
        };
        info!("已移除 {} 个注册", removed);
    }

    /// 统计信息快照
    pub fn stats(&self) -> ContainerStats {
        let registrations = self.registrations.read();
        ContainerStats {
            registered_services: registrations.len(),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            resolution_errors: self.resolution_errors.load(Ordering::Relaxed),
            cached_instances: registrations
                .values()
                .filter(|registration| registration.has_cached_instance())
                .count(),
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("registrations", &self.registrations.read().len())
            .field("has_parent", &self.parent.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl Resolver for Container {
    fn resolve_instance(&self, id: &ServiceId) -> DependencyResult<ResolvedInstance> {
        let session = ResolutionSession::new(self);
        match session.resolve_instance(id) {
            Ok(instance) => {
                self.resolutions.fetch_add(1, Ordering::Relaxed);
                Ok(instance)
            }
            Err(e) => {
                self.resolution_errors.fetch_add(1, Ordering::Relaxed);
                debug!("解析服务 {} 失败: {}", id, e);
                Err(e)
            }
        }
    }

    fn has_registration(&self, id: &ServiceId) -> bool {
        self.find_registration(id).is_some()
    }
}

impl Registrar for Container {
    fn register_erased(&self, registration: Registration) -> Arc<Registration> {
        let registration = Arc::new(registration);
        let id = registration.id().clone();
        info!(
            "注册服务: {} -> {} ({})",
            id,
            registration.concrete(),
            registration.lifetime()
        );

        let previous = self.registrations.write().insert(id, registration.clone());
        if let Some(previous) = previous {
            warn!(
                "替换已有注册: {} (原实现 {})",
                previous.id(),
                previous.concrete()
            );
        }
        registration
    }

    fn default_lifetime(&self) -> Lifetime {
        self.config.default_lifetime
    }
}
