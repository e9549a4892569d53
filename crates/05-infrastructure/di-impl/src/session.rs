//! 解析会话
//!
//! 每次从容器发起的顶层解析都会创建一个会话, 会话负责循环依赖检测和作用域实例缓存。

use crate::container::Container;
use di_abstractions::{Registration, ResolveContext, ResolvedInstance, Resolver, ServiceId};
use infrastructure_common::{DependencyError, DependencyResult, Lifetime};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// 单次解析会话
///
/// 单例和弱引用实例在创建完成回调全部成功之后才写入注册信息上的缓存。
/// 回调执行期间实例只对本会话可见, 其它线程看不到未初始化完成的实例。
pub struct ResolutionSession<'c> {
    container: &'c Container,
    context: RefCell<ResolveContext>,
    scoped: RefCell<HashMap<ServiceId, ResolvedInstance>>,
    pending: RefCell<HashMap<ServiceId, ResolvedInstance>>,
}

impl<'c> ResolutionSession<'c> {
    /// 创建新会话
    pub fn new(container: &'c Container) -> Self {
        Self {
            container,
            context: RefCell::new(ResolveContext::new(container.config().max_resolution_depth)),
            scoped: RefCell::new(HashMap::new()),
            pending: RefCell::new(HashMap::new()),
        }
    }

    /// 会话内作用域实例数量
    pub fn scoped_instances(&self) -> usize {
        self.scoped.borrow().len()
    }

    fn cached(&self, registration: &Registration, lifetime: Lifetime) -> Option<ResolvedInstance> {
        let id = registration.id();
        if lifetime.caches_on_registration() {
            let pending = self.pending.borrow().get(id).cloned();
            pending.or_else(|| registration.cached())
        } else if lifetime == Lifetime::Scoped {
            self.scoped.borrow().get(id).cloned()
        } else {
            None
        }
    }

    /// 回调执行前让实例对本会话可见, 以便互相引用的服务解析到它
    fn hold(&self, registration: &Registration, lifetime: Lifetime, instance: &ResolvedInstance) {
        let id = registration.id().clone();
        if lifetime.caches_on_registration() {
            self.pending.borrow_mut().insert(id, instance.clone());
        } else if lifetime == Lifetime::Scoped {
            self.scoped.borrow_mut().insert(id, instance.clone());
        }
    }

    /// 回调失败时撤销本次调用留下的缓存
    fn release(&self, registration: &Registration, lifetime: Lifetime) {
        let id = registration.id();
        if lifetime.caches_on_registration() {
            self.pending.borrow_mut().remove(id);
        } else if lifetime == Lifetime::Scoped {
            self.scoped.borrow_mut().remove(id);
        }
    }

    /// 回调成功后发布实例, 其它线程先发布的实例优先
    fn publish(
        &self,
        registration: &Registration,
        lifetime: Lifetime,
        instance: ResolvedInstance,
    ) -> ResolvedInstance {
        if !lifetime.caches_on_registration() {
            return instance;
        }
        self.pending.borrow_mut().remove(registration.id());
        let (published, created) = registration.store(instance);
        if !created {
            trace!("使用其它线程已发布的实例: {}", registration.id());
        }
        published
    }

    fn instantiate(&self, registration: &Arc<Registration>) -> DependencyResult<ResolvedInstance> {
        self.context.borrow_mut().push(registration.id().clone())?;
        trace!(
            "创建实例: {} (深度 {})",
            registration.id(),
            self.context.borrow().depth()
        );
        // 工厂内部会递归调用本会话, 期间不能持有 RefCell 借用
        let created = registration.instantiate(self);
        self.context.borrow_mut().pop();
        created
    }
}

impl Resolver for ResolutionSession<'_> {
    fn resolve_instance(&self, id: &ServiceId) -> DependencyResult<ResolvedInstance> {
        let registration = self
            .container
            .find_registration(id)
            .ok_or_else(|| DependencyError::not_registered(id.to_string()))?;
        let lifetime = registration.lifetime();

        if let Some(hit) = self.cached(&registration, lifetime) {
            return Ok(hit);
        }

        let instance = self.instantiate(&registration)?;
        self.hold(&registration, lifetime, &instance);
        if let Err(e) = registration.run_init_callbacks(self, &instance) {
            debug!("服务 {} 创建完成回调失败, 丢弃实例: {}", id, e);
            self.release(&registration, lifetime);
            return Err(e);
        }
        Ok(self.publish(&registration, lifetime, instance))
    }

    fn has_registration(&self, id: &ServiceId) -> bool {
        self.container.find_registration(id).is_some()
    }
}
