//! 组件解析器抽象接口
//!
//! 提供依赖解析和组件实例化的能力

use crate::key::{Implements, ServiceId, ServiceKey};
use infrastructure_common::{DependencyError, DependencyResult, TypeInfo};
use std::any::Any;
use std::sync::Arc;

/// 把类型擦除的实例转换为某个服务键的契约类型
pub(crate) struct Upcaster<K: ServiceKey> {
    convert: fn(Arc<dyn Any + Send + Sync>) -> Option<Arc<K::Service>>,
}

impl<K: ServiceKey> Upcaster<K> {
    pub(crate) fn for_concrete<C: Implements<K>>() -> Self {
        Self {
            convert: upcast::<K, C>,
        }
    }
}

fn upcast<K: ServiceKey, C: Implements<K>>(
    instance: Arc<dyn Any + Send + Sync>,
) -> Option<Arc<K::Service>> {
    instance
        .downcast::<C>()
        .ok()
        .map(<C as Implements<K>>::into_service)
}

/// 一次解析得到的实例
///
/// `instance` 内部保存的是具体类型的 `Arc<C>`。
#[derive(Clone)]
pub struct ResolvedInstance {
    id: ServiceId,
    concrete: TypeInfo,
    instance: Arc<dyn Any + Send + Sync>,
    upcaster: Arc<dyn Any + Send + Sync>,
}

impl ResolvedInstance {
    pub(crate) fn new(
        id: ServiceId,
        concrete: TypeInfo,
        instance: Arc<dyn Any + Send + Sync>,
        upcaster: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        Self {
            id,
            concrete,
            instance,
            upcaster,
        }
    }

    /// 注册标识
    pub fn id(&self) -> &ServiceId {
        &self.id
    }

    /// 具体实现类型
    pub fn concrete(&self) -> &TypeInfo {
        &self.concrete
    }

    /// 类型擦除的实例
    pub fn as_any(&self) -> &Arc<dyn Any + Send + Sync> {
        &self.instance
    }

    /// 是否与另一个解析结果指向同一实例
    pub fn same_instance(&self, other: &ResolvedInstance) -> bool {
        Arc::ptr_eq(&self.instance, &other.instance)
    }

    /// 转换为具体类型
    pub fn downcast<C: Send + Sync + 'static>(self) -> DependencyResult<Arc<C>> {
        let Self {
            id,
            concrete,
            instance,
            ..
        } = self;
        instance
            .downcast::<C>()
            .map_err(|_| DependencyError::TypeMismatch {
                key: id.to_string(),
                expected: TypeInfo::of::<C>().name,
                actual: concrete.name,
            })
    }

    /// 转换为服务键声明的契约类型
    pub fn into_service<K: ServiceKey>(self) -> DependencyResult<Arc<K::Service>> {
        let converted = self
            .upcaster
            .downcast_ref::<Upcaster<K>>()
            .and_then(|upcaster| (upcaster.convert)(self.instance.clone()));

        converted.ok_or_else(|| DependencyError::TypeMismatch {
            key: self.id.to_string(),
            expected: TypeInfo::of::<K::Service>().name,
            actual: self.concrete.name.clone(),
        })
    }
}

impl std::fmt::Debug for ResolvedInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedInstance")
            .field("id", &self.id)
            .field("concrete", &self.concrete.name)
            .finish()
    }
}

/// 组件解析器 trait
///
/// 容器本身和工厂执行期间拿到的解析会话都实现此 trait。
pub trait Resolver {
    /// 按注册标识解析实例
    fn resolve_instance(&self, id: &ServiceId) -> DependencyResult<ResolvedInstance>;

    /// 检查是否存在注册
    fn has_registration(&self, id: &ServiceId) -> bool;
}

/// 解析器的泛型便捷方法
pub trait ResolverExt: Resolver {
    /// 解析服务契约
    fn resolve<K: ServiceKey>(&self) -> DependencyResult<Arc<K::Service>> {
        self.resolve_instance(&ServiceId::of::<K>())?
            .into_service::<K>()
    }

    /// 解析命名注册的服务契约
    fn resolve_named<K: ServiceKey>(&self, name: &str) -> DependencyResult<Arc<K::Service>> {
        self.resolve_instance(&ServiceId::named::<K>(name))?
            .into_service::<K>()
    }

    /// 解析服务契约, 未注册时返回 `None`
    ///
    /// 其它错误（工厂失败、循环依赖）仍然返回 `Err`。
    fn try_resolve<K: ServiceKey>(&self) -> DependencyResult<Option<Arc<K::Service>>> {
        let id = ServiceId::of::<K>();
        if !self.has_registration(&id) {
            return Ok(None);
        }
        self.resolve_instance(&id)?.into_service::<K>().map(Some)
    }

    /// 解析具体实现类型
    fn resolve_concrete<K, C>(&self) -> DependencyResult<Arc<C>>
    where
        K: ServiceKey,
        C: Implements<K>,
    {
        self.resolve_instance(&ServiceId::of::<K>())?.downcast::<C>()
    }

    /// 检查服务键是否可解析
    fn can_resolve<K: ServiceKey>(&self) -> bool {
        self.has_registration(&ServiceId::of::<K>())
    }
}

impl<R: Resolver + ?Sized> ResolverExt for R {}

/// 解析上下文，记录当前解析链用于检测循环依赖
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链
    pub resolution_chain: Vec<ServiceId>,
    /// 最大递归深度
    pub max_depth: usize,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(max_depth: usize) -> Self {
        Self {
            resolution_chain: Vec::new(),
            max_depth,
        }
    }

    /// 添加标识到解析链
    pub fn push(&mut self, id: ServiceId) -> DependencyResult<()> {
        if self.resolution_chain.contains(&id) {
            return Err(DependencyError::CircularDependency {
                dependency_chain: self.render_chain(&id),
            });
        }
        if self.resolution_chain.len() >= self.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                max_depth: self.max_depth,
                dependency_chain: self.render_chain(&id),
            });
        }
        self.resolution_chain.push(id);
        Ok(())
    }

    /// 从解析链中移除最后一个标识
    pub fn pop(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    fn render_chain(&self, next: &ServiceId) -> String {
        self.resolution_chain
            .iter()
            .chain(std::iter::once(next))
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
