//! 类型化绑定
//!
//! 把服务键和具体实现一起作为类型参数, 让按键解析后的类型转换在编译期就确定。

use crate::container::{Registrar, RegistrarExt};
use crate::key::{Implements, ServiceId, ServiceKey};
use crate::registration::ServiceEntry;
use crate::resolver::Resolver;
use infrastructure_common::{DependencyResult, TypeInfo};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 服务键 `K` 到具体实现 `C` 的绑定
pub struct TypedBinding<K, C> {
    name: Option<&'static str>,
    _marker: PhantomData<fn() -> (K, C)>,
}

impl<K, C> TypedBinding<K, C>
where
    K: ServiceKey,
    C: Implements<K>,
{
    /// 未命名绑定
    pub const fn new() -> Self {
        Self {
            name: None,
            _marker: PhantomData,
        }
    }

    /// 命名绑定
    pub const fn named(name: &'static str) -> Self {
        Self {
            name: Some(name),
            _marker: PhantomData,
        }
    }

    /// 绑定对应的注册标识
    pub fn service_id(&self) -> ServiceId {
        ServiceId::with_name::<K>(self.name.map(str::to_string))
    }

    /// 解析具体实现
    pub fn resolve<R: Resolver + ?Sized>(&self, resolver: &R) -> DependencyResult<Arc<C>> {
        resolver.resolve_instance(&self.service_id())?.downcast::<C>()
    }

    /// 解析具体实现, 未注册时返回 `None`
    pub fn try_resolve<R: Resolver + ?Sized>(&self, resolver: &R) -> DependencyResult<Option<Arc<C>>> {
        let id = self.service_id();
        if !resolver.has_registration(&id) {
            return Ok(None);
        }
        resolver.resolve_instance(&id)?.downcast::<C>().map(Some)
    }

    /// 注册工厂
    pub fn register<G, F>(&self, registrar: &G, factory: F) -> ServiceEntry<K>
    where
        G: Registrar + ?Sized,
        F: Fn(&dyn Resolver) -> C + Send + Sync + 'static,
    {
        registrar.register_fallible::<K, C, _>(self.name.map(str::to_string), move |resolver| {
            Ok(factory(resolver))
        })
    }

    /// 注册可能失败的工厂
    pub fn register_fallible<G, F>(&self, registrar: &G, factory: F) -> ServiceEntry<K>
    where
        G: Registrar + ?Sized,
        F: Fn(&dyn Resolver) -> DependencyResult<C> + Send + Sync + 'static,
    {
        registrar.register_fallible::<K, C, F>(self.name.map(str::to_string), factory)
    }
}

impl<K, C> Default for TypedBinding<K, C>
where
    K: ServiceKey,
    C: Implements<K>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> Clone for TypedBinding<K, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, C> Copy for TypedBinding<K, C> {}

impl<K: 'static, C: 'static> fmt::Debug for TypedBinding<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedBinding")
            .field("key", &TypeInfo::of::<K>().name)
            .field("concrete", &TypeInfo::of::<C>().name)
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::Registration;
    use crate::resolver::ResolvedInstance;
    use infrastructure_common::{DependencyError, Lifetime};
    use parking_lot::RwLock;
    use std::collections::HashMap;

    /// 只做注册表查找和工厂调用的最小注册入口
    #[derive(Default)]
    struct MapRegistry {
        entries: RwLock<HashMap<ServiceId, Arc<Registration>>>,
    }

    impl Registrar for MapRegistry {
        fn register_erased(&self, registration: Registration) -> Arc<Registration> {
            let registration = Arc::new(registration);
            self.entries
                .write()
                .insert(registration.id().clone(), registration.clone());
            registration
        }

        fn default_lifetime(&self) -> Lifetime {
            Lifetime::Transient
        }
    }

    impl Resolver for MapRegistry {
        fn resolve_instance(&self, id: &ServiceId) -> DependencyResult<ResolvedInstance> {
            let registration = self
                .entries
                .read()
                .get(id)
                .cloned()
                .ok_or_else(|| DependencyError::not_registered(id.to_string()))?;
            registration.instantiate(self)
        }

        fn has_registration(&self, id: &ServiceId) -> bool {
            self.entries.read().contains_key(id)
        }
    }

    trait Shape: Send + Sync {
        fn sides(&self) -> usize;
    }

    struct ShapeKey;
    impl ServiceKey for ShapeKey {
        type Service = dyn Shape;
    }

    #[derive(Debug, PartialEq)]
    struct Square;
    impl Shape for Square {
        fn sides(&self) -> usize {
            4
        }
    }
    impl Implements<ShapeKey> for Square {
        fn into_service(self: Arc<Self>) -> Arc<dyn Shape> {
            self
        }
    }

    const SQUARE: TypedBinding<ShapeKey, Square> = TypedBinding::new();
    const NAMED_SQUARE: TypedBinding<ShapeKey, Square> = TypedBinding::named("box");

    #[test]
    fn test_try_resolve_without_registration_is_none() {
        let registry = MapRegistry::default();
        assert!(SQUARE.try_resolve(&registry).unwrap().is_none());
        assert!(matches!(
            SQUARE.resolve(&registry).unwrap_err(),
            DependencyError::ComponentNotRegistered { .. }
        ));
    }

    #[test]
    fn test_try_resolve_after_register_returns_concrete() {
        let registry = MapRegistry::default();
        SQUARE.register(&registry, |_| Square);

        let square = SQUARE.try_resolve(&registry).unwrap().unwrap();
        assert_eq!(*square, Square);
    }

    #[test]
    fn test_named_binding_is_separate_from_unnamed() {
        let registry = MapRegistry::default();
        let entry = NAMED_SQUARE.register(&registry, |_| Square);

        assert_eq!(entry.id().name(), Some("box"));
        assert_eq!(NAMED_SQUARE.service_id(), ServiceId::named::<ShapeKey>("box"));
        assert!(SQUARE.try_resolve(&registry).unwrap().is_none());
        assert_eq!(NAMED_SQUARE.resolve(&registry).unwrap().sides(), 4);
    }

    #[test]
    fn test_register_fallible_propagates_factory_error() {
        let registry = MapRegistry::default();
        SQUARE.register_fallible(&registry, |_| {
            Err(DependencyError::resolution_failed("Square", "缺少边长"))
        });

        let err = SQUARE.resolve(&registry).unwrap_err();
        assert!(matches!(err, DependencyError::DependencyResolutionFailed { .. }));

        NAMED_SQUARE.register_fallible(&registry, |_| Ok(Square));
        assert!(NAMED_SQUARE.try_resolve(&registry).unwrap().is_some());
    }

    #[test]
    fn test_debug_names_key_and_concrete() {
        let rendered = format!("{:?}", NAMED_SQUARE);
        assert!(rendered.contains("ShapeKey"));
        assert!(rendered.contains("Square"));
        assert!(rendered.contains("box"));
    }
}
