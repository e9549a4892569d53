//! `PersonType` -> `InjectablePerson` 的类型化访问器

use crate::person::{InjectablePerson, PersonType};
use di_abstractions::{Registrar, Resolver, ServiceEntry, TypedBinding};
use infrastructure_common::DependencyResult;
use std::sync::Arc;

const BINDING: TypedBinding<PersonType, InjectablePerson> = TypedBinding::new();

/// 解析 `InjectablePerson`
pub trait InjectablePersonResolverExt {
    /// 按 `PersonType` 解析并转换为 `InjectablePerson`, 注册的实现类型不符时返回 `TypeMismatch`
    fn resolve_injectable_person(&self) -> DependencyResult<Arc<InjectablePerson>>;
}

impl<R: Resolver + ?Sized> InjectablePersonResolverExt for R {
    fn resolve_injectable_person(&self) -> DependencyResult<Arc<InjectablePerson>> {
        BINDING.resolve(self)
    }
}

/// 以 `PersonType` 为键注册 `InjectablePerson`
pub trait InjectablePersonContainerExt {
    /// 注册工厂, 返回可继续配置生命周期和回调的注册句柄
    fn register_injectable_person<F>(&self, factory: F) -> ServiceEntry<PersonType>
    where
        F: Fn(&dyn Resolver) -> InjectablePerson + Send + Sync + 'static;
}

impl<G: Registrar + ?Sized> InjectablePersonContainerExt for G {
    fn register_injectable_person<F>(&self, factory: F) -> ServiceEntry<PersonType>
    where
        F: Fn(&dyn Resolver) -> InjectablePerson + Send + Sync + 'static,
    {
        BINDING.register(self, factory)
    }
}
