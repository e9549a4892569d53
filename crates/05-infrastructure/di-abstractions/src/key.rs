//! 服务键抽象
//!
//! 服务键是只用于查找的标记类型, 通过关联类型声明它所代表的抽象契约。

use infrastructure_common::TypeInfo;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// 服务键 trait
///
/// ```ignore
/// pub struct PersonType;
///
/// impl ServiceKey for PersonType {
///     type Service = dyn Person;
/// }
/// ```
pub trait ServiceKey: 'static {
    /// 该键对应的服务契约
    type Service: ?Sized + Send + Sync + 'static;
}

/// 具体实现与服务键的绑定关系
///
/// 实现方负责把 `Arc<Self>` 转成键所声明的契约类型, 通常就是一次 unsize 转换。
pub trait Implements<K: ServiceKey>: Send + Sync + 'static {
    /// 转换为服务契约
    fn into_service(self: Arc<Self>) -> Arc<K::Service>;
}

/// 以具体类型自身作为服务键
pub struct Concrete<C>(PhantomData<fn() -> C>);

impl<C: Send + Sync + 'static> ServiceKey for Concrete<C> {
    type Service = C;
}

impl<C: Send + Sync + 'static> Implements<Concrete<C>> for C {
    fn into_service(self: Arc<Self>) -> Arc<C> {
        self
    }
}

/// 注册标识: 服务键类型加可选名称
#[derive(Debug, Clone)]
pub struct ServiceId {
    key: TypeInfo,
    name: Option<String>,
}

impl ServiceId {
    /// 未命名注册
    pub fn of<K: ServiceKey>() -> Self {
        Self {
            key: TypeInfo::of::<K>(),
            name: None,
        }
    }

    /// 命名注册
    pub fn named<K: ServiceKey>(name: impl Into<String>) -> Self {
        Self {
            key: TypeInfo::of::<K>(),
            name: Some(name.into()),
        }
    }

    /// 按可选名称构造
    pub fn with_name<K: ServiceKey>(name: Option<String>) -> Self {
        Self {
            key: TypeInfo::of::<K>(),
            name,
        }
    }

    /// 服务键类型信息
    pub fn key(&self) -> &TypeInfo {
        &self.key
    }

    /// 注册名称
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl PartialEq for ServiceId {
    fn eq(&self, other: &Self) -> bool {
        self.key.id == other.key.id && self.name == other.name
    }
}

impl Eq for ServiceId {}

impl Hash for ServiceId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.id.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}[{}]", self.key, name),
            None => write!(f, "{}", self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct KeyA;
    impl ServiceKey for KeyA {
        type Service = str;
    }

    struct KeyB;
    impl ServiceKey for KeyB {
        type Service = str;
    }

    #[test]
    fn test_service_id_equality() {
        assert_eq!(ServiceId::of::<KeyA>(), ServiceId::of::<KeyA>());
        assert_ne!(ServiceId::of::<KeyA>(), ServiceId::of::<KeyB>());
        assert_ne!(ServiceId::of::<KeyA>(), ServiceId::named::<KeyA>("x"));
        assert_eq!(ServiceId::named::<KeyA>("x"), ServiceId::with_name::<KeyA>(Some("x".into())));
    }

    #[test]
    fn test_service_id_hash_set() {
        let mut ids = HashSet::new();
        ids.insert(ServiceId::of::<KeyA>());
        ids.insert(ServiceId::of::<KeyA>());
        ids.insert(ServiceId::named::<KeyA>("x"));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_service_id_display() {
        assert_eq!(ServiceId::of::<KeyA>().to_string(), "KeyA");
        assert_eq!(ServiceId::named::<KeyB>("primary").to_string(), "KeyB[primary]");
    }

    #[test]
    fn test_concrete_key_is_identity() {
        let value = Arc::new(7_u32);
        let service = <u32 as Implements<Concrete<u32>>>::into_service(value.clone());
        assert!(Arc::ptr_eq(&value, &service));
    }
}
