//! 服务注册信息与注册句柄

use crate::key::{Implements, ServiceId, ServiceKey};
use crate::resolver::{ResolvedInstance, Resolver, Upcaster};
use infrastructure_common::{DependencyResult, Lifetime, RegistrationInfo, TypeInfo};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::marker::PhantomData;
use std::sync::{Arc, Weak};

/// 类型擦除的工厂函数, 返回值内部是具体类型的 `Arc<C>`
pub type ServiceFactoryFn = Arc<
    dyn Fn(&dyn Resolver) -> DependencyResult<Arc<dyn Any + Send + Sync>> + Send + Sync,
>;

/// 实例创建完成后的回调
pub type InitCallbackFn =
    Arc<dyn Fn(&dyn Resolver, &ResolvedInstance) -> DependencyResult<()> + Send + Sync>;

/// 注册信息上缓存的实例
enum CachedInstance {
    Empty,
    Strong(Arc<dyn Any + Send + Sync>),
    Weak(Weak<dyn Any + Send + Sync>),
}

impl CachedInstance {
    fn get(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        match self {
            Self::Empty => None,
            Self::Strong(instance) => Some(instance.clone()),
            Self::Weak(instance) => instance.upgrade(),
        }
    }
}

/// 一条服务注册
///
/// 由容器持有, 通过 [`ServiceEntry`] 对外暴露可配置部分。
pub struct Registration {
    id: ServiceId,
    concrete: TypeInfo,
    factory: ServiceFactoryFn,
    upcaster: Arc<dyn Any + Send + Sync>,
    lifetime: RwLock<Lifetime>,
    init_callbacks: RwLock<Vec<InitCallbackFn>>,
    cache: Mutex<CachedInstance>,
}

impl Registration {
    /// 用工厂创建注册
    pub fn new<K, C, F>(id: ServiceId, lifetime: Lifetime, factory: F) -> Self
    where
        K: ServiceKey,
        C: Implements<K>,
        F: Fn(&dyn Resolver) -> DependencyResult<C> + Send + Sync + 'static,
    {
        let factory: ServiceFactoryFn = Arc::new(move |resolver: &dyn Resolver| {
            let instance = factory(resolver)?;
            Ok(Arc::new(instance) as Arc<dyn Any + Send + Sync>)
        });

        Self {
            id,
            concrete: TypeInfo::of::<C>(),
            factory,
            upcaster: Arc::new(Upcaster::<K>::for_concrete::<C>()),
            lifetime: RwLock::new(lifetime),
            init_callbacks: RwLock::new(Vec::new()),
            cache: Mutex::new(CachedInstance::Empty),
        }
    }

    /// 用现成实例创建单例注册
    pub fn from_instance<K, C>(id: ServiceId, instance: Arc<C>) -> Self
    where
        K: ServiceKey,
        C: Implements<K>,
    {
        let erased: Arc<dyn Any + Send + Sync> = instance;
        let shared = erased.clone();
        let factory: ServiceFactoryFn = Arc::new(move |_: &dyn Resolver| Ok(shared.clone()));

        Self {
            id,
            concrete: TypeInfo::of::<C>(),
            factory,
            upcaster: Arc::new(Upcaster::<K>::for_concrete::<C>()),
            lifetime: RwLock::new(Lifetime::Singleton),
            init_callbacks: RwLock::new(Vec::new()),
            cache: Mutex::new(CachedInstance::Strong(erased)),
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

    /// 当前生命周期
    pub fn lifetime(&self) -> Lifetime {
        *self.lifetime.read()
    }

    /// 修改生命周期, 同时丢弃已缓存的实例
    pub fn set_lifetime(&self, lifetime: Lifetime) {
        *self.lifetime.write() = lifetime;
        self.reset_cache();
    }

    /// 追加创建完成回调
    pub fn add_init_callback(&self, callback: InitCallbackFn) {
        self.init_callbacks.write().push(callback);
    }

    /// 注册元数据
    pub fn info(&self) -> RegistrationInfo {
        RegistrationInfo {
            key: self.id.key().clone(),
            concrete: self.concrete.clone(),
            name: self.id.name().map(str::to_string),
            lifetime: self.lifetime(),
        }
    }

    /// 调用工厂创建新实例, 不执行回调也不缓存
    pub fn instantiate(&self, resolver: &dyn Resolver) -> DependencyResult<ResolvedInstance> {
        let instance = (self.factory)(resolver)?;
        Ok(self.wrap(instance))
    }

    /// 依次执行创建完成回调
    pub fn run_init_callbacks(
        &self,
        resolver: &dyn Resolver,
        instance: &ResolvedInstance,
    ) -> DependencyResult<()> {
        // 先复制一份, 回调里可能再次访问本注册
        let callbacks = self.init_callbacks.read().clone();
        for callback in callbacks {
            callback(resolver, instance)?;
        }
        Ok(())
    }

    /// 读取缓存实例
    pub fn cached(&self) -> Option<ResolvedInstance> {
        self.cache.lock().get().map(|instance| self.wrap(instance))
    }

    /// 缓存实例, 已有存活实例时保留旧值
    ///
    /// 应在创建完成回调全部成功之后调用, 缓存中只出现初始化完成的实例。
    ///
    /// 返回最终被缓存的实例, 以及它是否就是传入的实例。
    pub fn store(&self, instance: ResolvedInstance) -> (ResolvedInstance, bool) {
        let lifetime = self.lifetime();
        let mut cache = self.cache.lock();
        if let Some(existing) = cache.get() {
            return (self.wrap(existing), false);
        }

        *cache = match lifetime {
            Lifetime::Weak => CachedInstance::Weak(Arc::downgrade(instance.as_any())),
            _ => CachedInstance::Strong(instance.as_any().clone()),
        };
        (instance, true)
    }

    /// 是否持有存活的缓存实例
    pub fn has_cached_instance(&self) -> bool {
        self.cache.lock().get().is_some()
    }

    /// 丢弃缓存实例
    pub fn reset_cache(&self) {
        *self.cache.lock() = CachedInstance::Empty;
    }

    fn wrap(&self, instance: Arc<dyn Any + Send + Sync>) -> ResolvedInstance {
        ResolvedInstance::new(
            self.id.clone(),
            self.concrete.clone(),
            instance,
            self.upcaster.clone(),
        )
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("concrete", &self.concrete.name)
            .field("lifetime", &self.lifetime())
            .field("init_callbacks", &self.init_callbacks.read().len())
            .field("factory", &"<function>")
            .finish()
    }
}

/// 注册句柄
///
/// 注册接口返回它以便继续配置生命周期和回调, 忽略它也不影响注册本身。
pub struct ServiceEntry<K: ServiceKey> {
    registration: Arc<Registration>,
    _key: PhantomData<fn() -> K>,
}

impl<K: ServiceKey> ServiceEntry<K> {
    /// 包装注册信息
    pub fn new(registration: Arc<Registration>) -> Self {
        Self {
            registration,
            _key: PhantomData,
        }
    }

    /// 设置生命周期
    pub fn in_scope(self, lifetime: Lifetime) -> Self {
        self.registration.set_lifetime(lifetime);
        self
    }

    /// 实例创建完成后执行回调
    ///
    /// 回调在实例进入缓存之后运行, 因此可以借助它解析互相引用的服务。
    pub fn init_completed<F>(self, callback: F) -> Self
    where
        F: Fn(&dyn Resolver, Arc<K::Service>) -> DependencyResult<()> + Send + Sync + 'static,
    {
        let erased: InitCallbackFn = Arc::new(
            move |resolver: &dyn Resolver, instance: &ResolvedInstance| {
                let service = instance.clone().into_service::<K>()?;
                callback(resolver, service)
            },
        );
        self.registration.add_init_callback(erased);
        self
    }

    /// 注册标识
    pub fn id(&self) -> &ServiceId {
        self.registration.id()
    }

    /// 当前生命周期
    pub fn lifetime(&self) -> Lifetime {
        self.registration.lifetime()
    }

    /// 注册元数据
    pub fn info(&self) -> RegistrationInfo {
        self.registration.info()
    }

    /// 底层注册信息
    pub fn registration(&self) -> &Arc<Registration> {
        &self.registration
    }
}

impl<K: ServiceKey> Clone for ServiceEntry<K> {
    fn clone(&self) -> Self {
        Self::new(self.registration.clone())
    }
}

impl<K: ServiceKey> std::fmt::Debug for ServiceEntry<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceEntry")
            .field("registration", &self.registration)
            .finish()
    }
}
