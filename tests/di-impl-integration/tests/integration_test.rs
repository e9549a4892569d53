//! PersonType 绑定在完整容器上的集中集成测试
use di_abstractions::{
    Assembly, ContainerConfig, Implements, Registrar, RegistrarExt, Resolver, ResolverExt,
    ServiceKey,
};
use di_bindings::{
    InjectablePerson, InjectablePersonContainerExt, InjectablePersonResolverExt, Person,
    PersonAssembly, PersonSettings, PersonType,
};
use di_impl::{load_container_config, load_section, Container};
use infrastructure_common::{DependencyError, InfrastructureError, Lifetime};
use std::io::Write;
use std::sync::Arc;

/// 依赖 Person 的问候服务
#[derive(Debug)]
struct Greeter {
    person: Arc<InjectablePerson>,
}

struct GreeterKey;

impl ServiceKey for GreeterKey {
    type Service = Greeter;
}

impl Implements<GreeterKey> for Greeter {
    fn into_service(self: Arc<Self>) -> Arc<Greeter> {
        self
    }
}

fn register_greeter(container: &Container) {
    container.register_fallible::<GreeterKey, Greeter, _>(None, |resolver: &dyn Resolver| {
        Ok(Greeter {
            person: resolver.resolve_injectable_person()?,
        })
    });
}

#[test]
fn test_config_file_drives_container_and_person() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(
        "[container]\nvalidate_on_build = true\n\n[person]\nname = \"张三\"\nlifetime = \"transient\"\n"
            .as_bytes(),
    )?;

    let config = load_container_config(Some(file.path()))?;
    let settings: PersonSettings = load_section(Some(file.path()), "person")?;
    assert_eq!(settings.lifetime, Lifetime::Transient);

    let container = Container::builder()
        .with_config(config)
        .add_assembly(PersonAssembly::new(settings))
        .build()?;

    let a = container.resolve_injectable_person()?;
    let b = container.resolve_injectable_person()?;
    assert_eq!(a.name(), "张三");
    assert!(!Arc::ptr_eq(&a, &b));
    Ok(())
}

#[test]
fn test_dependent_service_shares_scoped_person() -> anyhow::Result<()> {
    let container = Container::new();
    container.register_injectable_person(|_| InjectablePerson::new("李四"));
    register_greeter(&container);

    let greeter = container.resolve::<GreeterKey>()?;
    assert_eq!(greeter.person.greet(), "你好, 我是李四");

    // 默认 Scoped: 不同的解析会话得到不同实例
    let again = container.resolve::<GreeterKey>()?;
    assert!(!Arc::ptr_eq(&greeter.person, &again.person));
    Ok(())
}

#[test]
fn test_missing_person_surfaces_through_dependent() {
    let container = Container::new();
    register_greeter(&container);

    let err = container.resolve::<GreeterKey>().err().unwrap();
    assert!(matches!(err, DependencyError::ComponentNotRegistered { .. }));
    assert!(err.to_string().contains("PersonType"));
}

struct GreeterAssembly;

impl Assembly for GreeterAssembly {
    fn name(&self) -> &str {
        "greeter"
    }

    fn assemble(&self, registrar: &dyn Registrar) {
        registrar.register_fallible::<GreeterKey, Greeter, _>(None, |resolver: &dyn Resolver| {
            Ok(Greeter {
                person: resolver.resolve_injectable_person()?,
            })
        });
    }
}

#[test]
fn test_validate_on_build_reports_missing_person() {
    let config = ContainerConfig {
        validate_on_build: true,
        ..Default::default()
    };
    let result = Container::builder()
        .with_config(config)
        .add_assembly(GreeterAssembly)
        .build();

    match result {
        Err(InfrastructureError::ValidationFailed { errors }) => {
            assert_eq!(errors.len(), 1);
            assert!(matches!(
                errors[0],
                DependencyError::ComponentNotRegistered { .. }
            ));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let container = Container::builder()
        .with_config(ContainerConfig {
            validate_on_build: true,
            ..Default::default()
        })
        .add_assembly(PersonAssembly::default())
        .add_assembly(GreeterAssembly)
        .build()
        .unwrap();
    assert_eq!(container.resolve::<GreeterKey>().unwrap().person.name(), "匿名");
}

#[test]
fn test_child_container_falls_back_and_overrides() -> anyhow::Result<()> {
    let parent = Arc::new(
        Container::builder()
            .add_assembly(PersonAssembly::new(PersonSettings {
                name: "父".to_string(),
                lifetime: Lifetime::Singleton,
            }))
            .build()?,
    );

    let child = Container::with_parent(parent.clone());
    assert_eq!(child.resolve_injectable_person()?.name(), "父");
    assert!(Arc::ptr_eq(
        &child.resolve_injectable_person()?,
        &parent.resolve_injectable_person()?
    ));

    child.register_injectable_person(|_| InjectablePerson::new("子"));
    assert_eq!(child.resolve_injectable_person()?.name(), "子");
    assert_eq!(parent.resolve_injectable_person()?.name(), "父");
    Ok(())
}

#[test]
fn test_named_registration_does_not_satisfy_default_accessor() {
    let container = Container::new();
    container.register_named::<PersonType, InjectablePerson, _>("guest", |_| {
        InjectablePerson::new("访客")
    });

    assert!(container.resolve_injectable_person().is_err());
    let guest = container.resolve_named::<PersonType>("guest").unwrap();
    assert_eq!(guest.name(), "访客");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_singleton_resolution() -> anyhow::Result<()> {
    let container = Arc::new(Container::new());
    container
        .register_injectable_person(|_| InjectablePerson::new("并发"))
        .in_scope(Lifetime::Singleton);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let container = container.clone();
            tokio::task::spawn_blocking(move || container.resolve_injectable_person())
        })
        .collect();

    let mut resolved = Vec::new();
    for handle in handles {
        resolved.push(handle.await??);
    }

    let first = &resolved[0];
    assert!(resolved.iter().all(|p| Arc::ptr_eq(p, first)));
    assert_eq!(container.stats().cached_instances, 1);
    Ok(())
}
