//! # Person 示例应用
//!
//! 从配置构建容器, 通过类型化访问器注册并解析 `PersonType`

use anyhow::Context;
use clap::Parser;
use di_abstractions::ResolverExt;
use di_bindings::{
    InjectablePersonResolverExt, Person, PersonAssembly, PersonSettings, PersonType,
};
use di_impl::{load_container_config, load_section, Container};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "person-demo")]
#[command(about = "PersonType 依赖注入示例")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "config/app.toml")]
    config: PathBuf,

    /// 日志级别, 未设置 RUST_LOG 时生效
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("启动 Person 示例应用");

    let container = build_container(&args)?;
    demonstrate_resolution(&container)?;

    let stats = container.stats();
    info!(
        "容器统计: 注册 {} 个, 解析 {} 次, 失败 {} 次, 缓存 {} 个",
        stats.registered_services,
        stats.resolutions,
        stats.resolution_errors,
        stats.cached_instances
    );
    Ok(())
}

/// 构建容器
fn build_container(args: &Args) -> anyhow::Result<Container> {
    let path = if args.config.exists() {
        Some(args.config.as_path())
    } else {
        warn!("配置文件不存在, 使用默认配置: {}", args.config.display());
        None
    };

    let config = load_container_config(path).context("加载容器配置失败")?;
    let settings: PersonSettings = load_section(path, "person").context("加载 person 配置失败")?;
    info!("Person 配置: name={}, lifetime={}", settings.name, settings.lifetime);

    let container = Container::builder()
        .with_config(config)
        .add_assembly(PersonAssembly::new(settings))
        .build()
        .context("构建容器失败")?;
    Ok(container)
}

/// 演示具体类型与服务键两种解析方式
fn demonstrate_resolution(container: &Container) -> anyhow::Result<()> {
    let person = container.resolve_injectable_person()?;
    info!("解析到 InjectablePerson: {}", person.greet());

    let service: Arc<dyn Person> = container.resolve::<PersonType>()?;
    info!("通过 PersonType 解析: {}", service.greet());

    for registration in container.registrations() {
        info!("注册项: {}", registration);
    }
    Ok(())
}
