//! 容器配置加载
//!
//! 配置来源依次为可选的配置文件和 `DI__` 前缀的环境变量, 后者覆盖前者。

use di_abstractions::ContainerConfig;
use infrastructure_common::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, error};

/// 环境变量前缀, 例如 `DI__CONTAINER__MAX_RESOLUTION_DEPTH=50`
pub const ENV_PREFIX: &str = "DI";

/// 配置节名称
pub const CONFIG_SECTION: &str = "container";

/// 加载容器配置
///
/// 文件格式按扩展名识别（toml / json / yaml）。指定的文件不存在时返回错误。
pub fn load_container_config(path: Option<&Path>) -> ConfigResult<ContainerConfig> {
    let container: ContainerConfig = load_section(path, CONFIG_SECTION)?;
    container.validate()?;
    Ok(container)
}

/// 从同一组配置来源绑定任意配置节, 配置节缺失时返回默认值
pub fn load_section<T>(path: Option<&Path>, section: &str) -> ConfigResult<T>
where
    T: DeserializeOwned + Default,
{
    let settings = build_settings(path)?;

    match settings.get::<T>(section) {
        Ok(value) => Ok(value),
        Err(config::ConfigError::NotFound(_)) => {
            debug!("未找到 {} 配置节, 使用默认配置", section);
            Ok(T::default())
        }
        Err(e) => {
            error!("配置绑定失败: path={}, error={}", section, e);
            Err(ConfigError::parse(e))
        }
    }
}

fn build_settings(path: Option<&Path>) -> ConfigResult<config::Config> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        debug!("加载配置文件: {}", path.display());
        builder = builder.add_source(config::File::from(path));
    }

    builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| {
            error!("配置构建失败: {}", e);
            ConfigError::parse(e)
        })
}
