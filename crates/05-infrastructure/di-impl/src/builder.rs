//! 容器构建器实现

use crate::container::Container;
use di_abstractions::{Assembly, ContainerConfig};
use infrastructure_common::{InfrastructureError, InfrastructureResult};
use std::sync::Arc;
use tracing::info;

/// 容器构建器
pub struct ContainerBuilder {
    config: ContainerConfig,
    parent: Option<Arc<Container>>,
    assemblies: Vec<Box<dyn Assembly>>,
}

impl ContainerBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
            parent: None,
            assemblies: Vec::new(),
        }
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置父容器
    pub fn with_parent(mut self, parent: Arc<Container>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// 添加装配单元, 按添加顺序执行
    pub fn add_assembly(mut self, assembly: impl Assembly + 'static) -> Self {
        self.assemblies.push(Box::new(assembly));
        self
    }

    /// 构建容器
    pub fn build(self) -> InfrastructureResult<Container> {
        self.config.validate()?;

        let mut container = Container::with_config(self.config);
        if let Some(parent) = self.parent {
            container.set_parent(parent);
        }

        for assembly in &self.assemblies {
            info!("执行装配单元: {}", assembly.name());
            assembly.assemble(&container);
        }

        if container.config().validate_on_build {
            container
                .validate()
                .map_err(|errors| InfrastructureError::ValidationFailed { errors })?;
        }

        info!(
            "构建容器完成，执行了 {} 个装配单元, 注册了 {} 个服务",
            self.assemblies.len(),
            container.stats().registered_services
        );
        Ok(container)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("config", &self.config)
            .field("has_parent", &self.parent.is_some())
            .field(
                "assemblies",
                &self.assemblies.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
