//! 元数据定义
//!
//! 提供类型和注册信息的元数据

use crate::lifecycle::Lifetime;
use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full = std::any::type_name::<T>();
        Self {
            name: short_type_name(full),
            id: TypeId::of::<T>(),
            module_path: full.to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// 逐段去掉模块路径, 泛型参数和 `dyn` 约束里的路径同样去掉
fn short_type_name(full: &str) -> String {
    let mut short = String::with_capacity(full.len());
    let mut start = 0;
    for (index, c) in full.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | '*' | ';' | '+') {
            short.push_str(last_segment(&full[start..index]));
            short.push(c);
            start = index + c.len_utf8();
        }
    }
    short.push_str(last_segment(&full[start..]));
    short
}

fn last_segment(path: &str) -> &str {
    match path.rfind("::") {
        Some(pos) => &path[pos + 2..],
        None => path,
    }
}

/// 注册信息元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInfo {
    /// 服务键类型
    pub key: TypeInfo,
    /// 具体实现类型
    pub concrete: TypeInfo,
    /// 注册名称
    pub name: Option<String>,
    /// 生命周期
    pub lifetime: Lifetime,
}

impl fmt::Display for RegistrationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(
                f,
                "{}[{}] -> {} ({})",
                self.key, name, self.concrete, self.lifetime
            ),
            None => write!(f, "{} -> {} ({})", self.key, self.concrete, self.lifetime),
        }
    }
}
