//! 通用标记属性处理

use ioc_common::metadata::markers;
use ioc_common::{AnnotationMetadata, BeanDescriptor, BeanScope};
use tracing::warn;

/// 判定元数据是否为配置候选
///
/// 携带配置、组件、组件扫描或导入标记之一即为候选
pub fn is_configuration_candidate(metadata: &dyn AnnotationMetadata) -> bool {
    metadata.is_annotated(markers::CONFIGURATION)
        || metadata.is_annotated(markers::COMPONENT)
        || metadata.is_annotated(markers::COMPONENT_SCAN)
        || metadata.is_annotated(markers::IMPORT)
}

/// 把通用标记翻译为定义字段
///
/// 延迟标记缺省取值为真；作用域标记取值非法时忽略并告警
pub fn apply_common_attributes(
    mut descriptor: BeanDescriptor,
    metadata: &dyn AnnotationMetadata,
) -> BeanDescriptor {
    if metadata.is_annotated(markers::LAZY) {
        let lazy = metadata.bool_attribute(markers::LAZY, "value").unwrap_or(true);
        descriptor = descriptor.with_lazy(lazy);
    }

    if metadata.is_annotated(markers::PRIMARY) {
        descriptor = descriptor.with_primary(true);
    }

    if let Some(scope_value) = metadata.string_attribute(markers::SCOPE, "value") {
        match BeanScope::parse(&scope_value) {
            Some(scope) => descriptor = descriptor.with_scope(scope),
            None => warn!(
                "Bean '{}' 的作用域取值无法识别, 保持原作用域: {}",
                descriptor.name, scope_value
            ),
        }
    }

    descriptor
}

/// 首字母小写的命名转换，用于从简单类型名派生 Bean 名称
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
