//! # 解析器模块
//!
//! 邮件正文的 HTML 解析与序列化能力：
//!
//! - 把正文字节解码并解析为可变 DOM 树
//! - 按文档顺序枚举元素、读写属性、收集文本
//! - 把改写后的 DOM 序列化回 HTML 字符串
//!
//! # 模块组织
//!
//! - `html` - HTML 文档解析、DOM 操作、序列化

pub mod html;

// Re-export commonly used items for convenience
pub use html::{
    find_nodes, get_child_node_by_name, get_node_attr, get_node_name, get_node_text, html_to_dom,
    serialize_document, serialize_to_string, set_node_attr,
};
