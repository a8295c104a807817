//! # 工具模块
//!
//! 这个模块包含各种工具函数和实用程序：
//!
//! - 追踪链接判定
//! - 查询参数追加
//!
//! # 模块组织
//!
//! - `url` - URL 判定与查询参数处理

pub mod url;

// Re-export commonly used items for convenience
pub use url::{append_query_params, is_click_tracking_url};
