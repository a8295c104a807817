//! # 追踪模块
//!
//! 邮件打开与点击追踪的核心逻辑：
//!
//! - 由发送上下文构造确定性的追踪 URL
//! - 改写正文锚点并产出链接数据集
//! - 注入打开追踪像素
//!
//! # 模块组织
//!
//! - `context` - 追踪上下文标识
//! - `error` - 统一错误处理
//! - `urls` - 追踪 URL 构造与目标地址编码
//! - `links` - 正文链接改写

pub mod context;
pub mod error;
pub mod links;
pub mod urls;

// Re-export commonly used items for convenience
pub use context::{CampaignRef, RecipientRef, TrackingContext};
pub use error::{TrackingError, TrackingResult};
pub use links::{
    CampaignLinks, LinkRecord, LinksParser, LinksParserOptions, ParseResult,
    DISABLE_TRACKING_ATTR, UNSUBSCRIBE_PLACEHOLDER,
};
pub use urls::{
    clicks_track_url, encode_destination, encode_user_id, generate_link_id, opens_track_url,
};
