//! 追踪上下文
//!
//! 一次发送涉及的全部标识，构造后只读。

use serde::{Deserialize, Serialize};

/// 活动标识
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRef {
    pub id: String,
}

/// 收件人标识
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientRef {
    pub id: String,
    pub list_id: String,
}

/// 一次发送的完整追踪上下文
///
/// 缺失的字段在生成的 URL 中表现为空片段，不会中断整个发送管道。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingContext {
    pub campaign: CampaignRef,
    pub recipient: RecipientRef,
    pub user_id: String,
}

impl TrackingContext {
    /// 由各标识直接构造
    pub fn new(
        campaign_id: impl Into<String>,
        recipient_id: impl Into<String>,
        list_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            campaign: CampaignRef {
                id: campaign_id.into(),
            },
            recipient: RecipientRef {
                id: recipient_id.into(),
                list_id: list_id.into(),
            },
            user_id: user_id.into(),
        }
    }
}
