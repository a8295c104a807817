//! 链接重写模块
//!
//! 在邮件正文发送前完成三件事：把可追踪锚点的目标地址改写为点击
//! 追踪跳转并产出链接数据集、向正文注入打开追踪像素、在已改写的
//! 追踪链接上补充收件人参数。
//!
//! 每次调用独立解析一棵 DOM，调用之间不共享可变状态；实例内只持有
//! 只读的主机名与上下文，同一实例上的并发调用是安全的。

use html5ever::interface::{Attribute, QualName};
use html5ever::tendril::format_tendril;
use html5ever::tree_builder::create_element;
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, RcDom};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::parsers::html::{
    find_nodes, get_child_node_by_name, get_node_attr, get_node_text, html_to_dom,
    serialize_to_string, set_node_attr,
};
use crate::tracking::context::TrackingContext;
use crate::tracking::error::{TrackingError, TrackingResult};
use crate::tracking::urls;
use crate::utils::url::{append_query_params, is_click_tracking_url};

/// 退订占位符：保留给模板引擎的退订链接，必须原样保留
pub const UNSUBSCRIBE_PLACEHOLDER: &str = "{{ unsubscribe_url }}";

/// 显式关闭追踪的锚点属性
pub const DISABLE_TRACKING_ATTR: &str = "mm-disable-tracking";

/// LinksParser 构造选项
#[derive(Debug, Clone, Default)]
pub struct LinksParserOptions {
    /// 两类追踪 URL 共用的主机名
    pub api_host: String,
    /// 本次发送的追踪上下文
    pub context: TrackingContext,
}

/// 单个被改写链接的元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// 本次遍历内唯一的链接标识
    pub id: String,
    /// 改写前的原始目标地址
    pub url: String,
    /// 解析时锚点的可见文本
    pub text: String,
}

/// 一次遍历产出的链接数据集
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignLinks {
    /// 活动标识
    pub id: String,
    /// 按文档顺序排列的被改写链接
    pub links: Vec<LinkRecord>,
}

/// `parse_links` 的完整结果
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// 改写后的正文
    pub parsed_body: String,
    /// 链接数据集
    pub campaign_links: CampaignLinks,
}

/// 邮件正文链接改写器
#[derive(Debug, Clone)]
pub struct LinksParser {
    api_host: String,
    context: TrackingContext,
}

impl LinksParser {
    pub fn new(options: LinksParserOptions) -> Self {
        Self {
            api_host: options.api_host,
            context: options.context,
        }
    }

    /// 由主机名和上下文直接构造
    pub fn from_parts(api_host: impl Into<String>, context: TrackingContext) -> Self {
        Self {
            api_host: api_host.into(),
            context,
        }
    }

    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    pub fn campaign_id(&self) -> &str {
        &self.context.campaign.id
    }

    /// 打开追踪 URL；对同一实例反复调用得到相同字符串
    pub fn opens_track_url(&self) -> String {
        urls::opens_track_url(&self.api_host, &self.context)
    }

    /// 某个链接的点击追踪 URL
    pub fn clicks_track_url(&self, link_id: &str, destination: &str) -> String {
        urls::clicks_track_url(&self.api_host, &self.context.campaign.id, link_id, destination)
    }

    /// 解析正文并改写全部可追踪锚点
    ///
    /// 对每个既非退订占位符、也未显式关闭追踪的带 href 锚点：
    /// 生成链接标识，记录原始地址与可见文本，把 href 换成点击追踪
    /// URL。没有 href 的锚点直接跳过，不计入数据集。
    pub async fn parse_links(&self, body: &str) -> TrackingResult<ParseResult> {
        let dom = parse_body(body)?;
        let mut links: Vec<LinkRecord> = Vec::new();

        for (position, anchor) in find_nodes(&dom.document, "a").iter().enumerate() {
            let href = match get_node_attr(anchor, "href") {
                Some(value) => value,
                None => {
                    debug!("skipping anchor without href");
                    continue;
                }
            };

            if !self.should_track(anchor, &href) {
                continue;
            }

            let link_id = urls::generate_link_id(position, &href);
            let text = get_node_text(anchor);
            let tracking_href = self.clicks_track_url(&link_id, &href);

            set_node_attr(anchor, "href", &tracking_href);
            links.push(LinkRecord {
                id: link_id,
                url: href,
                text,
            });
        }

        let parsed_body = serialize_body(dom)?;

        Ok(ParseResult {
            parsed_body,
            campaign_links: CampaignLinks {
                id: self.context.campaign.id.clone(),
                links,
            },
        })
    }

    /// 在正文末尾注入不可见的打开追踪像素
    ///
    /// 纯追加操作：在 body 尾部挂一个 1x1 图片，src 指向打开追踪
    /// URL，不触碰既有内容与锚点。
    pub async fn append_opens_pixel(&self, body: &str) -> TrackingResult<String> {
        let dom = parse_body(body)?;

        if let Some(html) = get_child_node_by_name(&dom.document, "html") {
            if let Some(body_node) = get_child_node_by_name(&html, "body") {
                let pixel = create_element(
                    &dom,
                    QualName::new(None, ns!(), LocalName::from("img")),
                    vec![
                        Attribute {
                            name: QualName::new(None, ns!(), LocalName::from("src")),
                            value: format_tendril!("{}", self.opens_track_url()),
                        },
                        Attribute {
                            name: QualName::new(None, ns!(), LocalName::from("width")),
                            value: format_tendril!("1"),
                        },
                        Attribute {
                            name: QualName::new(None, ns!(), LocalName::from("height")),
                            value: format_tendril!("1"),
                        },
                        Attribute {
                            name: QualName::new(None, ns!(), LocalName::from("border")),
                            value: format_tendril!("0"),
                        },
                    ],
                );

                body_node.children.borrow_mut().push(pixel);
            }
        }

        serialize_body(dom)
    }

    /// 在已改写的追踪链接上补充收件人参数
    ///
    /// 活动级改写不带收件人信息，发送时逐收件人补上 `r`、`u`、`l`。
    /// 只处理指向本实例点击端点的链接；缺失 href 或无法解析的锚点
    /// 不会导致整个调用失败。
    pub async fn append_recipient_id_to_links(&self, body: &str) -> TrackingResult<String> {
        let dom = parse_body(body)?;
        let encoded_user_id = urls::encode_user_id(&self.context.user_id);

        for anchor in find_nodes(&dom.document, "a").iter() {
            let href = match get_node_attr(anchor, "href") {
                Some(value) => value,
                None => {
                    debug!("skipping anchor without href");
                    continue;
                }
            };

            if !is_click_tracking_url(&href, &self.api_host) {
                continue;
            }

            let params = [
                ("r", self.context.recipient.id.as_str()),
                ("u", encoded_user_id.as_str()),
                ("l", self.context.recipient.list_id.as_str()),
            ];

            match append_query_params(&href, &params) {
                Some(updated_href) => set_node_attr(anchor, "href", &updated_href),
                None => {
                    warn!("unable to parse tracking link, leaving unchanged: {}", href);
                }
            }
        }

        serialize_body(dom)
    }

    /// 判定锚点是否参与追踪改写
    fn should_track(&self, anchor: &Handle, href: &str) -> bool {
        if href == UNSUBSCRIBE_PLACEHOLDER {
            debug!("skipping unsubscribe placeholder link");
            return false;
        }

        if get_node_attr(anchor, DISABLE_TRACKING_ATTR).is_some() {
            debug!("skipping anchor with tracking disabled: {}", href);
            return false;
        }

        true
    }
}

fn parse_body(body: &str) -> TrackingResult<RcDom> {
    html_to_dom(body.as_bytes(), "utf-8".to_string())
        .map_err(|err| TrackingError::Parse(err.to_string()))
}

fn serialize_body(dom: RcDom) -> TrackingResult<String> {
    serialize_to_string(dom).map_err(|err| TrackingError::Serialize(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> LinksParser {
        LinksParser::new(LinksParserOptions {
            api_host: "fakeapi.com".to_string(),
            context: TrackingContext::new("campaign-id", "recipient-id", "some-list-id", "user-id"),
        })
    }

    #[tokio::test]
    async fn test_unsubscribe_placeholder_not_tracked() {
        let body = format!("<a href=\"{}\">unsubscribe here</a>", UNSUBSCRIBE_PLACEHOLDER);
        let result = parser().parse_links(&body).await.unwrap();

        assert!(result.campaign_links.links.is_empty());
        assert!(result.parsed_body.contains(UNSUBSCRIBE_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_disable_tracking_attribute_not_tracked() {
        let body = format!(
            "<a {}=\"true\" href=\"http://example-skip.com\">some link</a>",
            DISABLE_TRACKING_ATTR
        );
        let result = parser().parse_links(&body).await.unwrap();

        assert!(result.campaign_links.links.is_empty());
        assert!(result.parsed_body.contains("http://example-skip.com"));
    }

    #[tokio::test]
    async fn test_document_without_anchors() {
        let result = parser().parse_links("<p>no links at all</p>").await.unwrap();

        assert!(result.campaign_links.links.is_empty());
        assert!(result.parsed_body.contains("no links at all"));
        assert_eq!(result.campaign_links.id, "campaign-id");
    }
}
