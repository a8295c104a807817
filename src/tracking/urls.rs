//! 追踪 URL 构造
//!
//! 打开追踪与点击追踪两类 URL 的纯函数构造，以及保留 `{{ ... }}`
//! 模板占位符的目标地址编码。所有函数对空入参都给出语法合法的
//! URL，绝不中断调用方的发送流程。

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::tracking::context::TrackingContext;

/// Encode every byte except ASCII alphanumerics and -_.!~*'(),
/// so the redirect endpoint's component decoder round-trips the value
const DESTINATION_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 链接标识截断到 9 字节摘要，base64 后得到 12 个字符
const LINK_ID_DIGEST_LEN: usize = 9;

/// 构造打开追踪 URL
///
/// `https://{host}/links/open/{campaign}?r={recipient}&u={user}&l={list}`，
/// 其中用户标识以 URL 安全的 base64 呈现，不落明文。
/// 对同一上下文反复调用得到完全相同的字符串。
pub fn opens_track_url(api_host: &str, context: &TrackingContext) -> String {
    format!(
        "https://{}/links/open/{}?r={}&u={}&l={}",
        api_host,
        context.campaign.id,
        context.recipient.id,
        encode_user_id(&context.user_id),
        context.recipient.list_id
    )
}

/// 构造点击追踪 URL
///
/// `https://{host}/links/click/{campaign}/{link}?url={encoded}`。
/// 目标地址经过保留占位符的百分号编码。
pub fn clicks_track_url(
    api_host: &str,
    campaign_id: &str,
    link_id: &str,
    destination: &str,
) -> String {
    format!(
        "https://{}/links/click/{}/{}?url={}",
        api_host,
        campaign_id,
        link_id,
        encode_destination(destination)
    )
}

/// 对点击目标地址进行百分号编码，保留模板占位符
///
/// 形如 `{{ name }}` 的平衡占位符原样透传，交给后续模板引擎替换；
/// 编码它们会破坏模板语法。不成对或嵌套的花括号按普通文本编码。
pub fn encode_destination(destination: &str) -> String {
    let placeholder_re = Regex::new(r"\{\{[^{}]*\}\}").unwrap();

    let mut encoded = String::with_capacity(destination.len());
    let mut cursor = 0;

    for placeholder in placeholder_re.find_iter(destination) {
        encoded.push_str(
            &utf8_percent_encode(
                &destination[cursor..placeholder.start()],
                DESTINATION_ENCODE_SET,
            )
            .to_string(),
        );
        encoded.push_str(placeholder.as_str());
        cursor = placeholder.end();
    }

    encoded.push_str(&utf8_percent_encode(&destination[cursor..], DESTINATION_ENCODE_SET).to_string());

    encoded
}

/// 以 URL 安全的 base64 编码用户标识
///
/// 可还原但不是明文，适合放进会被转发的追踪 URL。
pub fn encode_user_id(user_id: &str) -> String {
    URL_SAFE_NO_PAD.encode(user_id.as_bytes())
}

/// 生成锚点的链接标识
///
/// 取锚点在文档中的位置与原始地址做 SHA-256，截断后以 URL 安全的
/// base64 呈现。位置参与摘要，同一次遍历内的标识必然互不相同。
pub fn generate_link_id(position: usize, destination: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(position.to_be_bytes());
    hasher.update(destination.as_bytes());
    let digest = hasher.finalize();

    URL_SAFE_NO_PAD.encode(&digest[..LINK_ID_DIGEST_LEN])
}
