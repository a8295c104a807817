//! URL 工具函数

use url::Url;

/// 判断 href 是否指向给定追踪主机的点击重定向端点
///
/// 占位符、相对引用等解析不了的值一律视为非追踪链接。
pub fn is_click_tracking_url(href: &str, api_host: &str) -> bool {
    match Url::parse(href) {
        Ok(url) => url.host_str() == Some(api_host) && url.path().starts_with("/links/click/"),
        Err(_) => false,
    }
}

/// 向已有 URL 追加查询参数；解析失败时返回 None
pub fn append_query_params(href: &str, params: &[(&str, &str)]) -> Option<String> {
    let mut url = Url::parse(href).ok()?;
    url.query_pairs_mut().extend_pairs(params.iter().copied());
    Some(url.to_string())
}
