use encoding_rs::Encoding;
use html5ever::serialize::{serialize, SerializeOpts};
use markup5ever_rcdom::{RcDom, SerializableHandle};

use crate::core::MailtrackError;

/// 序列化文档
///
/// `document_encoding` 非空且可识别时，输出会重新编码到该字符集。
pub fn serialize_document(
    dom: RcDom,
    document_encoding: String,
) -> Result<Vec<u8>, MailtrackError> {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = dom.document.into();
    serialize(&mut buf, &serializable, SerializeOpts::default())
        .map_err(|err| MailtrackError::new(&format!("unable to serialize DOM: {}", err)))?;

    if !document_encoding.is_empty() {
        if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
            let s: &str = &String::from_utf8_lossy(&buf);
            let (data, _, _) = encoding.encode(s);
            buf = data.to_vec();
        }
    }

    Ok(buf)
}

/// 序列化为 UTF-8 字符串
pub fn serialize_to_string(dom: RcDom) -> Result<String, MailtrackError> {
    let buf = serialize_document(dom, "".to_string())?;
    Ok(String::from_utf8_lossy(&buf).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::dom::html_to_dom;

    #[test]
    fn test_serialize_roundtrip_keeps_content() {
        let dom = html_to_dom(
            b"<body>Hello <a href=\"http://example.com\">world</a></body>",
            "utf-8".to_string(),
        )
        .unwrap();
        let html = serialize_to_string(dom).unwrap();

        assert!(html.contains("Hello"));
        assert!(html.contains("<a href=\"http://example.com\">world</a>"));
    }

    #[test]
    fn test_serialize_document_reencodes_charset() {
        let dom = html_to_dom(b"<body>caf\xc3\xa9</body>", "utf-8".to_string()).unwrap();
        let bytes = serialize_document(dom, "iso-8859-1".to_string()).unwrap();

        // 0xE9 is the latin-1 byte for 'é'
        assert!(bytes.contains(&0xE9));
    }
}
