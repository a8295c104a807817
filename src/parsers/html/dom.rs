use encoding_rs::Encoding;
use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::tendril::{format_tendril, TendrilSink};
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::core::MailtrackError;

/// 将 HTML 字节按声明的字符集解码并解析为 DOM
pub fn html_to_dom(data: &[u8], document_encoding: String) -> Result<RcDom, MailtrackError> {
    let s: String;

    if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        s = string.to_string();
    } else {
        s = String::from_utf8_lossy(data).to_string();
    }

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
        .map_err(|err| MailtrackError::new(&format!("unable to parse document: {}", err)))
}

/// 按文档顺序收集所有指定名称的元素节点
pub fn find_nodes(node: &Handle, node_name: &str) -> Vec<Handle> {
    let mut found_nodes = Vec::new();

    if let NodeData::Element { ref name, .. } = node.data {
        if &*name.local == node_name {
            found_nodes.push(node.clone());
        }
    }

    for child_node in node.children.borrow().iter() {
        found_nodes.append(&mut find_nodes(child_node, node_name));
    }

    found_nodes
}

/// 根据名称获取子节点
pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    let children = parent.children.borrow();
    let matching_children = children.iter().find(|child| match child.data {
        NodeData::Element { ref name, .. } => &*name.local == node_name,
        _ => false,
    });
    matching_children.cloned()
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 设置节点属性；不存在时新增
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: &str) {
    if let NodeData::Element { ref attrs, .. } = node.data {
        let attrs_mut = &mut attrs.borrow_mut();

        match attrs_mut
            .iter_mut()
            .find(|attr| &*attr.name.local == attr_name)
        {
            Some(existing_attr) => {
                existing_attr.value.clear();
                existing_attr.value.push_slice(attr_value);
            }
            None => {
                attrs_mut.push(Attribute {
                    name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                    value: format_tendril!("{}", attr_value),
                });
            }
        }
    }
}

/// 递归收集节点及其后代的文本内容
///
/// 锚点的可见文本经常嵌套在内联标记里，单层读取会丢内容。
pub fn get_node_text(node: &Handle) -> String {
    let mut text = String::new();
    collect_node_text(node, &mut text);
    text
}

fn collect_node_text(node: &Handle, output: &mut String) {
    match node.data {
        NodeData::Text { ref contents } => {
            output.push_str(&contents.borrow());
        }
        _ => {
            for child_node in node.children.borrow().iter() {
                collect_node_text(child_node, output);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> RcDom {
        html_to_dom(html.as_bytes(), "utf-8".to_string()).unwrap()
    }

    #[test]
    fn test_find_nodes_document_order() {
        let dom = parse(
            "<body><a href=\"first\">1</a><div><a href=\"second\">2</a></div><a href=\"third\">3</a></body>",
        );
        let anchors = find_nodes(&dom.document, "a");

        assert_eq!(anchors.len(), 3);
        assert_eq!(get_node_attr(&anchors[0], "href"), Some("first".to_string()));
        assert_eq!(get_node_attr(&anchors[1], "href"), Some("second".to_string()));
        assert_eq!(get_node_attr(&anchors[2], "href"), Some("third".to_string()));
    }

    #[test]
    fn test_get_and_set_node_attr() {
        let dom = parse("<a href=\"http://example.com\">link</a>");
        let anchor = &find_nodes(&dom.document, "a")[0];

        assert_eq!(
            get_node_attr(anchor, "href"),
            Some("http://example.com".to_string())
        );
        assert_eq!(get_node_attr(anchor, "title"), None);

        set_node_attr(anchor, "href", "https://other.example");
        assert_eq!(
            get_node_attr(anchor, "href"),
            Some("https://other.example".to_string())
        );

        set_node_attr(anchor, "title", "added");
        assert_eq!(get_node_attr(anchor, "title"), Some("added".to_string()));
    }

    #[test]
    fn test_get_node_text_nested_markup() {
        let dom = parse("<a href=\"x\">some <strong>important</strong> link</a>");
        let anchor = &find_nodes(&dom.document, "a")[0];

        assert_eq!(get_node_text(anchor), "some important link");
    }

    #[test]
    fn test_get_child_node_by_name() {
        let dom = parse("<html><head></head><body></body></html>");
        let html = get_child_node_by_name(&dom.document, "html").unwrap();

        assert!(get_child_node_by_name(&html, "body").is_some());
        assert!(get_child_node_by_name(&html, "table").is_none());
        assert_eq!(get_node_name(&html), Some("html"));
    }

    #[test]
    fn test_html_to_dom_falls_back_on_unknown_encoding() {
        let dom = html_to_dom(b"<body>hello</body>", "no-such-charset".to_string()).unwrap();
        assert_eq!(find_nodes(&dom.document, "body").len(), 1);
    }
}
