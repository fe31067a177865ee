//! Storage tree node constructors.

use serde_json::{Value, json};

pub const FORMAT_BOLD: u32 = 1;
pub const FORMAT_ITALIC: u32 = 1 << 1;
pub const FORMAT_STRIKETHROUGH: u32 = 1 << 2;
pub const FORMAT_UNDERLINE: u32 = 1 << 3;
pub const FORMAT_CODE: u32 = 1 << 4;

pub fn root(children: Vec<Value>) -> Value {
    json!({
        "root": {
            "type": "root",
            "children": children,
            "direction": "ltr",
            "format": "",
            "indent": 0,
            "version": 1,
        }
    })
}

pub fn element(node_type: &str, children: Vec<Value>) -> Value {
    json!({
        "type": node_type,
        "children": children,
        "direction": "ltr",
        "format": "",
        "indent": 0,
        "version": 1,
    })
}

pub fn text_node(text: &str, format: u32) -> Value {
    json!({
        "type": "text",
        "text": text,
        "format": format,
        "detail": 0,
        "mode": "normal",
        "style": "",
        "version": 1,
    })
}

pub fn linebreak() -> Value {
    json!({ "type": "linebreak", "version": 1 })
}

pub fn link(url: &str, children: Vec<Value>) -> Value {
    let mut node = element("link", children);
    node["fields"] = json!({ "url": url, "newTab": false, "linkType": "custom" });
    node
}
