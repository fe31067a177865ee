//! Markdown to storage tree.
//!
//! Parses markdown with pulldown-cmark and builds the editor's node tree on a
//! frame stack: every `Start` event pushes a frame, every `End` pops one and
//! attaches the finished node to the enclosing container. Constructs whose
//! editor feature is disabled degrade to paragraphs or plain text.

use folio_core::EditorProfile;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use serde_json::{Value, json};

use super::nodes::{
    self, FORMAT_BOLD, FORMAT_CODE, FORMAT_ITALIC, FORMAT_STRIKETHROUGH, element, linebreak,
    text_node,
};

/// Convert markdown to a storage tree under the given editor profile.
pub fn to_storage_format(markdown: &str, profile: &EditorProfile) -> Value {
    let mut options = Options::empty();
    if profile.strikethrough {
        options.insert(Options::ENABLE_STRIKETHROUGH);
    }

    let mut builder = TreeBuilder::new(profile);
    for event in Parser::new_ext(markdown, options) {
        builder.event(event);
    }
    nodes::root(builder.finish())
}

enum Frame {
    Root(Vec<Value>),
    Paragraph(Vec<Value>),
    Heading(u8, Vec<Value>),
    Quote(Vec<Value>),
    List {
        ordered: bool,
        start: u64,
        items: Vec<Value>,
    },
    Item(Vec<Value>),
    CodeBlock {
        language: Option<String>,
        text: String,
    },
    Link(String, Vec<Value>),
    Image(String, Vec<Value>),
    /// Inline formatting bit applied to nested text.
    Mark(u32),
    /// Anything else (tables, footnotes, html): contents flow to the parent.
    Transparent,
}

struct TreeBuilder<'a> {
    profile: &'a EditorProfile,
    stack: Vec<Frame>,
}

impl<'a> TreeBuilder<'a> {
    fn new(profile: &'a EditorProfile) -> Self {
        Self {
            profile,
            stack: vec![Frame::Root(Vec::new())],
        }
    }

    fn finish(mut self) -> Vec<Value> {
        // Unbalanced input cannot come out of the parser, but close whatever is open.
        while self.stack.len() > 1 {
            self.end();
        }
        match self.stack.pop() {
            Some(Frame::Root(children)) => children,
            _ => Vec::new(),
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let format = if self.profile.code {
                    self.format() | FORMAT_CODE
                } else {
                    self.format()
                };
                self.push_inline(text_node(&code, format));
            }
            Event::SoftBreak | Event::HardBreak => self.push_inline(linebreak()),
            Event::Rule => {
                if self.profile.horizontal_rule {
                    self.push_block(json!({ "type": "horizontalrule", "version": 1 }));
                }
            }
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph(Vec::new()),
            Tag::Heading { level, .. } => Frame::Heading(heading_level(level), Vec::new()),
            Tag::BlockQuote(_) => Frame::Quote(Vec::new()),
            Tag::CodeBlock(kind) => Frame::CodeBlock {
                language: match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                },
                text: String::new(),
            },
            Tag::List(start) => Frame::List {
                ordered: start.is_some(),
                start: start.unwrap_or(1),
                items: Vec::new(),
            },
            Tag::Item => Frame::Item(Vec::new()),
            Tag::Emphasis => Frame::Mark(FORMAT_ITALIC),
            Tag::Strong => Frame::Mark(FORMAT_BOLD),
            Tag::Strikethrough => Frame::Mark(FORMAT_STRIKETHROUGH),
            Tag::Link { dest_url, .. } => Frame::Link(dest_url.to_string(), Vec::new()),
            Tag::Image { dest_url, .. } => Frame::Image(dest_url.to_string(), Vec::new()),
            _ => Frame::Transparent,
        };
        self.stack.push(frame);
    }

    fn end(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Root(children) => self.stack.push(Frame::Root(children)),
            Frame::Paragraph(children) => self.push_block(element("paragraph", children)),
            Frame::Heading(level, children) => {
                if self.profile.heading_enabled(level) {
                    let mut node = element("heading", children);
                    node["tag"] = json!(format!("h{}", level));
                    self.push_block(node);
                } else {
                    self.push_block(element("paragraph", children));
                }
            }
            Frame::Quote(children) => {
                if self.profile.quote {
                    self.push_block(element("quote", children));
                } else {
                    self.push_paragraphs(children);
                }
            }
            Frame::CodeBlock { language, text } => {
                let text = text.strip_suffix('\n').unwrap_or(&text);
                let mut children = Vec::new();
                for (i, line) in text.split('\n').enumerate() {
                    if i > 0 {
                        children.push(linebreak());
                    }
                    if !line.is_empty() {
                        children.push(text_node(line, 0));
                    }
                }
                if self.profile.code {
                    let mut node = element("code", children);
                    node["language"] = json!(language);
                    self.push_block(node);
                } else {
                    self.push_block(element("paragraph", children));
                }
            }
            Frame::List {
                ordered,
                start,
                items,
            } => self.finish_list(ordered, start, items),
            Frame::Item(children) => {
                let value = match self.stack.last() {
                    Some(Frame::List { start, items, .. }) => *start + items.len() as u64,
                    _ => 1,
                };
                let mut node = element("listitem", children);
                node["value"] = json!(value);
                if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                    items.push(node);
                }
            }
            Frame::Link(url, children) => {
                if self.profile.links {
                    self.push_inline(nodes::link(&url, children));
                } else {
                    for child in children {
                        self.push_inline(child);
                    }
                }
            }
            Frame::Image(url, alt) => {
                let alt = if alt.is_empty() {
                    vec![text_node(&url, 0)]
                } else {
                    alt
                };
                if self.profile.links {
                    self.push_inline(nodes::link(&url, alt));
                } else {
                    for child in alt {
                        self.push_inline(child);
                    }
                }
            }
            Frame::Mark(_) | Frame::Transparent => {}
        }
    }

    fn finish_list(&mut self, ordered: bool, start: u64, items: Vec<Value>) {
        if self.profile.lists {
            let mut node = element("list", items);
            node["listType"] = json!(if ordered { "number" } else { "bullet" });
            node["tag"] = json!(if ordered { "ol" } else { "ul" });
            node["start"] = json!(start);
            self.push_block(node);
            return;
        }

        // Lists disabled: one paragraph per item with a plain-text marker.
        for (i, item) in items.into_iter().enumerate() {
            let marker = if ordered {
                format!("{}. ", start + i as u64)
            } else {
                "- ".to_string()
            };
            let mut children = vec![text_node(&marker, 0)];
            if let Some(Value::Array(item_children)) = item.get("children") {
                children.extend(item_children.iter().cloned());
            }
            self.push_paragraphs(children);
        }
    }

    /// Push inline runs as paragraphs and embedded code blocks as blocks.
    fn push_paragraphs(&mut self, children: Vec<Value>) {
        let mut run = Vec::new();
        for child in children {
            if child["type"] == "code" {
                if !run.is_empty() {
                    self.push_block(element("paragraph", std::mem::take(&mut run)));
                }
                self.push_block(child);
            } else {
                run.push(child);
            }
        }
        if !run.is_empty() {
            self.push_block(element("paragraph", run));
        }
    }

    fn format(&self) -> u32 {
        self.stack
            .iter()
            .filter_map(|f| match f {
                Frame::Mark(bit) => Some(*bit),
                _ => None,
            })
            .fold(0, |acc, bit| acc | bit)
    }

    fn text(&mut self, text: &str) {
        if let Some(Frame::CodeBlock { text: buffer, .. }) = self.stack.last_mut() {
            buffer.push_str(text);
            return;
        }
        let node = text_node(text, self.format());
        self.push_inline(node);
    }

    /// Attach an inline node to the innermost container.
    fn push_inline(&mut self, node: Value) {
        for frame in self.stack.iter_mut().rev() {
            match frame {
                Frame::Mark(_) | Frame::Transparent => continue,
                Frame::Paragraph(c)
                | Frame::Heading(_, c)
                | Frame::Quote(c)
                | Frame::Item(c)
                | Frame::Link(_, c)
                | Frame::Image(_, c) => {
                    append_inline(c, node);
                    return;
                }
                Frame::CodeBlock { text, .. } => {
                    if let Some(t) = node.get("text").and_then(Value::as_str) {
                        text.push_str(t);
                    }
                    return;
                }
                Frame::Root(children) => {
                    // Inline content at the top level gets its own paragraph.
                    children.push(element("paragraph", vec![node]));
                    return;
                }
                Frame::List { .. } => return,
            }
        }
    }

    /// Attach a finished block node to the innermost container.
    ///
    /// Quotes and list items hold inline content, so paragraphs inside them
    /// are unwrapped and separated by line breaks. Code blocks stay whole and
    /// nested lists stay nested inside their item.
    fn push_block(&mut self, node: Value) {
        for frame in self.stack.iter_mut().rev() {
            match frame {
                Frame::Mark(_) | Frame::Transparent => continue,
                Frame::Root(children) => {
                    children.push(node);
                    return;
                }
                Frame::Item(children) if node["type"] == "list" => {
                    children.push(node);
                    return;
                }
                // Code blocks keep their language inside quotes and items.
                Frame::Quote(children) | Frame::Item(children) if node["type"] == "code" => {
                    children.push(node);
                    return;
                }
                Frame::Quote(children) | Frame::Item(children) => {
                    let after_code = children.last().map(|c| c["type"] == "code").unwrap_or(false);
                    if !children.is_empty() && !after_code {
                        children.push(linebreak());
                    }
                    match node.get("children") {
                        Some(Value::Array(inline)) => children.extend(inline.iter().cloned()),
                        // Rules have no inline content to keep.
                        _ => {
                            if children.last().map(|c| c["type"] == "linebreak").unwrap_or(false) {
                                children.pop();
                            }
                        }
                    }
                    return;
                }
                _ => continue,
            }
        }
    }
}

/// Push an inline node, merging it into a preceding text run of the same format.
fn append_inline(children: &mut Vec<Value>, node: Value) {
    if node["type"] == "text" {
        if let Some(last) = children.last_mut() {
            if last["type"] == "text" && last["format"] == node["format"] {
                let merged = format!(
                    "{}{}",
                    last["text"].as_str().unwrap_or(""),
                    node["text"].as_str().unwrap_or("")
                );
                last["text"] = Value::String(merged);
                return;
            }
        }
    }
    children.push(node);
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn children(tree: &Value) -> &Vec<Value> {
        tree["root"]["children"].as_array().unwrap()
    }

    #[test]
    fn test_paragraph_with_marks() {
        let tree = to_storage_format("Hello **bold** and *it* and `code`", &EditorProfile::default());
        let para = &children(&tree)[0];
        assert_eq!(para["type"], "paragraph");
        let inline = para["children"].as_array().unwrap();
        assert_eq!(inline[0]["text"], "Hello ");
        assert_eq!(inline[1]["text"], "bold");
        assert_eq!(inline[1]["format"], FORMAT_BOLD);
        assert_eq!(inline[3]["format"], FORMAT_ITALIC);
        assert_eq!(inline[5]["format"], FORMAT_CODE);
    }

    #[test]
    fn test_nested_marks_combine() {
        let tree = to_storage_format("***both***", &EditorProfile::default());
        let text = &children(&tree)[0]["children"][0];
        assert_eq!(text["format"], FORMAT_BOLD | FORMAT_ITALIC);
    }

    #[test]
    fn test_heading_and_list() {
        let tree = to_storage_format("## Title\n\n- one\n- two\n", &EditorProfile::default());
        let blocks = children(&tree);
        assert_eq!(blocks[0]["type"], "heading");
        assert_eq!(blocks[0]["tag"], "h2");
        assert_eq!(blocks[1]["type"], "list");
        assert_eq!(blocks[1]["listType"], "bullet");
        let items = blocks[1]["children"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["value"], 2);
        assert_eq!(items[1]["children"][0]["text"], "two");
    }

    #[test]
    fn test_nested_list_stays_in_item() {
        let tree = to_storage_format("1. a\n   - b\n2. c\n", &EditorProfile::default());
        let list = &children(&tree)[0];
        assert_eq!(list["listType"], "number");
        let first = &list["children"][0];
        assert_eq!(first["children"][0]["text"], "a");
        assert_eq!(first["children"][1]["type"], "list");
    }

    #[test]
    fn test_link_and_code_block() {
        let tree = to_storage_format(
            "[site](https://example.com)\n\n```rust\nfn main() {}\n```\n",
            &EditorProfile::default(),
        );
        let blocks = children(&tree);
        let link = &blocks[0]["children"][0];
        assert_eq!(link["type"], "link");
        assert_eq!(link["fields"]["url"], "https://example.com");
        assert_eq!(blocks[1]["type"], "code");
        assert_eq!(blocks[1]["language"], "rust");
        assert_eq!(blocks[1]["children"][0]["text"], "fn main() {}");
    }

    #[test]
    fn test_quote_holds_inline_children() {
        let tree = to_storage_format("> first\n>\n> second\n", &EditorProfile::default());
        let quote = &children(&tree)[0];
        assert_eq!(quote["type"], "quote");
        let inline = quote["children"].as_array().unwrap();
        assert_eq!(inline[0]["text"], "first");
        assert_eq!(inline[1]["type"], "linebreak");
        assert_eq!(inline[2]["text"], "second");
    }

    #[test]
    fn test_code_in_quote_and_item_keeps_language() {
        let tree = to_storage_format(
            "> run\n> ```sh\n> make\n> ```\n> done\n\n- step\n\n  ```rust\n  fn main() {}\n  ```\n",
            &EditorProfile::default(),
        );
        let blocks = children(&tree);
        let quote = blocks[0]["children"].as_array().unwrap();
        assert_eq!(quote[0]["text"], "run");
        assert_eq!(quote[1]["type"], "code");
        assert_eq!(quote[1]["language"], "sh");
        assert_eq!(quote[2]["text"], "done");

        let item = blocks[1]["children"][0]["children"].as_array().unwrap();
        assert_eq!(item[0]["text"], "step");
        assert_eq!(item[1]["type"], "code");
        assert_eq!(item[1]["language"], "rust");
    }

    #[test]
    fn test_disabled_quote_keeps_code_block() {
        let profile = EditorProfile {
            quote: false,
            ..EditorProfile::default()
        };
        let tree = to_storage_format("> run\n> ```sh\n> make\n> ```\n", &profile);
        let blocks = children(&tree);
        assert_eq!(blocks[0]["type"], "paragraph");
        assert_eq!(blocks[1]["type"], "code");
        assert_eq!(blocks[1]["language"], "sh");
    }

    #[test]
    fn test_disabled_features_degrade() {
        let profile = EditorProfile {
            headings: vec![1],
            ..EditorProfile::minimal()
        };
        let tree = to_storage_format(
            "# Kept\n\n### Dropped\n\n- item\n\n> quoted\n\n[x](http://y)\n\n---\n\n~~gone~~",
            &profile,
        );
        let blocks = children(&tree);
        assert_eq!(blocks[0]["type"], "heading");
        assert_eq!(blocks[1]["type"], "paragraph");
        assert_eq!(blocks[2]["type"], "paragraph");
        assert_eq!(blocks[2]["children"][0]["text"], "- ");
        assert_eq!(blocks[3]["type"], "paragraph");
        assert_eq!(blocks[4]["children"][0]["type"], "text");
        // The rule is dropped and strikethrough is left as literal text.
        assert_eq!(blocks.len(), 6);
        assert_eq!(blocks[5]["children"][0]["format"], 0);
    }

    #[test]
    fn test_image_degrades_to_link() {
        let tree = to_storage_format("![logo](/media/logo.png)", &EditorProfile::default());
        let link = &children(&tree)[0]["children"][0];
        assert_eq!(link["type"], "link");
        assert_eq!(link["children"][0]["text"], "logo");
    }

    #[test]
    fn test_empty_markdown() {
        let tree = to_storage_format("", &EditorProfile::default());
        assert!(children(&tree).is_empty());
        assert_eq!(tree["root"]["type"], "root");
    }
}
