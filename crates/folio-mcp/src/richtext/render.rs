//! Storage tree to markdown.

use serde_json::Value;

use super::ConversionError;
use super::nodes::{FORMAT_BOLD, FORMAT_CODE, FORMAT_ITALIC, FORMAT_STRIKETHROUGH};

/// Nesting limit for a single tree; deeper trees are rejected.
const MAX_NODE_DEPTH: usize = 64;

/// Convert a storage tree back to markdown.
///
/// Unknown node types degrade: containers render their children, leaves
/// render their `text` if they have one.
pub fn to_wire_format(tree: &Value) -> Result<String, ConversionError> {
    let root = tree
        .get("root")
        .ok_or_else(|| ConversionError::Malformed("missing root node".into()))?;
    let children = children_of(root)?;
    let blocks = render_blocks(children, 0)?;
    Ok(blocks.join("\n\n"))
}

fn children_of(node: &Value) -> Result<&[Value], ConversionError> {
    match node.get("children") {
        Some(Value::Array(children)) => Ok(children),
        None => Ok(&[]),
        Some(_) => Err(ConversionError::Malformed(
            "node children must be an array".into(),
        )),
    }
}

fn node_type(node: &Value) -> &str {
    node.get("type").and_then(Value::as_str).unwrap_or("")
}

fn check_depth(depth: usize) -> Result<(), ConversionError> {
    if depth > MAX_NODE_DEPTH {
        return Err(ConversionError::TooDeep(MAX_NODE_DEPTH));
    }
    Ok(())
}

fn render_blocks(children: &[Value], depth: usize) -> Result<Vec<String>, ConversionError> {
    check_depth(depth)?;
    let mut blocks = Vec::with_capacity(children.len());
    for node in children {
        let block = render_block(node, depth + 1)?;
        if !block.is_empty() || node_type(node) == "paragraph" {
            blocks.push(block);
        }
    }
    Ok(blocks)
}

fn render_block(node: &Value, depth: usize) -> Result<String, ConversionError> {
    match node_type(node) {
        "paragraph" => Ok(escape_line_starts(&render_inline(children_of(node)?, depth)?)),
        "heading" => {
            let level = node
                .get("tag")
                .and_then(Value::as_str)
                .and_then(|t| t.strip_prefix('h'))
                .and_then(|l| l.parse::<usize>().ok())
                .unwrap_or(1)
                .clamp(1, 6);
            let text = render_inline(children_of(node)?, depth)?;
            Ok(format!("{} {}", "#".repeat(level), text))
        }
        "quote" => {
            let text = render_segments(children_of(node)?, depth)?;
            Ok(text
                .split('\n')
                .map(|line| {
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {}", line)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"))
        }
        "list" => render_list(node, "", depth),
        "code" => render_code(node),
        "horizontalrule" => Ok("---".to_string()),
        _ => {
            // Unknown container: blocks if it holds blocks, inline text otherwise.
            let children = children_of(node)?;
            if children.iter().any(is_block) {
                Ok(render_blocks(children, depth)?.join("\n\n"))
            } else if !children.is_empty() {
                Ok(escape_line_starts(&render_inline(children, depth)?))
            } else {
                Ok(node
                    .get("text")
                    .and_then(Value::as_str)
                    .map(escape)
                    .unwrap_or_default())
            }
        }
    }
}

fn is_block(node: &Value) -> bool {
    matches!(
        node_type(node),
        "paragraph" | "heading" | "quote" | "list" | "code" | "horizontalrule"
    )
}

fn render_list(node: &Value, indent: &str, depth: usize) -> Result<String, ConversionError> {
    check_depth(depth)?;
    let ordered = node.get("listType").and_then(Value::as_str) == Some("number");
    let start = node.get("start").and_then(Value::as_u64).unwrap_or(1);

    let mut lines = Vec::new();
    for (i, item) in children_of(node)?.iter().enumerate() {
        let marker = if ordered {
            format!("{}. ", start + i as u64)
        } else {
            "- ".to_string()
        };
        let continuation = format!("{}{}", indent, " ".repeat(marker.len()));

        let children = children_of(item)?;
        let text = render_segments(children, depth + 1)?;
        lines.push(format!(
            "{}{}{}",
            indent,
            marker,
            text.replace('\n', &format!("\n{}", continuation))
        ));

        for nested in children.iter().filter(|c| node_type(c) == "list") {
            lines.push(render_list(nested, &continuation, depth + 1)?);
        }
    }
    Ok(lines.join("\n"))
}

/// Inline runs and the code blocks between them, one after another on their
/// own lines. Nested lists are left to the caller.
fn render_segments(children: &[Value], depth: usize) -> Result<String, ConversionError> {
    let mut parts = Vec::new();
    let mut run: Vec<Value> = Vec::new();
    for child in children {
        match node_type(child) {
            "list" => {}
            "code" => {
                if !run.is_empty() {
                    parts.push(escape_line_starts(&render_inline(&run, depth)?));
                    run.clear();
                }
                parts.push(render_code(child)?);
            }
            _ => run.push(child.clone()),
        }
    }
    if !run.is_empty() || parts.is_empty() {
        parts.push(escape_line_starts(&render_inline(&run, depth)?));
    }
    Ok(parts.join("\n"))
}

fn render_code(node: &Value) -> Result<String, ConversionError> {
    let mut body = String::new();
    for child in children_of(node)? {
        match node_type(child) {
            "linebreak" => body.push('\n'),
            _ => {
                if let Some(text) = child.get("text").and_then(Value::as_str) {
                    body.push_str(text);
                }
            }
        }
    }
    let language = node.get("language").and_then(Value::as_str).unwrap_or("");
    let fence = "`".repeat(longest_run(&body, '`').max(2) + 1);
    Ok(format!("{fence}{language}\n{body}\n{fence}"))
}

fn render_inline(children: &[Value], depth: usize) -> Result<String, ConversionError> {
    check_depth(depth)?;
    let mut out = String::new();
    for child in children {
        match node_type(child) {
            "text" => {
                let text = child.get("text").and_then(Value::as_str).unwrap_or("");
                let format = child.get("format").and_then(Value::as_u64).unwrap_or(0) as u32;
                out.push_str(&apply_format(text, format));
            }
            "linebreak" => out.push('\n'),
            "tab" => out.push('\t'),
            "link" | "autolink" => {
                let url = child
                    .get("fields")
                    .and_then(|f| f.get("url"))
                    .or_else(|| child.get("url"))
                    .and_then(Value::as_str)
                    .unwrap_or("");
                let label = render_inline(children_of(child)?, depth + 1)?;
                out.push_str(&format!("[{}]({})", label, url));
            }
            _ => {
                let nested = children_of(child)?;
                if nested.is_empty() {
                    if let Some(text) = child.get("text").and_then(Value::as_str) {
                        out.push_str(&escape(text));
                    }
                } else {
                    out.push_str(&render_inline(nested, depth + 1)?);
                }
            }
        }
    }
    Ok(out)
}

/// Wrap text in markdown marks, keeping edge whitespace outside the markers.
fn apply_format(text: &str, format: u32) -> String {
    if text.is_empty() {
        return String::new();
    }
    let core = text.trim();
    if core.is_empty() || format & (FORMAT_BOLD | FORMAT_ITALIC | FORMAT_STRIKETHROUGH | FORMAT_CODE) == 0 {
        return escape(text);
    }
    let leading = &text[..text.len() - text.trim_start().len()];
    let trailing = &text[text.trim_end().len()..];

    let mut marked = if format & FORMAT_CODE != 0 {
        let ticks = "`".repeat(longest_run(core, '`') + 1);
        if core.starts_with('`') || core.ends_with('`') {
            format!("{ticks} {core} {ticks}")
        } else {
            format!("{ticks}{core}{ticks}")
        }
    } else {
        escape(core)
    };
    if format & FORMAT_STRIKETHROUGH != 0 {
        marked = format!("~~{}~~", marked);
    }
    if format & FORMAT_ITALIC != 0 {
        marked = format!("*{}*", marked);
    }
    if format & FORMAT_BOLD != 0 {
        marked = format!("**{}**", marked);
    }
    format!("{}{}{}", leading, marked, trailing)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '~' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape the first character of every line that would otherwise open a
/// heading, quote, list, html block or setext underline.
fn escape_line_starts(text: &str) -> String {
    text.split('\n')
        .map(escape_block_marker)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_block_marker(line: &str) -> String {
    let trimmed = line.trim_start_matches(' ');
    let indent = &line[..line.len() - trimmed.len()];
    let Some(first) = trimmed.chars().next() else {
        return line.to_string();
    };
    let rest = &trimmed[first.len_utf8()..];
    let opens_block = match first {
        '#' => {
            let hashes = trimmed.chars().take_while(|c| *c == '#').count();
            hashes <= 6 && trimmed[hashes..].chars().next().is_none_or(|c| c == ' ' || c == '\t')
        }
        '>' | '<' => true,
        '-' | '+' => {
            rest.is_empty()
                || rest.starts_with([' ', '\t'])
                || trimmed.chars().all(|c| c == first || c == ' ')
        }
        '=' => trimmed.chars().all(|c| c == '=' || c == ' '),
        _ => false,
    };
    if opens_block {
        return format!("{}\\{}", indent, trimmed);
    }

    // Ordered list markers: up to nine digits, then `.` or `)`.
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if (1..=9).contains(&digits) {
        let after = &trimmed[digits..];
        if let Some(punct) = after.chars().next().filter(|c| *c == '.' || *c == ')') {
            let tail = &after[1..];
            if tail.is_empty() || tail.starts_with([' ', '\t']) {
                return format!("{}{}\\{}{}", indent, &trimmed[..digits], punct, tail);
            }
        }
    }
    line.to_string()
}

fn longest_run(text: &str, needle: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == needle {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
