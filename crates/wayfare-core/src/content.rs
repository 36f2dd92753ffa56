use crate::image::ImageOptimizer;
use serde::{Deserialize, Serialize};

/// A piece of blog body: either an HTML fragment or a standalone image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { html: String },
    Image { src: String, alt: String },
}

impl ContentBlock {
    pub fn is_image(&self) -> bool {
        matches!(self, ContentBlock::Image { .. })
    }
}

/// Splits blog HTML around its `<img>` tags.
///
/// Image sources go through the gallery policy. Tags without a `src` are
/// dropped, and an unterminated `<img` is kept as text.
pub fn split_content(html: &str, optimizer: &ImageOptimizer) -> Vec<ContentBlock> {
    let lower = html.to_ascii_lowercase();
    let bytes = html.as_bytes();
    let mut blocks = Vec::new();
    let mut pending = String::new();
    let mut cursor = 0;
    let mut search = 0;

    while let Some(found) = lower[search..].find("<img") {
        let start = search + found;
        let after = start + "<img".len();
        if after < bytes.len() && !is_tag_name_end(bytes[after]) {
            search = after;
            continue;
        }
        let Some(end) = find_tag_end(bytes, after) else {
            break;
        };

        pending.push_str(&html[cursor..start]);
        let inner = html[after..end].trim_end().trim_end_matches('/');
        if let Some(image) = image_block(inner, optimizer) {
            flush_text(&mut blocks, &mut pending);
            blocks.push(image);
        }
        cursor = end + 1;
        search = cursor;
    }

    pending.push_str(&html[cursor..]);
    flush_text(&mut blocks, &mut pending);
    blocks
}

fn is_tag_name_end(byte: u8) -> bool {
    byte.is_ascii_whitespace() || matches!(byte, b'/' | b'>')
}

fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (offset, &byte) in bytes[from..].iter().enumerate() {
        match quote {
            Some(open) if byte == open => quote = None,
            Some(_) => {}
            None if byte == b'"' || byte == b'\'' => quote = Some(byte),
            None if byte == b'>' => return Some(from + offset),
            None => {}
        }
    }
    None
}

fn flush_text(blocks: &mut Vec<ContentBlock>, pending: &mut String) {
    let trimmed = pending.trim();
    if !trimmed.is_empty() {
        blocks.push(ContentBlock::Text {
            html: trimmed.to_string(),
        });
    }
    pending.clear();
}

fn image_block(attributes: &str, optimizer: &ImageOptimizer) -> Option<ContentBlock> {
    let mut src = None;
    let mut alt = String::new();
    for (name, value) in parse_attributes(attributes) {
        match name.as_str() {
            "src" => src = Some(decode_entities(value.trim())),
            "alt" => alt = decode_entities(&value),
            _ => {}
        }
    }

    let src = src.filter(|src| !src.is_empty())?;
    Some(ContentBlock::Image {
        src: optimizer.gallery(&src, None),
        alt,
    })
}

fn parse_attributes(input: &str) -> Vec<(String, String)> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut attrs = Vec::new();
    let mut pos = 0;

    loop {
        while pos < len && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b'/') {
            pos += 1;
        }
        let name_start = pos;
        while pos < len && !bytes[pos].is_ascii_whitespace() && !matches!(bytes[pos], b'=' | b'/')
        {
            pos += 1;
        }
        if name_start == pos {
            break;
        }
        let name = input[name_start..pos].to_ascii_lowercase();

        while pos < len && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let mut value = "";
        if pos < len && bytes[pos] == b'=' {
            pos += 1;
            while pos < len && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos < len && (bytes[pos] == b'"' || bytes[pos] == b'\'') {
                let quote = bytes[pos];
                pos += 1;
                let value_start = pos;
                while pos < len && bytes[pos] != quote {
                    pos += 1;
                }
                value = &input[value_start..pos];
                pos = (pos + 1).min(len);
            } else {
                let value_start = pos;
                while pos < len && !bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                value = &input[value_start..pos];
            }
        }
        attrs.push((name, value.to_string()));
    }

    attrs
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
