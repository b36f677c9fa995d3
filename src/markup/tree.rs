//! Minimal markup tree parser
//!
//! Builds an element/text tree from SSML-style input. Only well-formedness
//! is checked here: tags must nest and close, attributes must be quoted and
//! entities must be known. What each element means is decided by the
//! segment parser.

use crate::{Result, VoxlineError};

/// One node of the markup tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Element(Element),
}

/// A markup element with its attributes and children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    /// Byte offset of the opening `<` in the source
    pub offset: usize,
}

impl Element {
    /// Value of the attribute `name`, if present
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of all descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(&e.children, out),
        }
    }
}

/// Parse markup into its top-level node sequence
pub fn parse_tree(input: &str) -> Result<Vec<Node>> {
    let mut cursor = Cursor { src: input, pos: 0 };
    let mut root: Vec<Node> = Vec::new();
    let mut open: Vec<Element> = Vec::new();

    while !cursor.at_end() {
        let text_start = cursor.pos;
        let text_end = cursor.rest().find('<').map_or(input.len(), |i| text_start + i);
        if text_end > text_start {
            let text = decode_entities(&input[text_start..text_end], text_start)?;
            push_node(&mut root, &mut open, Node::Text(text));
            cursor.pos = text_end;
            continue;
        }

        let tag_start = cursor.pos;
        if cursor.starts_with("<!--") {
            cursor.skip_past("-->", tag_start, "unterminated comment")?;
        } else if cursor.starts_with("<![CDATA[") {
            cursor.pos += "<![CDATA[".len();
            let body_start = cursor.pos;
            cursor.skip_past("]]>", tag_start, "unterminated CDATA section")?;
            let body = &input[body_start..cursor.pos - "]]>".len()];
            push_node(&mut root, &mut open, Node::Text(body.to_string()));
        } else if cursor.starts_with("<?") {
            cursor.skip_past("?>", tag_start, "unterminated processing instruction")?;
        } else if cursor.starts_with("<!") {
            cursor.skip_past(">", tag_start, "unterminated declaration")?;
        } else if cursor.starts_with("</") {
            cursor.pos += 2;
            let name = cursor.take_name();
            cursor.skip_whitespace();
            if !cursor.eat('>') {
                return Err(VoxlineError::parse(tag_start, "malformed end tag"));
            }
            let element = open.pop().ok_or_else(|| {
                VoxlineError::parse(tag_start, format!("unexpected end tag </{}>", name))
            })?;
            if element.name != name {
                return Err(VoxlineError::parse(
                    tag_start,
                    format!("end tag </{}> does not match <{}>", name, element.name),
                ));
            }
            push_node(&mut root, &mut open, Node::Element(element));
        } else {
            let (element, self_closing) = parse_start_tag(&mut cursor)?;
            if self_closing {
                push_node(&mut root, &mut open, Node::Element(element));
            } else {
                open.push(element);
            }
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(VoxlineError::parse(
            unclosed.offset,
            format!("element <{}> is never closed", unclosed.name),
        ));
    }

    Ok(root)
}

fn push_node(root: &mut Vec<Node>, open: &mut [Element], node: Node) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.push(node),
    }
}

/// Parse `<name attr="v" ...>` or `<name .../>` starting at `<`
fn parse_start_tag(cursor: &mut Cursor<'_>) -> Result<(Element, bool)> {
    let offset = cursor.pos;
    cursor.pos += 1;

    let name = cursor.take_name();
    if name.is_empty() {
        return Err(VoxlineError::parse(offset, "missing element name"));
    }

    let mut attributes = Vec::new();
    loop {
        cursor.skip_whitespace();
        if cursor.starts_with("/>") {
            cursor.pos += 2;
            return Ok((element(name, attributes, offset), true));
        }
        if cursor.eat('>') {
            return Ok((element(name, attributes, offset), false));
        }
        if cursor.at_end() {
            return Err(VoxlineError::parse(offset, format!("unterminated tag <{}", name)));
        }

        let attr_offset = cursor.pos;
        let key = cursor.take_name();
        if key.is_empty() {
            return Err(VoxlineError::parse(attr_offset, "malformed attribute"));
        }
        cursor.skip_whitespace();
        if !cursor.eat('=') {
            return Err(VoxlineError::parse(
                attr_offset,
                format!("attribute {} has no value", key),
            ));
        }
        cursor.skip_whitespace();
        let quote = match cursor.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => {
                return Err(VoxlineError::parse(
                    attr_offset,
                    format!("attribute {} value must be quoted", key),
                ))
            }
        };
        cursor.pos += 1;
        let value_start = cursor.pos;
        let value_len = cursor.rest().find(quote).ok_or_else(|| {
            VoxlineError::parse(attr_offset, format!("unterminated value for {}", key))
        })?;
        let raw = &cursor.src[value_start..value_start + value_len];
        cursor.pos = value_start + value_len + 1;
        attributes.push((key, decode_entities(raw, value_start)?));
    }
}

fn element(name: String, attributes: Vec<(String, String)>, offset: usize) -> Element {
    Element {
        name,
        attributes,
        children: Vec::new(),
        offset,
    }
}

/// Replace predefined and numeric character references
fn decode_entities(raw: &str, offset: usize) -> Result<String> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    let mut consumed = 0;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let at = offset + consumed + amp;
        let semi = rest[amp..]
            .find(';')
            .ok_or_else(|| VoxlineError::parse(at, "unterminated entity"))?;
        let name = &rest[amp + 1..amp + semi];

        let decoded = match name {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => {
                if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
                } else if let Some(dec) = name.strip_prefix('#') {
                    dec.parse().ok().and_then(char::from_u32)
                } else {
                    None
                }
            }
        };

        let ch = decoded.ok_or_else(|| VoxlineError::parse(at, format!("unknown entity &{};", name)))?;
        out.push(ch);

        consumed += amp + semi + 1;
        rest = &rest[amp + semi + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += ch.len_utf8();
        }
    }

    /// Consume an element or attribute name
    fn take_name(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self
            .peek()
            .filter(|c| c.is_alphanumeric() || matches!(*c, '-' | '_' | ':' | '.'))
        {
            self.pos += ch.len_utf8();
        }
        self.src[start..self.pos].to_string()
    }

    /// Move past the next occurrence of `terminator`
    fn skip_past(&mut self, terminator: &str, start: usize, message: &str) -> Result<()> {
        let idx = self
            .rest()
            .find(terminator)
            .ok_or_else(|| VoxlineError::parse(start, message))?;
        self.pos += idx + terminator.len();
        Ok(())
    }
}
