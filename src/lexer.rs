use std::ops::Range;

use logos::Logos;

use crate::token::{AttrToken, HtmlToken};

/// Elements whose content is raw text; markup inside them is not tokenized.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Raw value with quotes removed; empty for bare attributes.
    pub value: String,
}

/// A start or end tag and where it sits in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lowercased tag name.
    pub name: String,
    pub closing: bool,
    pub attributes: Vec<Attribute>,
    /// Byte range of the whole tag, `<` through `>`.
    pub span: Range<usize>,
}

impl Tag {
    /// First attribute with the given (lowercase) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn is_start(&self, name: &str) -> bool {
        !self.closing && self.name == name
    }

    pub fn is_end(&self, name: &str) -> bool {
        self.closing && self.name == name
    }
}

/// Tokenize an HTML document into its tags, in document order.
///
/// Comments produce nothing. The contents of `<script>` and `<style>` are
/// skipped up to their end tag, which is still reported. Never fails.
pub fn tokenize(html: &str) -> Vec<Tag> {
    let mut tags = Vec::new();
    let mut lexer = HtmlToken::lexer(html);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(HtmlToken::StartTag) => {
                let tag = parse_start_tag(lexer.slice(), span);
                if RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) {
                    let skip = raw_text_len(lexer.remainder(), &tag.name);
                    lexer.bump(skip);
                }
                tags.push(tag);
            }
            Ok(HtmlToken::EndTag) => {
                tags.push(Tag {
                    name: tag_name(&lexer.slice()[2..]),
                    closing: true,
                    attributes: Vec::new(),
                    span,
                });
            }
            Ok(HtmlToken::Comment | HtmlToken::Text | HtmlToken::Lt) | Err(()) => {}
        }
    }

    tags
}

fn tag_name(s: &str) -> String {
    s.chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == ':')
        .collect::<String>()
        .to_ascii_lowercase()
}

fn parse_start_tag(text: &str, span: Range<usize>) -> Tag {
    let name = tag_name(&text[1..]);
    // `<` + name ... `>`; the name is ASCII so byte offsets are safe.
    let inner = &text[1 + name.len()..text.len() - 1];
    Tag {
        name,
        closing: false,
        attributes: parse_attributes(inner),
        span,
    }
}

/// Parse the attribute list of a start tag.
pub fn parse_attributes(src: &str) -> Vec<Attribute> {
    let mut attributes = Vec::new();
    let mut pending: Option<String> = None;
    let mut expecting_value = false;

    let mut push = |name: String, value: String| {
        attributes.push(Attribute {
            name: name.to_ascii_lowercase(),
            value,
        });
    };

    for token in AttrToken::lexer(src) {
        match token {
            Ok(AttrToken::Eq) => {
                expecting_value = pending.is_some();
            }
            Ok(AttrToken::Word(value) | AttrToken::Quoted(value)) if expecting_value => {
                if let Some(name) = pending.take() {
                    push(name, value);
                }
                expecting_value = false;
            }
            Ok(AttrToken::Word(word)) => {
                if let Some(name) = pending.take() {
                    push(name, String::new());
                }
                // Self-closing slash: `<link ... />`
                if !word.chars().all(|c| c == '/') {
                    pending = Some(word);
                }
            }
            Ok(AttrToken::Quoted(_)) | Err(()) => {}
        }
    }

    if let Some(name) = pending {
        push(name, String::new());
    }
    attributes
}

/// Length of raw text before the end tag `</name`, or the whole rest when
/// the element is never closed.
fn raw_text_len(rest: &str, name: &str) -> usize {
    let bytes = rest.as_bytes();
    let needle_len = name.len() + 2;
    let mut i = 0;
    while i + needle_len <= bytes.len() {
        if bytes[i] == b'<'
            && bytes[i + 1] == b'/'
            && bytes[i + 2..i + needle_len].eq_ignore_ascii_case(name.as_bytes())
        {
            let boundary = bytes
                .get(i + needle_len)
                .map_or(true, |b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/');
            if boundary {
                return i;
            }
        }
        i += 1;
    }
    rest.len()
}
