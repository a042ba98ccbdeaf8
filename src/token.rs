use logos::{Lexer, Logos};

/// Markup-level tokens of an HTML document.
///
/// Design: only what tag extraction needs. Start tags are matched whole,
/// quoted attribute values included, so a `>` inside a value does not end
/// the tag. Anything that is not markup collapses into `Text` or a stray `Lt`,
/// which makes the lexer total over arbitrary input.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlToken {
    #[regex(r#"<[a-zA-Z][a-zA-Z0-9:-]*([^>"']|"[^"]*"|'[^']*')*>"#)]
    StartTag,

    #[regex(r"</[a-zA-Z][a-zA-Z0-9:-]*[^>]*>")]
    EndTag,

    #[token("<!--", comment)]
    Comment,

    #[regex(r"[^<]+")]
    Text,

    #[token("<")]
    Lt,
}

/// A comment runs to the first `-->`, or to the end of input when unclosed.
fn comment(lex: &mut Lexer<HtmlToken>) {
    let len = match lex.remainder().find("-->") {
        Some(i) => i + "-->".len(),
        None => lex.remainder().len(),
    };
    lex.bump(len);
}

/// Tokens inside a start tag, after the tag name.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\x0C]+")]
pub enum AttrToken {
    #[token("=")]
    Eq,

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    #[regex(r"'[^']*'", |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    Quoted(String),

    // ── Attribute names and unquoted values ────────────────────────────
    #[regex(r#"[^ \t\r\n\x0C>="']+"#, |lex| Some(lex.slice().to_string()))]
    Word(String),
}
