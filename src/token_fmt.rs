//! Line-oriented token formatting for snapshot-style assertions.
//!
//! Resolves spans against the source and renders one stable line per token,
//! so tests can compare whole token sequences and print readable diffs on
//! mismatch. Not intended as a public pretty-printer.

use crate::token::{AttrValue, Quote, TagKind, Token};

/// Render every token as one line.
pub fn format_tokens(src: &[u8], tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(|token| format_token(src, token)).collect()
}

pub fn format_token(src: &[u8], token: &Token) -> String {
    match token {
        Token::Text { span } => format!("TEXT \"{}\"", escape_text(span.of(src))),
        Token::Tag(tag) => format!(
            "TAG name={} kind={}",
            escape_text(tag.name.of(src)),
            kind_label(tag.kind),
        ),
        Token::TagName { name } => format!("TAG-NAME name={}", escape_text(name.of(src))),
        Token::Attr(attr) => {
            let name = escape_text(attr.name.of(src));
            match &attr.value {
                None => format!("ATTR name={name}"),
                Some(AttrValue { quote, span }) => format!(
                    "ATTR name={name} value=\"{}\" quote={}",
                    escape_text(span.of(src)),
                    quote_label(*quote),
                ),
            }
        }
        Token::Doctype(doctype) => {
            let name = doctype
                .name
                .map_or_else(|| "null".to_string(), |name| escape_text(name.of(src)));
            format!(
                "DOCTYPE name={name} extra=\"{}\" force_quirks={}",
                escape_text(doctype.extra.of(src)),
                doctype.force_quirks,
            )
        }
        Token::Comment { span } => format!("COMMENT \"{}\"", escape_text(span.of(src))),
        Token::ParseError(error) => format!(
            "ERROR code={} span={}..{}",
            error.kind.code(),
            error.span.start,
            error.span.end,
        ),
    }
}

fn kind_label(kind: TagKind) -> &'static str {
    match kind {
        TagKind::Start => "start",
        TagKind::StartWithAttrs => "start_attrs",
        TagKind::StartSelfClosing => "start_self",
        TagKind::StartWithAttrsSelfClosing => "start_attrs_self",
        TagKind::End => "end",
    }
}

fn quote_label(quote: Quote) -> &'static str {
    match quote {
        Quote::None => "none",
        Quote::Single => "single",
        Quote::Double => "double",
    }
}

fn escape_text(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\x{byte:02x}")),
        }
    }
    out
}
