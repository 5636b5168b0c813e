//! Token model.
//!
//! Every payload is a byte span into the caller's buffer; the tokenizer never
//! stores token text. Tag and attribute names are left in source casing, so
//! consumers must compare case-insensitively.

use crate::error::ParseError;
use crate::span::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// Text run between tags, trimmed of leading and trailing ASCII
    /// whitespace. Whitespace-only runs are never emitted.
    Text { span: Span },
    /// Start or end tag, emitted in tag-granularity mode.
    Tag(Tag),
    /// Tag name alone, emitted instead of `Tag` in attribute-granularity mode.
    TagName { name: Span },
    /// One attribute, emitted per attribute in attribute-granularity mode.
    Attr(Attr),
    Doctype(Doctype),
    /// Comment, bogus comment, or CDATA section. The span covers the whole
    /// construct including its delimiters.
    Comment { span: Span },
    ParseError(ParseError),
}

/// Attribute presence and the self-closing flag are fused into the tag kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagKind {
    Start,
    StartWithAttrs,
    StartSelfClosing,
    StartWithAttrsSelfClosing,
    End,
}

impl TagKind {
    pub fn is_start(self) -> bool {
        !matches!(self, Self::End)
    }

    pub fn is_self_closing(self) -> bool {
        matches!(self, Self::StartSelfClosing | Self::StartWithAttrsSelfClosing)
    }

    pub fn has_attrs(self) -> bool {
        matches!(self, Self::StartWithAttrs | Self::StartWithAttrsSelfClosing)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag {
    /// Whole tag, from `<` through `>` (or end of input when truncated).
    pub span: Span,
    pub name: Span,
    pub kind: TagKind,
}

// Elements that can never have content. Informational only; membership does
// not influence tokenization.
const VOID_NAMES: [&[u8]; 13] = [
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"source", b"track", b"wbr",
];

impl Tag {
    /// Whether the tag names a void element, matched case-insensitively
    /// against `src`.
    pub fn is_void(&self, src: &[u8]) -> bool {
        let name = self.name.of(src);
        VOID_NAMES.iter().any(|void| name.eq_ignore_ascii_case(void))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attr {
    pub name: Span,
    /// `None` for a bare attribute (`<p hidden>`).
    pub value: Option<AttrValue>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttrValue {
    pub quote: Quote,
    /// Value bytes, excluding the quotes.
    pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quote {
    None,
    Single,
    Double,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Doctype {
    /// Whole declaration, from `<` through `>` (or end of input).
    pub span: Span,
    pub name: Option<Span>,
    /// Public/system identifier region including quotes; empty when the
    /// declaration carries no identifiers.
    pub extra: Span,
    pub force_quirks: bool,
}

impl Token {
    /// The span of the token itself, whatever its variant.
    pub fn span(&self) -> Span {
        match self {
            Token::Text { span } | Token::Comment { span } => *span,
            Token::Tag(tag) => tag.span,
            Token::TagName { name } => *name,
            Token::Attr(attr) => attr.name,
            Token::Doctype(doctype) => doctype.span,
            Token::ParseError(error) => error.span,
        }
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, Token::ParseError(_))
    }
}
