//! Tokenizer state machine definitions.
//!
//! Each variant's payload carries exactly the anchor offsets and partial-token
//! material that state needs, so transitions stay total and the dispatcher's
//! match stays exhaustive. All payloads are `Copy`: handlers take the payload
//! by value, update it, and write the successor state back.

use crate::span::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum State {
    Data,
    Text(TextRun),

    TagOpen { lt: usize },
    EndTagOpen { lt: usize },
    TagName(TagState),
    BeforeAttributeName(TagState),
    AttributeName { tag: TagState, name_start: usize },
    AfterAttributeName { tag: TagState, name: Span },
    BeforeAttributeValue { tag: TagState, name: Span },
    AttributeValueDoubleQuoted { tag: TagState, name: Span, value_start: usize },
    AttributeValueSingleQuoted { tag: TagState, name: Span, value_start: usize },
    AttributeValueUnquoted { tag: TagState, name: Span, value_start: usize },
    AfterAttributeValueQuoted(TagState),
    SelfClosingStartTag(TagState),

    MarkupDeclarationOpen { lt: usize },
    BogusComment { start: usize },
    CommentStart { start: usize },
    CommentStartDash { start: usize },
    Comment { start: usize },
    CommentLessThanSign { start: usize },
    CommentLessThanSignBang { start: usize },
    CommentLessThanSignBangDash { start: usize },
    CommentLessThanSignBangDashDash { start: usize },
    CommentEndDash { start: usize },
    CommentEnd { start: usize },
    CommentEndBang { start: usize },

    Doctype(DoctypeState),
    BeforeDoctypeName(DoctypeState),
    DoctypeName { doctype: DoctypeState, name_start: usize },
    AfterDoctypeName(DoctypeState),
    AfterDoctypePublicKeyword(DoctypeState),
    BeforeDoctypePublicIdentifier(DoctypeState),
    DoctypePublicIdentifierDoubleQuoted { doctype: DoctypeState, quote: usize },
    DoctypePublicIdentifierSingleQuoted { doctype: DoctypeState, quote: usize },
    AfterDoctypePublicIdentifier(DoctypeState),
    BetweenDoctypePublicAndSystemIdentifiers(DoctypeState),
    AfterDoctypeSystemKeyword(DoctypeState),
    BeforeDoctypeSystemIdentifier(DoctypeState),
    DoctypeSystemIdentifierDoubleQuoted { doctype: DoctypeState, quote: usize },
    DoctypeSystemIdentifierSingleQuoted { doctype: DoctypeState, quote: usize },
    AfterDoctypeSystemIdentifier(DoctypeState),
    BogusDoctype(DoctypeState),

    CdataSection { start: usize },
    CdataSectionBracket { start: usize },
    CdataSectionEnd { start: usize },

    Rcdata { start: usize },
    RcdataLessThanSign { start: usize, lt: usize },
    RcdataEndTagOpen { start: usize, lt: usize },
    RcdataEndTagName { start: usize, lt: usize, name_start: usize },

    Rawtext { start: usize },
    RawtextLessThanSign { start: usize, lt: usize },
    RawtextEndTagOpen { start: usize, lt: usize },
    RawtextEndTagName { start: usize, lt: usize, name_start: usize },

    ScriptData { start: usize },
    ScriptDataLessThanSign { start: usize, lt: usize },
    ScriptDataEndTagOpen { start: usize, lt: usize },
    ScriptDataEndTagName { start: usize, lt: usize, name_start: usize },
    ScriptDataEscapeStart { start: usize },
    ScriptDataEscapeStartDash { start: usize },
    ScriptDataEscaped { start: usize },
    ScriptDataEscapedDash { start: usize },
    ScriptDataEscapedDashDash { start: usize },
    ScriptDataEscapedLessThanSign { start: usize, lt: usize },
    ScriptDataEscapedEndTagOpen { start: usize, lt: usize },
    ScriptDataEscapedEndTagName { start: usize, lt: usize, name_start: usize },
    ScriptDataDoubleEscapeStart { start: usize, name_start: usize },
    ScriptDataDoubleEscaped { start: usize },
    ScriptDataDoubleEscapedDash { start: usize },
    ScriptDataDoubleEscapedDashDash { start: usize },
    ScriptDataDoubleEscapedLessThanSign { start: usize, lt: usize },
    ScriptDataDoubleEscapeEnd { start: usize, name_start: usize },

    Plaintext { start: usize },

    /// Absorbing terminal state; `next` returns `None` from here on.
    Eof,
}

/// Open text run in the data mode.
///
/// `start` is rebased to the first non-whitespace byte when the run stops
/// being whitespace-only, which is how leading whitespace is excluded from
/// the emitted span. `whitespace_streak` counts trailing whitespace so it can
/// be excluded as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TextRun {
    pub start: usize,
    pub whitespace_only: bool,
    pub whitespace_streak: usize,
}

impl TextRun {
    pub fn begin(at: usize, byte: u8) -> Self {
        let whitespace = super::input::is_whitespace(byte);
        Self {
            start: at,
            whitespace_only: whitespace,
            whitespace_streak: usize::from(whitespace),
        }
    }

    /// Fold a consumed chunk (starting at `chunk_start`) into the run's
    /// whitespace accounting.
    pub fn extend(&mut self, chunk: &[u8], chunk_start: usize) {
        for (offset, &byte) in chunk.iter().enumerate() {
            if super::input::is_whitespace(byte) {
                self.whitespace_streak += 1;
            } else {
                if self.whitespace_only {
                    self.whitespace_only = false;
                    self.start = chunk_start + offset;
                }
                self.whitespace_streak = 0;
            }
        }
    }

    /// Emitted span for a run ending at `end`, or `None` for a
    /// whitespace-only run.
    pub fn span_until(&self, end: usize) -> Option<Span> {
        if self.whitespace_only {
            return None;
        }
        Some(Span::new(self.start, end - self.whitespace_streak))
    }
}

/// In-flight tag.
///
/// `name_end` is meaningful once the name has been delimited. `name_pending`
/// is set when a special-text end tag re-enters the attribute states with its
/// name already known, so attribute-granularity emission can still surface
/// the name token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TagState {
    pub start: usize,
    pub name_start: usize,
    pub name_end: usize,
    pub is_end: bool,
    pub has_attrs: bool,
    pub name_pending: bool,
}

impl TagState {
    pub fn open(lt: usize, name_start: usize, is_end: bool) -> Self {
        Self {
            start: lt,
            name_start,
            name_end: name_start,
            is_end,
            has_attrs: false,
            name_pending: false,
        }
    }

    pub fn name(&self) -> Span {
        Span::new(self.name_start, self.name_end)
    }

    pub fn kind(&self, self_closing: bool) -> crate::token::TagKind {
        use crate::token::TagKind;
        if self.is_end {
            return TagKind::End;
        }
        match (self.has_attrs, self_closing) {
            (false, false) => TagKind::Start,
            (true, false) => TagKind::StartWithAttrs,
            (false, true) => TagKind::StartSelfClosing,
            (true, true) => TagKind::StartWithAttrsSelfClosing,
        }
    }

    /// Tag token covering `start..end`.
    pub fn token(&self, end: usize, self_closing: bool) -> crate::token::Token {
        crate::token::Token::Tag(crate::token::Tag {
            span: Span::new(self.start, end),
            name: self.name(),
            kind: self.kind(self_closing),
        })
    }
}

/// In-flight doctype declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DoctypeState {
    pub start: usize,
    pub name: Option<Span>,
    /// Identifier region, growing as PUBLIC/SYSTEM identifiers are consumed.
    pub extra: Option<Span>,
    pub force_quirks: bool,
}

impl DoctypeState {
    pub fn open(start: usize) -> Self {
        Self {
            start,
            name: None,
            extra: None,
            force_quirks: false,
        }
    }

    /// Grow the identifier region to cover `from..to`.
    pub fn note_extra(&mut self, from: usize, to: usize) {
        let start = self.extra.map_or(from, |extra| extra.start);
        self.extra = Some(Span::new(start, to));
    }

    /// Doctype token covering `start..end`.
    pub fn token(&self, end: usize) -> crate::token::Token {
        crate::token::Token::Doctype(crate::token::Doctype {
            span: Span::new(self.start, end),
            name: self.name,
            extra: self.extra.unwrap_or(Span::empty(end)),
            force_quirks: self.force_quirks,
        })
    }
}
