//! HTML5 tokenizer.
//!
//! A pull-based explicit state machine over an externally owned byte slice.
//! `next` is the only driver: it drains the one-slot deferred token, then
//! runs state handlers until one of them emits. Handlers that only mutate
//! state and advance the cursor do not return a token; emission is an
//! explicit early return, which realizes the WHATWG "emit" semantics without
//! coroutines.
//!
//! Invariants:
//! - The cursor is monotone non-decreasing across `next` calls except for
//!   one-byte backtracks implementing "reconsume"; the backtracked position
//!   is re-read by the next dispatch.
//! - Every emitted span lies within `[0, src.len()]` and has `start <= end`.
//! - The deferred slot is only occupied between consecutive `next` calls.
//! - `State::Eof` is absorbing: once reached, `next` returns `None` forever.
//! - The tokenizer classifies bytes only; it never decodes UTF-8, never
//!   replaces NUL, and never resolves character references.

use crate::error::{ParseError, ParseErrorKind};
use crate::span::Span;
use crate::token::{Attr, AttrValue, Quote, Token};
use state::{DoctypeState, State, TagState, TextRun};

mod comment;
mod doctype;
pub(crate) mod input;
mod special;
mod state;

use input::is_whitespace;

/// Minimal tokenizer instrumentation, maintained in test and debug builds
/// and behind the `debug-stats` feature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerStats {
    pub steps: u64,
    pub state_transitions: u64,
    pub tokens_emitted: u64,
    pub errors_emitted: u64,
    pub bytes_consumed: u64,
}

/// One emission: the token `next` returns now, plus an optional second token
/// stashed in the deferred slot for the following call.
pub(crate) struct Emit {
    pub token: Token,
    pub deferred: Option<Token>,
}

impl Emit {
    pub fn one(token: Token) -> Self {
        Self {
            token,
            deferred: None,
        }
    }

    pub fn pair(token: Token, deferred: Token) -> Self {
        Self {
            token,
            deferred: Some(deferred),
        }
    }
}

/// Streaming HTML tokenizer.
///
/// The caller owns the byte slice and passes it to every `next` call; the
/// slice must not change between calls. All emitted spans index into it.
#[derive(Debug)]
pub struct Tokenizer {
    pub(crate) idx: usize,
    state: State,
    deferred_token: Option<Token>,
    return_attrs: bool,
    /// Lowercased name of the start tag that entered the current special text
    /// mode. Empty means no end tag is ever appropriate.
    last_start_tag_name: Vec<u8>,
    stats: TokenizerStats,
}

impl Tokenizer {
    /// Tokenizer with tag-granularity emission: one `Token::Tag` per tag.
    pub fn new() -> Self {
        Self {
            idx: 0,
            state: State::Data,
            deferred_token: None,
            return_attrs: false,
            last_start_tag_name: Vec::new(),
            stats: TokenizerStats::default(),
        }
    }

    /// Tokenizer with attribute-granularity emission: `Token::TagName` when a
    /// tag name is known and one `Token::Attr` per attribute; the terminal
    /// tag token itself is suppressed.
    pub fn with_attrs() -> Self {
        Self {
            return_attrs: true,
            ..Self::new()
        }
    }

    /// Advance and emit the next token; `None` once the input is exhausted.
    pub fn next(&mut self, src: &[u8]) -> Option<Token> {
        if let Some(token) = self.deferred_token.take() {
            self.note_token(&token);
            return Some(token);
        }
        loop {
            if matches!(self.state, State::Eof) {
                self.note_bytes();
                return None;
            }
            self.note_step();
            let emitted = self.step(src);
            if let Some(emit) = emitted {
                debug_assert!(
                    self.deferred_token.is_none(),
                    "deferred slot must be drained before a new emission"
                );
                self.deferred_token = emit.deferred;
                self.note_token(&emit.token);
                self.note_bytes();
                return Some(emit.token);
            }
        }
    }

    /// Switch into script data, as after emitting a `<script>` start tag.
    pub fn enter_script_data(&mut self) {
        self.set_last_start_tag(b"script");
        self.transition_to(State::ScriptData { start: self.idx });
    }

    /// Switch into RCDATA, as after emitting e.g. a `<title>` or `<textarea>`
    /// start tag; `name` is the start tag's name.
    pub fn enter_rcdata(&mut self, name: &[u8]) {
        self.set_last_start_tag(name);
        self.transition_to(State::Rcdata { start: self.idx });
    }

    /// Switch into RAWTEXT, as after emitting e.g. a `<style>` start tag;
    /// `name` is the start tag's name.
    pub fn enter_rawtext(&mut self, name: &[u8]) {
        self.set_last_start_tag(name);
        self.transition_to(State::Rawtext { start: self.idx });
    }

    /// Switch into PLAINTEXT. The mode is terminal: the rest of the input is
    /// consumed as plain text.
    pub fn enter_plaintext(&mut self) {
        self.transition_to(State::Plaintext { start: self.idx });
    }

    /// Copy of the instrumentation counters.
    pub fn stats(&self) -> TokenizerStats {
        self.stats
    }

    fn set_last_start_tag(&mut self, name: &[u8]) {
        self.last_start_tag_name.clear();
        self.last_start_tag_name
            .extend(name.iter().map(u8::to_ascii_lowercase));
    }

    pub(crate) fn is_appropriate_end_tag(&self, name: &[u8]) -> bool {
        !self.last_start_tag_name.is_empty()
            && name.eq_ignore_ascii_case(&self.last_start_tag_name)
    }

    fn transition_to(&mut self, next: State) {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "html_lexer.tokenizer",
            "state {:?} -> {:?} @{}",
            self.state,
            next,
            self.idx
        );
        self.state = next;
        self.note_transition();
    }

    fn error_token(&mut self, kind: ParseErrorKind, span: Span) -> Token {
        self.note_error();
        Token::ParseError(ParseError { kind, span })
    }

    /// Enter the absorbing EOF state, emitting `kind` plus an optional
    /// salvaged token through the deferred slot.
    fn eof_error(
        &mut self,
        kind: ParseErrorKind,
        span: Span,
        deferred: Option<Token>,
    ) -> Option<Emit> {
        self.transition_to(State::Eof);
        let token = self.error_token(kind, span);
        Some(Emit { token, deferred })
    }

    fn step(&mut self, src: &[u8]) -> Option<Emit> {
        debug_assert!(self.idx <= src.len(), "cursor ran past the source");
        match self.state {
            State::Data => self.step_data(src),
            State::Text(run) => self.step_text(src, run),

            State::TagOpen { lt } => self.step_tag_open(src, lt),
            State::EndTagOpen { lt } => self.step_end_tag_open(src, lt),
            State::TagName(tag) => self.step_tag_name(src, tag),
            State::BeforeAttributeName(tag) => self.step_before_attribute_name(src, tag),
            State::AttributeName { tag, name_start } => {
                self.step_attribute_name(src, tag, name_start)
            }
            State::AfterAttributeName { tag, name } => {
                self.step_after_attribute_name(src, tag, name)
            }
            State::BeforeAttributeValue { tag, name } => {
                self.step_before_attribute_value(src, tag, name)
            }
            State::AttributeValueDoubleQuoted {
                tag,
                name,
                value_start,
            } => self.step_attribute_value_quoted(src, tag, name, value_start, Quote::Double),
            State::AttributeValueSingleQuoted {
                tag,
                name,
                value_start,
            } => self.step_attribute_value_quoted(src, tag, name, value_start, Quote::Single),
            State::AttributeValueUnquoted {
                tag,
                name,
                value_start,
            } => self.step_attribute_value_unquoted(src, tag, name, value_start),
            State::AfterAttributeValueQuoted(tag) => {
                self.step_after_attribute_value_quoted(src, tag)
            }
            State::SelfClosingStartTag(tag) => self.step_self_closing_start_tag(src, tag),

            State::MarkupDeclarationOpen { lt } => self.step_markup_declaration_open(src, lt),
            State::BogusComment { start } => self.step_bogus_comment(src, start),
            State::CommentStart { start } => self.step_comment_start(src, start),
            State::CommentStartDash { start } => self.step_comment_start_dash(src, start),
            State::Comment { start } => self.step_comment(src, start),
            State::CommentLessThanSign { start } => self.step_comment_less_than_sign(src, start),
            State::CommentLessThanSignBang { start } => {
                self.step_comment_less_than_sign_bang(src, start)
            }
            State::CommentLessThanSignBangDash { start } => {
                self.step_comment_less_than_sign_bang_dash(src, start)
            }
            State::CommentLessThanSignBangDashDash { start } => {
                self.step_comment_less_than_sign_bang_dash_dash(src, start)
            }
            State::CommentEndDash { start } => self.step_comment_end_dash(src, start),
            State::CommentEnd { start } => self.step_comment_end(src, start),
            State::CommentEndBang { start } => self.step_comment_end_bang(src, start),

            State::Doctype(doctype) => self.step_doctype(src, doctype),
            State::BeforeDoctypeName(doctype) => self.step_before_doctype_name(src, doctype),
            State::DoctypeName { doctype, name_start } => {
                self.step_doctype_name(src, doctype, name_start)
            }
            State::AfterDoctypeName(doctype) => self.step_after_doctype_name(src, doctype),
            State::AfterDoctypePublicKeyword(doctype) => {
                self.step_after_doctype_public_keyword(src, doctype)
            }
            State::BeforeDoctypePublicIdentifier(doctype) => {
                self.step_before_doctype_public_identifier(src, doctype)
            }
            State::DoctypePublicIdentifierDoubleQuoted { doctype, quote } => {
                self.step_doctype_public_identifier(src, doctype, quote, b'"')
            }
            State::DoctypePublicIdentifierSingleQuoted { doctype, quote } => {
                self.step_doctype_public_identifier(src, doctype, quote, b'\'')
            }
            State::AfterDoctypePublicIdentifier(doctype) => {
                self.step_after_doctype_public_identifier(src, doctype)
            }
            State::BetweenDoctypePublicAndSystemIdentifiers(doctype) => {
                self.step_between_doctype_public_and_system_identifiers(src, doctype)
            }
            State::AfterDoctypeSystemKeyword(doctype) => {
                self.step_after_doctype_system_keyword(src, doctype)
            }
            State::BeforeDoctypeSystemIdentifier(doctype) => {
                self.step_before_doctype_system_identifier(src, doctype)
            }
            State::DoctypeSystemIdentifierDoubleQuoted { doctype, quote } => {
                self.step_doctype_system_identifier(src, doctype, quote, b'"')
            }
            State::DoctypeSystemIdentifierSingleQuoted { doctype, quote } => {
                self.step_doctype_system_identifier(src, doctype, quote, b'\'')
            }
            State::AfterDoctypeSystemIdentifier(doctype) => {
                self.step_after_doctype_system_identifier(src, doctype)
            }
            State::BogusDoctype(doctype) => self.step_bogus_doctype(src, doctype),

            State::CdataSection { start } => self.step_cdata_section(src, start),
            State::CdataSectionBracket { start } => self.step_cdata_section_bracket(src, start),
            State::CdataSectionEnd { start } => self.step_cdata_section_end(src, start),

            State::Rcdata { start } => self.step_special_data(src, start, special::Kind::Rcdata),
            State::RcdataLessThanSign { start, lt } => {
                self.step_special_less_than_sign(src, start, lt, special::Kind::Rcdata)
            }
            State::RcdataEndTagOpen { start, lt } => {
                self.step_special_end_tag_open(src, start, lt, special::Kind::Rcdata)
            }
            State::RcdataEndTagName {
                start,
                lt,
                name_start,
            } => self.step_special_end_tag_name(src, start, lt, name_start, special::Kind::Rcdata),

            State::Rawtext { start } => self.step_special_data(src, start, special::Kind::Rawtext),
            State::RawtextLessThanSign { start, lt } => {
                self.step_special_less_than_sign(src, start, lt, special::Kind::Rawtext)
            }
            State::RawtextEndTagOpen { start, lt } => {
                self.step_special_end_tag_open(src, start, lt, special::Kind::Rawtext)
            }
            State::RawtextEndTagName {
                start,
                lt,
                name_start,
            } => self.step_special_end_tag_name(src, start, lt, name_start, special::Kind::Rawtext),

            State::ScriptData { start } => {
                self.step_special_data(src, start, special::Kind::ScriptData)
            }
            State::ScriptDataLessThanSign { start, lt } => {
                self.step_script_data_less_than_sign(src, start, lt)
            }
            State::ScriptDataEndTagOpen { start, lt } => {
                self.step_special_end_tag_open(src, start, lt, special::Kind::ScriptData)
            }
            State::ScriptDataEndTagName {
                start,
                lt,
                name_start,
            } => {
                self.step_special_end_tag_name(src, start, lt, name_start, special::Kind::ScriptData)
            }
            State::ScriptDataEscapeStart { start } => self.step_script_data_escape_start(src, start),
            State::ScriptDataEscapeStartDash { start } => {
                self.step_script_data_escape_start_dash(src, start)
            }
            State::ScriptDataEscaped { start } => self.step_script_data_escaped(src, start),
            State::ScriptDataEscapedDash { start } => {
                self.step_script_data_escaped_dash(src, start)
            }
            State::ScriptDataEscapedDashDash { start } => {
                self.step_script_data_escaped_dash_dash(src, start)
            }
            State::ScriptDataEscapedLessThanSign { start, lt } => {
                self.step_script_data_escaped_less_than_sign(src, start, lt)
            }
            State::ScriptDataEscapedEndTagOpen { start, lt } => {
                self.step_special_end_tag_open(src, start, lt, special::Kind::ScriptEscaped)
            }
            State::ScriptDataEscapedEndTagName {
                start,
                lt,
                name_start,
            } => self.step_special_end_tag_name(
                src,
                start,
                lt,
                name_start,
                special::Kind::ScriptEscaped,
            ),
            State::ScriptDataDoubleEscapeStart { start, name_start } => {
                self.step_script_data_double_escape_start(src, start, name_start)
            }
            State::ScriptDataDoubleEscaped { start } => {
                self.step_script_data_double_escaped(src, start)
            }
            State::ScriptDataDoubleEscapedDash { start } => {
                self.step_script_data_double_escaped_dash(src, start)
            }
            State::ScriptDataDoubleEscapedDashDash { start } => {
                self.step_script_data_double_escaped_dash_dash(src, start)
            }
            State::ScriptDataDoubleEscapedLessThanSign { start, lt } => {
                self.step_script_data_double_escaped_less_than_sign(src, start, lt)
            }
            State::ScriptDataDoubleEscapeEnd { start, name_start } => {
                self.step_script_data_double_escape_end(src, start, name_start)
            }

            State::Plaintext { start } => self.step_plaintext(src, start),

            State::Eof => None,
        }
    }

    fn step_data(&mut self, src: &[u8]) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            self.transition_to(State::Eof);
            return None;
        };
        match byte {
            b'<' => {
                self.transition_to(State::TagOpen { lt: self.idx - 1 });
                None
            }
            0 => {
                let span = Span::new(self.idx - 1, self.idx);
                Some(Emit::one(
                    self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                ))
            }
            _ => {
                self.transition_to(State::Text(TextRun::begin(self.idx - 1, byte)));
                None
            }
        }
    }

    fn step_text(&mut self, src: &[u8], mut run: TextRun) -> Option<Emit> {
        match memchr::memchr2(b'<', 0, &src[self.idx..]) {
            None => {
                run.extend(&src[self.idx..], self.idx);
                self.idx = src.len();
                self.transition_to(State::Eof);
                run.span_until(src.len())
                    .map(|span| Emit::one(Token::Text { span }))
            }
            Some(rel) => {
                let pos = self.idx + rel;
                run.extend(&src[self.idx..pos], self.idx);
                self.idx = pos + 1;
                if src[pos] == b'<' {
                    self.transition_to(State::TagOpen { lt: pos });
                    run.span_until(pos)
                        .map(|span| Emit::one(Token::Text { span }))
                } else {
                    // NUL abandons the run entirely.
                    let span = Span::new(pos, pos + 1);
                    self.transition_to(State::Data);
                    Some(Emit::one(
                        self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                    ))
                }
            }
        }
    }

    fn step_tag_open(&mut self, src: &[u8], lt: usize) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            let span = Span::new(lt, src.len());
            let salvage = Token::Text { span };
            return self.eof_error(ParseErrorKind::EofBeforeTagName, span, Some(salvage));
        };
        match byte {
            b'!' => {
                self.transition_to(State::MarkupDeclarationOpen { lt });
                None
            }
            b'/' => {
                self.transition_to(State::EndTagOpen { lt });
                None
            }
            byte if byte.is_ascii_alphabetic() => {
                self.reconsume();
                self.transition_to(State::TagName(TagState::open(lt, self.idx, false)));
                None
            }
            b'?' => {
                let span = Span::new(self.idx - 1, self.idx);
                self.reconsume();
                self.transition_to(State::BogusComment { start: lt });
                Some(Emit::one(
                    self.error_token(ParseErrorKind::InvalidFirstCharacterOfTagName, span),
                ))
            }
            _ => {
                // The `<` was not a tag opener after all: surface it as text
                // and reprocess the current byte in the data state.
                let span = Span::new(self.idx - 1, self.idx);
                self.reconsume();
                self.transition_to(State::Data);
                let error = self.error_token(ParseErrorKind::InvalidFirstCharacterOfTagName, span);
                Some(Emit::pair(
                    error,
                    Token::Text {
                        span: Span::new(lt, lt + 1),
                    },
                ))
            }
        }
    }

    fn step_end_tag_open(&mut self, src: &[u8], lt: usize) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            let span = Span::new(lt, src.len());
            let salvage = Token::Text { span };
            return self.eof_error(ParseErrorKind::EofBeforeTagName, span, Some(salvage));
        };
        match byte {
            byte if byte.is_ascii_alphabetic() => {
                self.reconsume();
                self.transition_to(State::TagName(TagState::open(lt, self.idx, true)));
                None
            }
            b'>' => {
                let span = Span::new(lt, self.idx);
                self.transition_to(State::Data);
                Some(Emit::one(
                    self.error_token(ParseErrorKind::MissingEndTagName, span),
                ))
            }
            _ => {
                let span = Span::new(self.idx - 1, self.idx);
                self.reconsume();
                self.transition_to(State::BogusComment { start: lt });
                Some(Emit::one(
                    self.error_token(ParseErrorKind::InvalidFirstCharacterOfTagName, span),
                ))
            }
        }
    }

    fn step_tag_name(&mut self, src: &[u8], mut tag: TagState) -> Option<Emit> {
        while let Some(byte) = self.consume(src) {
            if is_whitespace(byte) {
                tag.name_end = self.idx - 1;
                self.transition_to(State::BeforeAttributeName(tag));
                return self.maybe_tag_name(&tag);
            }
            match byte {
                b'/' => {
                    tag.name_end = self.idx - 1;
                    self.transition_to(State::SelfClosingStartTag(tag));
                    return self.maybe_tag_name(&tag);
                }
                b'>' => {
                    tag.name_end = self.idx - 1;
                    self.transition_to(State::Data);
                    return Some(if self.return_attrs {
                        Emit::one(Token::TagName { name: tag.name() })
                    } else {
                        Emit::one(tag.token(self.idx, false))
                    });
                }
                b'<' => {
                    // Name ends here; the `<` is reprocessed as the start of
                    // an attribute name (and flagged there).
                    tag.name_end = self.idx - 1;
                    self.reconsume();
                    self.transition_to(State::BeforeAttributeName(tag));
                    return self.maybe_tag_name(&tag);
                }
                0 => {
                    // Upper-case bytes and NUL stay in the name span untouched.
                    let span = Span::new(self.idx - 1, self.idx);
                    return Some(Emit::one(
                        self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                    ));
                }
                _ => {}
            }
        }
        tag.name_end = src.len();
        let deferred = if self.return_attrs {
            Token::TagName { name: tag.name() }
        } else {
            tag.token(src.len(), false)
        };
        self.eof_error(
            ParseErrorKind::EofInTag,
            Span::empty(src.len()),
            Some(deferred),
        )
    }

    fn maybe_tag_name(&self, tag: &TagState) -> Option<Emit> {
        self.return_attrs
            .then(|| Emit::one(Token::TagName { name: tag.name() }))
    }

    fn step_before_attribute_name(&mut self, src: &[u8], mut tag: TagState) -> Option<Emit> {
        if let Some(emit) = self.flush_pending_tag_name(&mut tag, State::BeforeAttributeName) {
            return Some(emit);
        }
        self.skip_whitespace(src);
        let Some(byte) = self.consume(src) else {
            return self.eof_in_tag(src, tag, None);
        };
        match byte {
            b'/' => {
                self.transition_to(State::SelfClosingStartTag(tag));
                None
            }
            b'>' => {
                self.transition_to(State::Data);
                if self.return_attrs {
                    None
                } else {
                    Some(Emit::one(tag.token(self.idx, false)))
                }
            }
            b'=' => {
                let span = Span::new(self.idx - 1, self.idx);
                self.transition_to(State::AttributeName {
                    tag,
                    name_start: self.idx - 1,
                });
                Some(Emit::one(self.error_token(
                    ParseErrorKind::UnexpectedEqualsSignBeforeAttributeName,
                    span,
                )))
            }
            _ => {
                self.reconsume();
                self.transition_to(State::AttributeName {
                    tag,
                    name_start: self.idx,
                });
                None
            }
        }
    }

    fn step_attribute_name(
        &mut self,
        src: &[u8],
        mut tag: TagState,
        name_start: usize,
    ) -> Option<Emit> {
        while let Some(byte) = self.consume(src) {
            if is_whitespace(byte) {
                let name = Span::new(name_start, self.idx - 1);
                self.transition_to(State::AfterAttributeName { tag, name });
                return None;
            }
            match byte {
                b'/' | b'>' => {
                    self.reconsume();
                    let name = Span::new(name_start, self.idx);
                    self.transition_to(State::AfterAttributeName { tag, name });
                    return None;
                }
                b'=' => {
                    let name = Span::new(name_start, self.idx - 1);
                    self.transition_to(State::BeforeAttributeValue { tag, name });
                    return None;
                }
                b'"' | b'\'' | b'<' => {
                    // Flagged but kept: the byte stays part of the name span.
                    let span = Span::new(self.idx - 1, self.idx);
                    return Some(Emit::one(self.error_token(
                        ParseErrorKind::UnexpectedCharacterInAttributeName,
                        span,
                    )));
                }
                0 => {
                    let span = Span::new(self.idx - 1, self.idx);
                    return Some(Emit::one(
                        self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                    ));
                }
                _ => {}
            }
        }
        tag.has_attrs = true;
        let deferred = if self.return_attrs {
            Token::Attr(Attr {
                name: Span::new(name_start, src.len()),
                value: None,
            })
        } else {
            tag.token(src.len(), false)
        };
        self.eof_error(
            ParseErrorKind::EofInTag,
            Span::empty(src.len()),
            Some(deferred),
        )
    }

    fn step_after_attribute_name(
        &mut self,
        src: &[u8],
        mut tag: TagState,
        name: Span,
    ) -> Option<Emit> {
        self.skip_whitespace(src);
        let Some(byte) = self.consume(src) else {
            tag.has_attrs = true;
            let deferred = if self.return_attrs {
                Token::Attr(Attr { name, value: None })
            } else {
                tag.token(src.len(), false)
            };
            return self.eof_error(
                ParseErrorKind::EofInTag,
                Span::empty(src.len()),
                Some(deferred),
            );
        };
        match byte {
            b'/' => {
                let attr = self.finish_attr(&mut tag, name, None);
                self.transition_to(State::SelfClosingStartTag(tag));
                attr.map(Emit::one)
            }
            b'=' => {
                self.transition_to(State::BeforeAttributeValue { tag, name });
                None
            }
            b'>' => {
                let attr = self.finish_attr(&mut tag, name, None);
                self.transition_to(State::Data);
                if self.return_attrs {
                    attr.map(Emit::one)
                } else {
                    Some(Emit::one(tag.token(self.idx, false)))
                }
            }
            _ => {
                let attr = self.finish_attr(&mut tag, name, None);
                self.reconsume();
                self.transition_to(State::AttributeName {
                    tag,
                    name_start: self.idx,
                });
                attr.map(Emit::one)
            }
        }
    }

    fn step_before_attribute_value(
        &mut self,
        src: &[u8],
        mut tag: TagState,
        name: Span,
    ) -> Option<Emit> {
        self.skip_whitespace(src);
        let Some(byte) = self.consume(src) else {
            tag.has_attrs = true;
            let deferred = if self.return_attrs {
                Token::Attr(Attr { name, value: None })
            } else {
                tag.token(src.len(), false)
            };
            return self.eof_error(
                ParseErrorKind::EofInTag,
                Span::empty(src.len()),
                Some(deferred),
            );
        };
        match byte {
            b'"' => {
                self.transition_to(State::AttributeValueDoubleQuoted {
                    tag,
                    name,
                    value_start: self.idx,
                });
                None
            }
            b'\'' => {
                self.transition_to(State::AttributeValueSingleQuoted {
                    tag,
                    name,
                    value_start: self.idx,
                });
                None
            }
            b'>' => {
                let span = Span::new(self.idx - 1, self.idx);
                let value = AttrValue {
                    quote: Quote::None,
                    span: Span::empty(self.idx - 1),
                };
                let attr = self.finish_attr(&mut tag, name, Some(value));
                self.transition_to(State::Data);
                let error = self.error_token(ParseErrorKind::MissingAttributeValue, span);
                let deferred = if self.return_attrs {
                    attr
                } else {
                    Some(tag.token(self.idx, false))
                };
                Some(Emit {
                    token: error,
                    deferred,
                })
            }
            _ => {
                self.reconsume();
                self.transition_to(State::AttributeValueUnquoted {
                    tag,
                    name,
                    value_start: self.idx,
                });
                None
            }
        }
    }

    fn step_attribute_value_quoted(
        &mut self,
        src: &[u8],
        mut tag: TagState,
        name: Span,
        value_start: usize,
        quote: Quote,
    ) -> Option<Emit> {
        let quote_byte = match quote {
            Quote::Double => b'"',
            Quote::Single => b'\'',
            Quote::None => {
                debug_assert!(false, "quoted value state requires a quote discipline");
                b'"'
            }
        };
        match memchr::memchr2(quote_byte, 0, &src[self.idx..]) {
            None => {
                self.idx = src.len();
                tag.has_attrs = true;
                let value = AttrValue {
                    quote,
                    span: Span::new(value_start, src.len()),
                };
                let deferred = if self.return_attrs {
                    Token::Attr(Attr {
                        name,
                        value: Some(value),
                    })
                } else {
                    tag.token(src.len(), false)
                };
                self.eof_error(
                    ParseErrorKind::EofInAttributeValue,
                    Span::empty(src.len()),
                    Some(deferred),
                )
            }
            Some(rel) => {
                let pos = self.idx + rel;
                self.idx = pos + 1;
                if src[pos] == quote_byte {
                    let value = AttrValue {
                        quote,
                        span: Span::new(value_start, pos),
                    };
                    let attr = self.finish_attr(&mut tag, name, Some(value));
                    self.transition_to(State::AfterAttributeValueQuoted(tag));
                    attr.map(Emit::one)
                } else {
                    let span = Span::new(pos, pos + 1);
                    Some(Emit::one(
                        self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                    ))
                }
            }
        }
    }

    fn step_attribute_value_unquoted(
        &mut self,
        src: &[u8],
        mut tag: TagState,
        name: Span,
        value_start: usize,
    ) -> Option<Emit> {
        while let Some(byte) = self.consume(src) {
            if is_whitespace(byte) {
                let value = AttrValue {
                    quote: Quote::None,
                    span: Span::new(value_start, self.idx - 1),
                };
                let attr = self.finish_attr(&mut tag, name, Some(value));
                self.transition_to(State::BeforeAttributeName(tag));
                return attr.map(Emit::one);
            }
            match byte {
                b'>' => {
                    let value = AttrValue {
                        quote: Quote::None,
                        span: Span::new(value_start, self.idx - 1),
                    };
                    let attr = self.finish_attr(&mut tag, name, Some(value));
                    self.transition_to(State::Data);
                    return if self.return_attrs {
                        attr.map(Emit::one)
                    } else {
                        Some(Emit::one(tag.token(self.idx, false)))
                    };
                }
                b'"' | b'\'' | b'<' | b'=' | b'`' => {
                    let span = Span::new(self.idx - 1, self.idx);
                    return Some(Emit::one(self.error_token(
                        ParseErrorKind::UnexpectedCharacterInUnquotedAttributeValue,
                        span,
                    )));
                }
                0 => {
                    let span = Span::new(self.idx - 1, self.idx);
                    return Some(Emit::one(
                        self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                    ));
                }
                _ => {}
            }
        }
        tag.has_attrs = true;
        let value = AttrValue {
            quote: Quote::None,
            span: Span::new(value_start, src.len()),
        };
        let deferred = if self.return_attrs {
            Token::Attr(Attr {
                name,
                value: Some(value),
            })
        } else {
            tag.token(src.len(), false)
        };
        self.eof_error(
            ParseErrorKind::EofInTag,
            Span::empty(src.len()),
            Some(deferred),
        )
    }

    fn step_after_attribute_value_quoted(&mut self, src: &[u8], tag: TagState) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_tag(src, tag, None);
        };
        if is_whitespace(byte) {
            self.transition_to(State::BeforeAttributeName(tag));
            return None;
        }
        match byte {
            b'/' => {
                self.transition_to(State::SelfClosingStartTag(tag));
                None
            }
            b'>' => {
                self.transition_to(State::Data);
                if self.return_attrs {
                    None
                } else {
                    Some(Emit::one(tag.token(self.idx, false)))
                }
            }
            _ => {
                let span = Span::new(self.idx - 1, self.idx);
                self.reconsume();
                self.transition_to(State::BeforeAttributeName(tag));
                Some(Emit::one(self.error_token(
                    ParseErrorKind::MissingWhitespaceBetweenAttributes,
                    span,
                )))
            }
        }
    }

    fn step_self_closing_start_tag(&mut self, src: &[u8], mut tag: TagState) -> Option<Emit> {
        if let Some(emit) = self.flush_pending_tag_name(&mut tag, State::SelfClosingStartTag) {
            return Some(emit);
        }
        let Some(byte) = self.consume(src) else {
            return self.eof_in_tag(src, tag, None);
        };
        match byte {
            b'>' => {
                self.transition_to(State::Data);
                if tag.is_end {
                    // The solidus sits right before the `>` in every path
                    // that reaches this state.
                    let solidus = Span::new(self.idx - 2, self.idx - 1);
                    let error =
                        self.error_token(ParseErrorKind::EndTagWithTrailingSolidus, solidus);
                    let deferred = (!self.return_attrs).then(|| tag.token(self.idx, false));
                    Some(Emit {
                        token: error,
                        deferred,
                    })
                } else if self.return_attrs {
                    None
                } else {
                    Some(Emit::one(tag.token(self.idx, true)))
                }
            }
            _ => {
                let span = Span::new(self.idx - 1, self.idx);
                self.reconsume();
                self.transition_to(State::BeforeAttributeName(tag));
                Some(Emit::one(
                    self.error_token(ParseErrorKind::UnexpectedSolidusInTag, span),
                ))
            }
        }
    }

    fn step_markup_declaration_open(&mut self, src: &[u8], lt: usize) -> Option<Emit> {
        if src[self.idx..].starts_with(b"--") {
            self.idx += 2;
            self.transition_to(State::CommentStart { start: lt });
            return None;
        }
        if self.consume_keyword_ci(src, b"DOCTYPE") {
            self.transition_to(State::Doctype(DoctypeState::open(lt)));
            return None;
        }
        if src[self.idx..].starts_with(b"[CDATA[") {
            self.idx += 7;
            self.transition_to(State::CdataSection { start: lt });
            return None;
        }
        let span = Span::new(lt, self.idx);
        self.transition_to(State::BogusComment { start: lt });
        Some(Emit::one(
            self.error_token(ParseErrorKind::IncorrectlyOpenedComment, span),
        ))
    }

    /// Surface the tag name of a special-text end tag that bypassed the tag
    /// name state (attribute-granularity mode only).
    fn flush_pending_tag_name(
        &mut self,
        tag: &mut TagState,
        remain: fn(TagState) -> State,
    ) -> Option<Emit> {
        if !(self.return_attrs && tag.name_pending) {
            return None;
        }
        tag.name_pending = false;
        self.transition_to(remain(*tag));
        Some(Emit::one(Token::TagName { name: tag.name() }))
    }

    fn finish_attr(
        &mut self,
        tag: &mut TagState,
        name: Span,
        value: Option<AttrValue>,
    ) -> Option<Token> {
        tag.has_attrs = true;
        self.return_attrs.then(|| Token::Attr(Attr { name, value }))
    }

    fn eof_in_tag(&mut self, src: &[u8], tag: TagState, attr: Option<Attr>) -> Option<Emit> {
        let deferred = if self.return_attrs {
            attr.map(Token::Attr)
        } else {
            Some(tag.token(src.len(), false))
        };
        self.eof_error(ParseErrorKind::EofInTag, Span::empty(src.len()), deferred)
    }

    #[inline]
    fn note_step(&mut self) {
        #[cfg(any(test, debug_assertions, feature = "debug-stats"))]
        {
            self.stats.steps = self.stats.steps.saturating_add(1);
        }
    }

    #[inline]
    fn note_transition(&mut self) {
        #[cfg(any(test, debug_assertions, feature = "debug-stats"))]
        {
            self.stats.state_transitions = self.stats.state_transitions.saturating_add(1);
        }
    }

    #[inline]
    fn note_token(&mut self, _token: &Token) {
        #[cfg(any(test, debug_assertions, feature = "debug-stats"))]
        {
            self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
        }
    }

    #[inline]
    fn note_error(&mut self) {
        #[cfg(any(test, debug_assertions, feature = "debug-stats"))]
        {
            self.stats.errors_emitted = self.stats.errors_emitted.saturating_add(1);
        }
    }

    #[inline]
    fn note_bytes(&mut self) {
        #[cfg(any(test, debug_assertions, feature = "debug-stats"))]
        {
            self.stats.bytes_consumed = self.idx as u64;
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive a fresh tag-granularity tokenizer over `src` and collect every token.
pub fn tokenize(src: &[u8]) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new();
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next(src) {
        tokens.push(token);
    }
    tokens
}

#[cfg(test)]
mod tests;
