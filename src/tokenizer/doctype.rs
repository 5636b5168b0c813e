//! Doctype states: name, PUBLIC/SYSTEM identifier forks, and bogus doctype.
//!
//! `force_quirks` is set on every error path the tree builder must know
//! about: missing or unquoted identifiers, abrupt termination, an invalid
//! keyword after the name, and EOF anywhere inside the declaration. The
//! emitted token's `extra` span covers the identifier region (quotes
//! included) so downstream checks can inspect it without re-parsing.

use crate::error::ParseErrorKind;
use crate::span::Span;
use crate::tokenizer::state::{DoctypeState, State};
use crate::tokenizer::{Emit, Tokenizer};

impl Tokenizer {
    fn eof_in_doctype(&mut self, src: &[u8], mut doctype: DoctypeState) -> Option<Emit> {
        doctype.force_quirks = true;
        let salvage = doctype.token(src.len());
        self.eof_error(
            ParseErrorKind::EofInDoctype,
            Span::empty(src.len()),
            Some(salvage),
        )
    }

    pub(super) fn step_doctype(&mut self, src: &[u8], doctype: DoctypeState) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_doctype(src, doctype);
        };
        if super::input::is_whitespace(byte) {
            self.transition_to(State::BeforeDoctypeName(doctype));
            return None;
        }
        match byte {
            b'>' => {
                self.reconsume();
                self.transition_to(State::BeforeDoctypeName(doctype));
                None
            }
            _ => {
                let span = Span::new(self.idx - 1, self.idx);
                self.reconsume();
                self.transition_to(State::BeforeDoctypeName(doctype));
                Some(Emit::one(self.error_token(
                    ParseErrorKind::MissingWhitespaceBeforeDoctypeName,
                    span,
                )))
            }
        }
    }

    pub(super) fn step_before_doctype_name(
        &mut self,
        src: &[u8],
        mut doctype: DoctypeState,
    ) -> Option<Emit> {
        self.skip_whitespace(src);
        let Some(byte) = self.consume(src) else {
            return self.eof_in_doctype(src, doctype);
        };
        match byte {
            b'>' => {
                let span = Span::new(doctype.start, self.idx);
                doctype.force_quirks = true;
                self.transition_to(State::Data);
                let error = self.error_token(ParseErrorKind::MissingDoctypeName, span);
                Some(Emit::pair(error, doctype.token(self.idx)))
            }
            0 => {
                // Flagged, but the byte still begins the name span.
                let span = Span::new(self.idx - 1, self.idx);
                self.transition_to(State::DoctypeName {
                    doctype,
                    name_start: self.idx - 1,
                });
                Some(Emit::one(
                    self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                ))
            }
            _ => {
                self.transition_to(State::DoctypeName {
                    doctype,
                    name_start: self.idx - 1,
                });
                None
            }
        }
    }

    pub(super) fn step_doctype_name(
        &mut self,
        src: &[u8],
        mut doctype: DoctypeState,
        name_start: usize,
    ) -> Option<Emit> {
        while let Some(byte) = self.consume(src) {
            if super::input::is_whitespace(byte) {
                doctype.name = Some(Span::new(name_start, self.idx - 1));
                self.transition_to(State::AfterDoctypeName(doctype));
                return None;
            }
            match byte {
                b'>' => {
                    doctype.name = Some(Span::new(name_start, self.idx - 1));
                    self.transition_to(State::Data);
                    return Some(Emit::one(doctype.token(self.idx)));
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
        doctype.name = Some(Span::new(name_start, src.len()));
        self.eof_in_doctype(src, doctype)
    }

    pub(super) fn step_after_doctype_name(
        &mut self,
        src: &[u8],
        mut doctype: DoctypeState,
    ) -> Option<Emit> {
        self.skip_whitespace(src);
        if self.idx >= src.len() {
            return self.eof_in_doctype(src, doctype);
        }
        if src[self.idx] == b'>' {
            self.idx += 1;
            self.transition_to(State::Data);
            return Some(Emit::one(doctype.token(self.idx)));
        }
        if self.consume_keyword_ci(src, b"PUBLIC") {
            self.transition_to(State::AfterDoctypePublicKeyword(doctype));
            return None;
        }
        if self.consume_keyword_ci(src, b"SYSTEM") {
            self.transition_to(State::AfterDoctypeSystemKeyword(doctype));
            return None;
        }
        let span = Span::new(self.idx, self.idx + 1);
        doctype.force_quirks = true;
        self.transition_to(State::BogusDoctype(doctype));
        Some(Emit::one(self.error_token(
            ParseErrorKind::InvalidCharacterSequenceAfterDoctypeName,
            span,
        )))
    }

    pub(super) fn step_after_doctype_public_keyword(
        &mut self,
        src: &[u8],
        mut doctype: DoctypeState,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_doctype(src, doctype);
        };
        if super::input::is_whitespace(byte) {
            self.transition_to(State::BeforeDoctypePublicIdentifier(doctype));
            return None;
        }
        match byte {
            b'"' | b'\'' => {
                let span = Span::new(self.idx - 1, self.idx);
                let next = if byte == b'"' {
                    State::DoctypePublicIdentifierDoubleQuoted {
                        doctype,
                        quote: self.idx - 1,
                    }
                } else {
                    State::DoctypePublicIdentifierSingleQuoted {
                        doctype,
                        quote: self.idx - 1,
                    }
                };
                self.transition_to(next);
                Some(Emit::one(self.error_token(
                    ParseErrorKind::MissingWhitespaceAfterDoctypePublicKeyword,
                    span,
                )))
            }
            b'>' => {
                let span = Span::new(self.idx - 1, self.idx);
                doctype.force_quirks = true;
                self.transition_to(State::Data);
                let error =
                    self.error_token(ParseErrorKind::MissingDoctypePublicIdentifier, span);
                Some(Emit::pair(error, doctype.token(self.idx)))
            }
            _ => {
                let span = Span::new(self.idx - 1, self.idx);
                doctype.force_quirks = true;
                self.reconsume();
                self.transition_to(State::BogusDoctype(doctype));
                Some(Emit::one(self.error_token(
                    ParseErrorKind::MissingQuoteBeforeDoctypePublicIdentifier,
                    span,
                )))
            }
        }
    }

    pub(super) fn step_before_doctype_public_identifier(
        &mut self,
        src: &[u8],
        mut doctype: DoctypeState,
    ) -> Option<Emit> {
        self.skip_whitespace(src);
        let Some(byte) = self.consume(src) else {
            return self.eof_in_doctype(src, doctype);
        };
        match byte {
            b'"' => {
                self.transition_to(State::DoctypePublicIdentifierDoubleQuoted {
                    doctype,
                    quote: self.idx - 1,
                });
                None
            }
            b'\'' => {
                self.transition_to(State::DoctypePublicIdentifierSingleQuoted {
                    doctype,
                    quote: self.idx - 1,
                });
                None
            }
            b'>' => {
                let span = Span::new(self.idx - 1, self.idx);
                doctype.force_quirks = true;
                self.transition_to(State::Data);
                let error =
                    self.error_token(ParseErrorKind::MissingDoctypePublicIdentifier, span);
                Some(Emit::pair(error, doctype.token(self.idx)))
            }
            _ => {
                let span = Span::new(self.idx - 1, self.idx);
                doctype.force_quirks = true;
                self.reconsume();
                self.transition_to(State::BogusDoctype(doctype));
                Some(Emit::one(self.error_token(
                    ParseErrorKind::MissingQuoteBeforeDoctypePublicIdentifier,
                    span,
                )))
            }
        }
    }

    pub(super) fn step_doctype_public_identifier(
        &mut self,
        src: &[u8],
        mut doctype: DoctypeState,
        quote: usize,
        quote_byte: u8,
    ) -> Option<Emit> {
        match memchr::memchr3(quote_byte, b'>', 0, &src[self.idx..]) {
            None => {
                self.idx = src.len();
                doctype.note_extra(quote, src.len());
                self.eof_in_doctype(src, doctype)
            }
            Some(rel) => {
                let pos = self.idx + rel;
                self.idx = pos + 1;
                match src[pos] {
                    b'>' => {
                        let span = Span::new(pos, pos + 1);
                        doctype.note_extra(quote, pos);
                        doctype.force_quirks = true;
                        self.transition_to(State::Data);
                        let error = self
                            .error_token(ParseErrorKind::AbruptDoctypePublicIdentifier, span);
                        Some(Emit::pair(error, doctype.token(self.idx)))
                    }
                    0 => {
                        let span = Span::new(pos, pos + 1);
                        Some(Emit::one(
                            self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                        ))
                    }
                    _ => {
                        doctype.note_extra(quote, self.idx);
                        self.transition_to(State::AfterDoctypePublicIdentifier(doctype));
                        None
                    }
                }
            }
        }
    }

    pub(super) fn step_after_doctype_public_identifier(
        &mut self,
        src: &[u8],
        mut doctype: DoctypeState,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_doctype(src, doctype);
        };
        if super::input::is_whitespace(byte) {
            self.transition_to(State::BetweenDoctypePublicAndSystemIdentifiers(doctype));
            return None;
        }
        match byte {
            b'>' => {
                self.transition_to(State::Data);
                Some(Emit::one(doctype.token(self.idx)))
            }
            b'"' | b'\'' => {
                let span = Span::new(self.idx - 1, self.idx);
                let next = if byte == b'"' {
                    State::DoctypeSystemIdentifierDoubleQuoted {
                        doctype,
                        quote: self.idx - 1,
                    }
                } else {
                    State::DoctypeSystemIdentifierSingleQuoted {
                        doctype,
                        quote: self.idx - 1,
                    }
                };
                self.transition_to(next);
                Some(Emit::one(self.error_token(
                    ParseErrorKind::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                    span,
                )))
            }
            _ => {
                let span = Span::new(self.idx - 1, self.idx);
                doctype.force_quirks = true;
                self.reconsume();
                self.transition_to(State::BogusDoctype(doctype));
                Some(Emit::one(self.error_token(
                    ParseErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier,
                    span,
                )))
            }
        }
    }

    pub(super) fn step_between_doctype_public_and_system_identifiers(
        &mut self,
        src: &[u8],
        mut doctype: DoctypeState,
    ) -> Option<Emit> {
        self.skip_whitespace(src);
        let Some(byte) = self.consume(src) else {
            return self.eof_in_doctype(src, doctype);
        };
        match byte {
            b'>' => {
                self.transition_to(State::Data);
                Some(Emit::one(doctype.token(self.idx)))
            }
            b'"' => {
                self.transition_to(State::DoctypeSystemIdentifierDoubleQuoted {
                    doctype,
                    quote: self.idx - 1,
                });
                None
            }
            b'\'' => {
                self.transition_to(State::DoctypeSystemIdentifierSingleQuoted {
                    doctype,
                    quote: self.idx - 1,
                });
                None
            }
            _ => {
                let span = Span::new(self.idx - 1, self.idx);
                doctype.force_quirks = true;
                self.reconsume();
                self.transition_to(State::BogusDoctype(doctype));
                Some(Emit::one(self.error_token(
                    ParseErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier,
                    span,
                )))
            }
        }
    }

    pub(super) fn step_after_doctype_system_keyword(
        &mut self,
        src: &[u8],
        mut doctype: DoctypeState,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_doctype(src, doctype);
        };
        if super::input::is_whitespace(byte) {
            self.transition_to(State::BeforeDoctypeSystemIdentifier(doctype));
            return None;
        }
        match byte {
            b'"' | b'\'' => {
                let span = Span::new(self.idx - 1, self.idx);
                let next = if byte == b'"' {
                    State::DoctypeSystemIdentifierDoubleQuoted {
                        doctype,
                        quote: self.idx - 1,
                    }
                } else {
                    State::DoctypeSystemIdentifierSingleQuoted {
                        doctype,
                        quote: self.idx - 1,
                    }
                };
                self.transition_to(next);
                Some(Emit::one(self.error_token(
                    ParseErrorKind::MissingWhitespaceAfterDoctypeSystemKeyword,
                    span,
                )))
            }
            b'>' => {
                let span = Span::new(self.idx - 1, self.idx);
                doctype.force_quirks = true;
                self.transition_to(State::Data);
                let error =
                    self.error_token(ParseErrorKind::MissingDoctypeSystemIdentifier, span);
                Some(Emit::pair(error, doctype.token(self.idx)))
            }
            _ => {
                let span = Span::new(self.idx - 1, self.idx);
                doctype.force_quirks = true;
                self.reconsume();
                self.transition_to(State::BogusDoctype(doctype));
                Some(Emit::one(self.error_token(
                    ParseErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier,
                    span,
                )))
            }
        }
    }

    pub(super) fn step_before_doctype_system_identifier(
        &mut self,
        src: &[u8],
        mut doctype: DoctypeState,
    ) -> Option<Emit> {
        self.skip_whitespace(src);
        let Some(byte) = self.consume(src) else {
            return self.eof_in_doctype(src, doctype);
        };
        match byte {
            b'"' => {
                self.transition_to(State::DoctypeSystemIdentifierDoubleQuoted {
                    doctype,
                    quote: self.idx - 1,
                });
                None
            }
            b'\'' => {
                self.transition_to(State::DoctypeSystemIdentifierSingleQuoted {
                    doctype,
                    quote: self.idx - 1,
                });
                None
            }
            b'>' => {
                let span = Span::new(self.idx - 1, self.idx);
                doctype.force_quirks = true;
                self.transition_to(State::Data);
                let error =
                    self.error_token(ParseErrorKind::MissingDoctypeSystemIdentifier, span);
                Some(Emit::pair(error, doctype.token(self.idx)))
            }
            _ => {
                let span = Span::new(self.idx - 1, self.idx);
                doctype.force_quirks = true;
                self.reconsume();
                self.transition_to(State::BogusDoctype(doctype));
                Some(Emit::one(self.error_token(
                    ParseErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier,
                    span,
                )))
            }
        }
    }

    pub(super) fn step_doctype_system_identifier(
        &mut self,
        src: &[u8],
        mut doctype: DoctypeState,
        quote: usize,
        quote_byte: u8,
    ) -> Option<Emit> {
        match memchr::memchr3(quote_byte, b'>', 0, &src[self.idx..]) {
            None => {
                self.idx = src.len();
                doctype.note_extra(quote, src.len());
                self.eof_in_doctype(src, doctype)
            }
            Some(rel) => {
                let pos = self.idx + rel;
                self.idx = pos + 1;
                match src[pos] {
                    b'>' => {
                        let span = Span::new(pos, pos + 1);
                        doctype.note_extra(quote, pos);
                        doctype.force_quirks = true;
                        self.transition_to(State::Data);
                        let error = self
                            .error_token(ParseErrorKind::AbruptDoctypeSystemIdentifier, span);
                        Some(Emit::pair(error, doctype.token(self.idx)))
                    }
                    0 => {
                        let span = Span::new(pos, pos + 1);
                        Some(Emit::one(
                            self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                        ))
                    }
                    _ => {
                        doctype.note_extra(quote, self.idx);
                        self.transition_to(State::AfterDoctypeSystemIdentifier(doctype));
                        None
                    }
                }
            }
        }
    }

    pub(super) fn step_after_doctype_system_identifier(
        &mut self,
        src: &[u8],
        doctype: DoctypeState,
    ) -> Option<Emit> {
        self.skip_whitespace(src);
        let Some(byte) = self.consume(src) else {
            return self.eof_in_doctype(src, doctype);
        };
        match byte {
            b'>' => {
                self.transition_to(State::Data);
                Some(Emit::one(doctype.token(self.idx)))
            }
            _ => {
                // Trailing junk is skipped without forcing quirks.
                let span = Span::new(self.idx - 1, self.idx);
                self.reconsume();
                self.transition_to(State::BogusDoctype(doctype));
                Some(Emit::one(self.error_token(
                    ParseErrorKind::UnexpectedCharacterAfterDoctypeSystemIdentifier,
                    span,
                )))
            }
        }
    }

    pub(super) fn step_bogus_doctype(
        &mut self,
        src: &[u8],
        doctype: DoctypeState,
    ) -> Option<Emit> {
        match memchr::memchr2(b'>', 0, &src[self.idx..]) {
            None => {
                self.idx = src.len();
                self.transition_to(State::Eof);
                Some(Emit::one(doctype.token(src.len())))
            }
            Some(rel) => {
                let pos = self.idx + rel;
                self.idx = pos + 1;
                if src[pos] == b'>' {
                    self.transition_to(State::Data);
                    Some(Emit::one(doctype.token(self.idx)))
                } else {
                    let span = Span::new(pos, pos + 1);
                    Some(Emit::one(
                        self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                    ))
                }
            }
        }
    }
}
