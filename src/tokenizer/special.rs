//! Special text content modes: RCDATA, RAWTEXT, script data, PLAINTEXT.
//!
//! Entered through the `enter_*` methods after the host parser consumes the
//! corresponding start tag. Each mode accumulates one text run and exits only
//! on an appropriate end tag, i.e. one matching `last_start_tag_name`
//! case-insensitively; anything else is literal text. The preceding run is
//! trimmed of ASCII whitespace on both ends before emission and dropped if
//! nothing remains.
//!
//! Script data additionally recognizes the `<!--` escape and the
//! `<script>`-in-comment double escape, where only a nested `</script>`
//! returns to the escaped state. PLAINTEXT is terminal and swallows the rest
//! of the input.

use crate::error::ParseErrorKind;
use crate::span::Span;
use crate::token::Token;
use crate::tokenizer::input::{is_whitespace, trimmed_span};
use crate::tokenizer::state::{State, TagState};
use crate::tokenizer::{Emit, Tokenizer};

/// Which special mode a shared handler is serving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Kind {
    Rcdata,
    Rawtext,
    ScriptData,
    ScriptEscaped,
}

impl Kind {
    fn data_state(self, start: usize) -> State {
        match self {
            Kind::Rcdata => State::Rcdata { start },
            Kind::Rawtext => State::Rawtext { start },
            Kind::ScriptData => State::ScriptData { start },
            Kind::ScriptEscaped => State::ScriptDataEscaped { start },
        }
    }

    fn less_than_state(self, start: usize, lt: usize) -> State {
        match self {
            Kind::Rcdata => State::RcdataLessThanSign { start, lt },
            Kind::Rawtext => State::RawtextLessThanSign { start, lt },
            Kind::ScriptData => State::ScriptDataLessThanSign { start, lt },
            Kind::ScriptEscaped => State::ScriptDataEscapedLessThanSign { start, lt },
        }
    }

    fn end_tag_name_state(self, start: usize, lt: usize, name_start: usize) -> State {
        match self {
            Kind::Rcdata => State::RcdataEndTagName {
                start,
                lt,
                name_start,
            },
            Kind::Rawtext => State::RawtextEndTagName {
                start,
                lt,
                name_start,
            },
            Kind::ScriptData => State::ScriptDataEndTagName {
                start,
                lt,
                name_start,
            },
            Kind::ScriptEscaped => State::ScriptDataEscapedEndTagName {
                start,
                lt,
                name_start,
            },
        }
    }

    /// Script modes route a trailing solidus through the self-closing state;
    /// RCDATA and RAWTEXT fall back to before-attribute-name.
    fn solidus_enters_self_closing(self) -> bool {
        matches!(self, Kind::ScriptData | Kind::ScriptEscaped)
    }
}

impl Tokenizer {
    /// Emit the (trimmed) run accumulated since `start` and stop.
    fn finish_special_text(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        self.transition_to(State::Eof);
        trimmed_span(src, start, src.len()).map(|span| Emit::one(Token::Text { span }))
    }

    fn eof_in_script_comment_like(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        let salvage = trimmed_span(src, start, src.len()).map(|span| Token::Text { span });
        self.eof_error(
            ParseErrorKind::EofInScriptHtmlCommentLikeText,
            Span::empty(src.len()),
            salvage,
        )
    }

    pub(super) fn step_special_data(
        &mut self,
        src: &[u8],
        start: usize,
        kind: Kind,
    ) -> Option<Emit> {
        match memchr::memchr2(b'<', 0, &src[self.idx..]) {
            None => {
                self.idx = src.len();
                self.finish_special_text(src, start)
            }
            Some(rel) => {
                let pos = self.idx + rel;
                self.idx = pos + 1;
                if src[pos] == b'<' {
                    self.transition_to(kind.less_than_state(start, pos));
                    None
                } else {
                    // Flagged; the byte stays in the text run.
                    let span = Span::new(pos, pos + 1);
                    Some(Emit::one(
                        self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                    ))
                }
            }
        }
    }

    pub(super) fn step_special_less_than_sign(
        &mut self,
        src: &[u8],
        start: usize,
        lt: usize,
        kind: Kind,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            self.transition_to(kind.data_state(start));
            return None;
        };
        if byte == b'/' {
            let next = match kind {
                Kind::Rcdata => State::RcdataEndTagOpen { start, lt },
                Kind::Rawtext => State::RawtextEndTagOpen { start, lt },
                Kind::ScriptData => State::ScriptDataEndTagOpen { start, lt },
                Kind::ScriptEscaped => State::ScriptDataEscapedEndTagOpen { start, lt },
            };
            self.transition_to(next);
        } else {
            self.reconsume();
            self.transition_to(kind.data_state(start));
        }
        None
    }

    pub(super) fn step_special_end_tag_open(
        &mut self,
        src: &[u8],
        start: usize,
        lt: usize,
        kind: Kind,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            self.transition_to(kind.data_state(start));
            return None;
        };
        self.reconsume();
        if byte.is_ascii_alphabetic() {
            self.transition_to(kind.end_tag_name_state(start, lt, self.idx));
        } else {
            self.transition_to(kind.data_state(start));
        }
        None
    }

    pub(super) fn step_special_end_tag_name(
        &mut self,
        src: &[u8],
        start: usize,
        lt: usize,
        name_start: usize,
        kind: Kind,
    ) -> Option<Emit> {
        self.skip_letters(src);
        let name_end = self.idx;
        let Some(byte) = self.consume(src) else {
            // Unterminated end-tag candidate: the run continues to EOF.
            self.transition_to(kind.data_state(start));
            return None;
        };
        let appropriate = self.is_appropriate_end_tag(&src[name_start..name_end]);
        let is_delimiter = is_whitespace(byte) || byte == b'/' || byte == b'>';
        if !(appropriate && is_delimiter) {
            // Not an end of this mode; reprocess the byte as literal text.
            self.reconsume();
            self.transition_to(kind.data_state(start));
            return None;
        }

        let mut tag = TagState::open(lt, name_start, true);
        tag.name_end = name_end;
        let text = trimmed_span(src, start, lt).map(|span| Token::Text { span });

        if byte == b'>' {
            self.transition_to(State::Data);
            let terminal = if self.return_attrs {
                Token::TagName { name: tag.name() }
            } else {
                tag.token(self.idx, false)
            };
            return Some(match text {
                Some(text) => Emit::pair(text, terminal),
                None => Emit::one(terminal),
            });
        }

        if byte == b'/' {
            // Trailing solidus on a matching end tag: flagged, then the tag
            // continues through the regular tag states.
            tag.name_pending = true;
            let solidus = Span::new(self.idx - 1, self.idx);
            let next = if kind.solidus_enters_self_closing() {
                State::SelfClosingStartTag(tag)
            } else {
                State::BeforeAttributeName(tag)
            };
            self.transition_to(next);
            let error = self.error_token(ParseErrorKind::EndTagWithTrailingSolidus, solidus);
            return Some(match text {
                Some(text) => Emit::pair(text, error),
                None => Emit::one(error),
            });
        }

        // Whitespace: the end tag continues in before-attribute-name.
        tag.name_pending = true;
        self.transition_to(State::BeforeAttributeName(tag));
        text.map(Emit::one)
    }

    pub(super) fn step_script_data_less_than_sign(
        &mut self,
        src: &[u8],
        start: usize,
        lt: usize,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            self.transition_to(State::ScriptData { start });
            return None;
        };
        match byte {
            b'/' => self.transition_to(State::ScriptDataEndTagOpen { start, lt }),
            b'!' => self.transition_to(State::ScriptDataEscapeStart { start }),
            _ => {
                self.reconsume();
                self.transition_to(State::ScriptData { start });
            }
        }
        None
    }

    pub(super) fn step_script_data_escape_start(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            self.transition_to(State::ScriptData { start });
            return None;
        };
        if byte == b'-' {
            self.transition_to(State::ScriptDataEscapeStartDash { start });
        } else {
            self.reconsume();
            self.transition_to(State::ScriptData { start });
        }
        None
    }

    pub(super) fn step_script_data_escape_start_dash(
        &mut self,
        src: &[u8],
        start: usize,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            self.transition_to(State::ScriptData { start });
            return None;
        };
        if byte == b'-' {
            self.transition_to(State::ScriptDataEscapedDashDash { start });
        } else {
            self.reconsume();
            self.transition_to(State::ScriptData { start });
        }
        None
    }

    pub(super) fn step_script_data_escaped(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        match memchr::memchr3(b'-', b'<', 0, &src[self.idx..]) {
            None => {
                self.idx = src.len();
                self.eof_in_script_comment_like(src, start)
            }
            Some(rel) => {
                let pos = self.idx + rel;
                self.idx = pos + 1;
                match src[pos] {
                    b'-' => {
                        self.transition_to(State::ScriptDataEscapedDash { start });
                        None
                    }
                    b'<' => {
                        self.transition_to(State::ScriptDataEscapedLessThanSign {
                            start,
                            lt: pos,
                        });
                        None
                    }
                    _ => {
                        let span = Span::new(pos, pos + 1);
                        Some(Emit::one(
                            self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                        ))
                    }
                }
            }
        }
    }

    pub(super) fn step_script_data_escaped_dash(
        &mut self,
        src: &[u8],
        start: usize,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_script_comment_like(src, start);
        };
        match byte {
            b'-' => {
                self.transition_to(State::ScriptDataEscapedDashDash { start });
                None
            }
            b'<' => {
                self.transition_to(State::ScriptDataEscapedLessThanSign {
                    start,
                    lt: self.idx - 1,
                });
                None
            }
            0 => {
                let span = Span::new(self.idx - 1, self.idx);
                self.transition_to(State::ScriptDataEscaped { start });
                Some(Emit::one(
                    self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                ))
            }
            _ => {
                self.transition_to(State::ScriptDataEscaped { start });
                None
            }
        }
    }

    pub(super) fn step_script_data_escaped_dash_dash(
        &mut self,
        src: &[u8],
        start: usize,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_script_comment_like(src, start);
        };
        match byte {
            b'-' => None, // further dashes extend the `--` run
            b'<' => {
                self.transition_to(State::ScriptDataEscapedLessThanSign {
                    start,
                    lt: self.idx - 1,
                });
                None
            }
            b'>' => {
                // `-->` leaves the escape back into plain script data.
                self.transition_to(State::ScriptData { start });
                None
            }
            0 => {
                let span = Span::new(self.idx - 1, self.idx);
                self.transition_to(State::ScriptDataEscaped { start });
                Some(Emit::one(
                    self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                ))
            }
            _ => {
                self.transition_to(State::ScriptDataEscaped { start });
                None
            }
        }
    }

    pub(super) fn step_script_data_escaped_less_than_sign(
        &mut self,
        src: &[u8],
        start: usize,
        lt: usize,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            self.transition_to(State::ScriptDataEscaped { start });
            return None;
        };
        if byte == b'/' {
            self.transition_to(State::ScriptDataEscapedEndTagOpen { start, lt });
            return None;
        }
        self.reconsume();
        if byte.is_ascii_alphabetic() {
            self.transition_to(State::ScriptDataDoubleEscapeStart {
                start,
                name_start: self.idx,
            });
        } else {
            self.transition_to(State::ScriptDataEscaped { start });
        }
        None
    }

    pub(super) fn step_script_data_double_escape_start(
        &mut self,
        src: &[u8],
        start: usize,
        name_start: usize,
    ) -> Option<Emit> {
        self.skip_letters(src);
        let name_end = self.idx;
        let Some(byte) = self.consume(src) else {
            self.transition_to(State::ScriptDataEscaped { start });
            return None;
        };
        if is_whitespace(byte) || byte == b'/' || byte == b'>' {
            // An inner `<script` inside the escape turns the content double
            // escaped; anything else stays singly escaped.
            let next = if src[name_start..name_end].eq_ignore_ascii_case(b"script") {
                State::ScriptDataDoubleEscaped { start }
            } else {
                State::ScriptDataEscaped { start }
            };
            self.transition_to(next);
        } else {
            self.reconsume();
            self.transition_to(State::ScriptDataEscaped { start });
        }
        None
    }

    pub(super) fn step_script_data_double_escaped(
        &mut self,
        src: &[u8],
        start: usize,
    ) -> Option<Emit> {
        match memchr::memchr3(b'-', b'<', 0, &src[self.idx..]) {
            None => {
                self.idx = src.len();
                self.eof_in_script_comment_like(src, start)
            }
            Some(rel) => {
                let pos = self.idx + rel;
                self.idx = pos + 1;
                match src[pos] {
                    b'-' => {
                        self.transition_to(State::ScriptDataDoubleEscapedDash { start });
                        None
                    }
                    b'<' => {
                        self.transition_to(State::ScriptDataDoubleEscapedLessThanSign {
                            start,
                            lt: pos,
                        });
                        None
                    }
                    _ => {
                        let span = Span::new(pos, pos + 1);
                        Some(Emit::one(
                            self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                        ))
                    }
                }
            }
        }
    }

    pub(super) fn step_script_data_double_escaped_dash(
        &mut self,
        src: &[u8],
        start: usize,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_script_comment_like(src, start);
        };
        match byte {
            b'-' => {
                self.transition_to(State::ScriptDataDoubleEscapedDashDash { start });
                None
            }
            b'<' => {
                self.transition_to(State::ScriptDataDoubleEscapedLessThanSign {
                    start,
                    lt: self.idx - 1,
                });
                None
            }
            0 => {
                let span = Span::new(self.idx - 1, self.idx);
                self.transition_to(State::ScriptDataDoubleEscaped { start });
                Some(Emit::one(
                    self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                ))
            }
            _ => {
                self.transition_to(State::ScriptDataDoubleEscaped { start });
                None
            }
        }
    }

    pub(super) fn step_script_data_double_escaped_dash_dash(
        &mut self,
        src: &[u8],
        start: usize,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            return self.eof_in_script_comment_like(src, start);
        };
        match byte {
            b'-' => None,
            b'<' => {
                self.transition_to(State::ScriptDataDoubleEscapedLessThanSign {
                    start,
                    lt: self.idx - 1,
                });
                None
            }
            b'>' => {
                self.transition_to(State::ScriptData { start });
                None
            }
            0 => {
                let span = Span::new(self.idx - 1, self.idx);
                self.transition_to(State::ScriptDataDoubleEscaped { start });
                Some(Emit::one(
                    self.error_token(ParseErrorKind::UnexpectedNullCharacter, span),
                ))
            }
            _ => {
                self.transition_to(State::ScriptDataDoubleEscaped { start });
                None
            }
        }
    }

    pub(super) fn step_script_data_double_escaped_less_than_sign(
        &mut self,
        src: &[u8],
        start: usize,
        _lt: usize,
    ) -> Option<Emit> {
        let Some(byte) = self.consume(src) else {
            self.transition_to(State::ScriptDataDoubleEscaped { start });
            return None;
        };
        if byte == b'/' {
            self.transition_to(State::ScriptDataDoubleEscapeEnd {
                start,
                name_start: self.idx,
            });
        } else {
            self.reconsume();
            self.transition_to(State::ScriptDataDoubleEscaped { start });
        }
        None
    }

    pub(super) fn step_script_data_double_escape_end(
        &mut self,
        src: &[u8],
        start: usize,
        name_start: usize,
    ) -> Option<Emit> {
        self.skip_letters(src);
        let name_end = self.idx;
        let Some(byte) = self.consume(src) else {
            self.transition_to(State::ScriptDataDoubleEscaped { start });
            return None;
        };
        if is_whitespace(byte) || byte == b'/' || byte == b'>' {
            let next = if src[name_start..name_end].eq_ignore_ascii_case(b"script") {
                State::ScriptDataEscaped { start }
            } else {
                State::ScriptDataDoubleEscaped { start }
            };
            self.transition_to(next);
        } else {
            self.reconsume();
            self.transition_to(State::ScriptDataDoubleEscaped { start });
        }
        None
    }

    pub(super) fn step_plaintext(&mut self, src: &[u8], start: usize) -> Option<Emit> {
        // Terminal mode: the rest of the input is plain text, surfaced as a
        // single diagnostic spanning the whole region.
        self.idx = src.len();
        let span = Span::new(start, src.len());
        self.transition_to(State::Eof);
        Some(Emit::one(
            self.error_token(ParseErrorKind::DeprecatedAndUnsupported, span),
        ))
    }
}
