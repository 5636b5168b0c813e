//! Cross-cutting properties that must hold for arbitrary inputs.

use html_lexer::{Token, Tokenizer, tokenize};

const CORPUS: &[&[u8]] = &[
    b"",
    b"plain text only",
    b"  leading and trailing  ",
    b"<p>hi</p>",
    b"<img src=\"a.png\"/>",
    b"<p class=foo bar baz=\"q\" x='y'>",
    b"<!-- x -->",
    b"<!-->",
    b"<!--a--!>",
    b"<!--a<!--b-->",
    b"<!DOCTYPE html>",
    b"<!DOCTYPE html PUBLIC \"a\" \"b\">",
    b"<!DOCTYPE>",
    b"<![CDATA[x]]>",
    b"<![CDATA[x",
    b"<",
    b"</",
    b"</>",
    b"<!",
    b"<?pi?>",
    b"<1>",
    b"<x<y>",
    b"<p a=>",
    b"<p / x>",
    b"<p a=\"unterminated",
    b"<p class",
    b"a\0b",
    b"<p>\0</p>",
    b"text<><p><</p>",
];

fn walk_spans(token: &Token) -> Vec<html_lexer::Span> {
    let mut spans = vec![token.span()];
    match token {
        Token::Tag(tag) => spans.push(tag.name),
        Token::Attr(attr) => {
            if let Some(value) = attr.value {
                spans.push(value.span);
            }
        }
        Token::Doctype(doctype) => {
            spans.extend(doctype.name);
            spans.push(doctype.extra);
        }
        _ => {}
    }
    spans
}

#[test]
fn every_span_is_bounded_and_ordered() {
    for src in CORPUS {
        for token in tokenize(src) {
            for span in walk_spans(&token) {
                assert!(
                    span.start <= span.end && span.end <= src.len(),
                    "span {span:?} out of bounds for input {:?} (token {token:?})",
                    String::from_utf8_lossy(src)
                );
            }
        }
    }
}

#[test]
fn non_error_tokens_start_in_source_order() {
    for src in CORPUS {
        let starts: Vec<usize> = tokenize(src)
            .iter()
            .filter(|token| !token.is_parse_error())
            .map(|token| token.span().start)
            .collect();
        assert!(
            starts.windows(2).all(|pair| pair[0] <= pair[1]),
            "token starts went backwards for input {:?}: {starts:?}",
            String::from_utf8_lossy(src)
        );
    }
}

#[test]
fn byte_equal_inputs_emit_byte_equal_token_sequences() {
    for src in CORPUS {
        assert_eq!(
            tokenize(src),
            tokenize(src),
            "two runs diverged for input {:?}",
            String::from_utf8_lossy(src)
        );
    }
}

#[test]
fn next_terminates_within_a_linear_call_budget() {
    for src in CORPUS {
        let mut tokenizer = Tokenizer::new();
        let mut calls = 0usize;
        let budget = 2 * src.len() + 8;
        while tokenizer.next(src).is_some() {
            calls += 1;
            assert!(
                calls <= budget,
                "tokenizer exceeded {budget} calls on input {:?}",
                String::from_utf8_lossy(src)
            );
        }
    }
}

#[test]
fn exhausted_tokenizer_stays_exhausted() {
    for src in CORPUS {
        let mut tokenizer = Tokenizer::new();
        while tokenizer.next(src).is_some() {}
        for _ in 0..3 {
            assert_eq!(
                tokenizer.next(src),
                None,
                "tokenizer woke up again on input {:?}",
                String::from_utf8_lossy(src)
            );
        }
    }
}

#[test]
fn attribute_mode_matches_tag_mode_on_text_and_errors() {
    // The two emission granularities must agree on everything that is not
    // tag-shaped: text runs, comments, doctypes, and the error stream.
    for src in CORPUS {
        let plain: Vec<Token> = tokenize(src)
            .into_iter()
            .filter(|token| {
                matches!(
                    token,
                    Token::Text { .. }
                        | Token::Comment { .. }
                        | Token::Doctype(_)
                        | Token::ParseError(_)
                )
            })
            .collect();
        let mut tokenizer = Tokenizer::with_attrs();
        let mut attrs = Vec::new();
        while let Some(token) = tokenizer.next(src) {
            if matches!(
                token,
                Token::Text { .. } | Token::Comment { .. } | Token::Doctype(_) | Token::ParseError(_)
            ) {
                attrs.push(token);
            }
        }
        assert_eq!(
            plain,
            attrs,
            "granularities diverged for input {:?}",
            String::from_utf8_lossy(src)
        );
    }
}

#[test]
fn well_formed_bytes_are_covered_by_emitted_spans() {
    // Trimmed whitespace and inter-attribute whitespace may stay uncovered;
    // everything else must be accounted for by some emitted span.
    let docs: &[&[u8]] = &[
        b"<p>hi</p>",
        b"<div class=\"a\"><br/>text here</div>",
        b"<!-- c --><!DOCTYPE html><p>x</p>",
        b"<![CDATA[payload]]>",
    ];
    for src in docs {
        let mut covered = vec![false; src.len()];
        for token in tokenize(src) {
            let span = token.span();
            for flag in &mut covered[span.start..span.end] {
                *flag = true;
            }
        }
        for (offset, byte) in src.iter().enumerate() {
            if byte.is_ascii_whitespace() {
                continue;
            }
            assert!(
                covered[offset],
                "byte {offset} ({:?}) uncovered in {:?}",
                *byte as char,
                String::from_utf8_lossy(src)
            );
        }
    }
}

#[test]
fn emitted_text_spans_reslice_to_the_expected_bytes() {
    let src = b"<b>bold</b> and <i> italic </i>";
    let texts: Vec<&[u8]> = tokenize(src)
        .iter()
        .filter_map(|token| match token {
            Token::Text { span } => Some(span.of(src)),
            _ => None,
        })
        .collect();
    assert_eq!(
        texts,
        [b"bold".as_slice(), b"and".as_slice(), b"italic".as_slice()],
    );
}
