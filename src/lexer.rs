//! SQL tokenizer using nom.
//!
//! Splits a statement into words, literals and punctuation. Each token
//! keeps its byte span so callers can slice the original text back out
//! (predicate text is carried verbatim, never re-printed from tokens).
//!
//! The lexer never fails: anything it does not recognise becomes a
//! one-character `Operator` token, and an unterminated quote runs to the
//! end of input.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{anychar, char, digit1},
    combinator::{opt, recognize, value},
    sequence::pair,
    IResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Keyword or bare identifier.
    Word,
    /// `"ident"` or `` `ident` ``.
    QuotedIdent,
    /// `'string'`, with `''` as the escaped quote.
    Str,
    Number,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Dot,
    Star,
    Operator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl Token<'_> {
    /// Case-insensitive keyword test. Only bare words can be keywords.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }

    /// Identifier-like: a bare or quoted word.
    pub fn is_name(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::QuotedIdent)
    }
}

/// Tokenize `source`. Comments must already be stripped.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = source;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let start = source.len() - rest.len();
        let Ok((next, kind)) = parse_token(rest) else {
            break;
        };
        let end = source.len() - next.len();
        tokens.push(Token {
            kind,
            text: &source[start..end],
            start,
            end,
        });
        rest = next;
    }

    tokens
}

/// The first token of `source`, without tokenizing the rest.
pub fn first_token(source: &str) -> Option<Token<'_>> {
    let rest = source.trim_start();
    let start = source.len() - rest.len();
    let (next, kind) = parse_token(rest).ok()?;
    let end = source.len() - next.len();
    Some(Token {
        kind,
        text: &source[start..end],
        start,
        end,
    })
}

/// Remove `-- line` and `/* block */` comments outside of quotes.
///
/// Line comments keep their newline and block comments become a single
/// space, so neighbouring tokens stay separated.
pub fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            result.push(c);
            if c == q {
                quote = None;
            }
        } else if c == '\'' || c == '"' || c == '`' {
            quote = Some(c);
            result.push(c);
        } else if c == '-' && chars.peek() == Some(&'-') {
            for nc in chars.by_ref() {
                if nc == '\n' {
                    result.push('\n');
                    break;
                }
            }
        } else if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            while let Some(nc) = chars.next() {
                if nc == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    break;
                }
            }
            result.push(' ');
        } else {
            result.push(c);
        }
    }

    result
}

fn parse_token(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::Str, quoted('\'')),
        value(TokenKind::QuotedIdent, quoted('"')),
        value(TokenKind::QuotedIdent, quoted('`')),
        value(TokenKind::Number, parse_number),
        value(TokenKind::Word, parse_word),
        value(TokenKind::LParen, char('(')),
        value(TokenKind::RParen, char(')')),
        value(TokenKind::Comma, char(',')),
        value(TokenKind::Semicolon, char(';')),
        value(TokenKind::Dot, char('.')),
        value(TokenKind::Star, char('*')),
        value(TokenKind::Operator, parse_operator),
    ))(input)
}

/// A quoted run; a doubled quote character is an escaped quote.
fn quoted<'a>(quote: char) -> impl Fn(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        let (mut rest, _) = char::<_, nom::error::Error<&'a str>>(quote)(input)?;
        let width = quote.len_utf8();
        loop {
            match rest.find(quote) {
                Some(i) => {
                    let after = &rest[i + width..];
                    if after.starts_with(quote) {
                        rest = &after[width..];
                    } else {
                        rest = after;
                        break;
                    }
                }
                None => {
                    rest = "";
                    break;
                }
            }
        }
        let len = input.len() - rest.len();
        Ok((rest, &input[..len]))
    }
}

fn parse_number(input: &str) -> IResult<&str, &str> {
    recognize(pair(digit1, opt(pair(char('.'), digit1))))(input)
}

fn parse_word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '$' || c == '@' || c == '#')(input)
}

fn parse_operator(input: &str) -> IResult<&str, &str> {
    alt((
        tag("<="),
        tag(">="),
        tag("<>"),
        tag("!="),
        tag("||"),
        tag("::"),
        recognize(anychar),
    ))(input)
}
