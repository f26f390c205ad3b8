use regex::Regex;
use std::fmt;

#[derive(Debug, Eq, PartialEq)]
pub enum Token<'a> {
    OpenRound,
    CloseRound,
    OpenBrace,
    CloseBrace,
    StringLiteral(&'a str),
    Comment(&'a str),
    PlainChars(&'a str),
}

#[derive(Debug)]
pub enum TokenizerError {
    NoFirstCharacter,
    UnbalancedString,
    NoCapture(String),
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tokenizer failed: {}",
            match self {
                TokenizerError::NoFirstCharacter => "no characters to parse token from",
                TokenizerError::UnbalancedString => "unbalanced string literal",
                TokenizerError::NoCapture(_) => "token regex did not capture a token",
            }
        )
    }
}

fn create_token(captured: &str) -> Result<Token, TokenizerError> {
    let bytes = captured.as_bytes();
    let first_char = bytes.first().ok_or(TokenizerError::NoFirstCharacter)?;
    match first_char {
        b'(' => Ok(Token::OpenRound),
        b')' => Ok(Token::CloseRound),
        b'{' => Ok(Token::OpenBrace),
        b'}' => Ok(Token::CloseBrace),
        // String literal
        b'"' => tokenize_string_literal(captured),
        // Comment. Note that ; is ASCII so safe to slice on bytes even if the
        // rest of the string is non ASCII.
        b';' => Ok(Token::Comment(&captured[1..])),
        _ => Ok(Token::PlainChars(captured)),
    }
}

fn tokenize_string_literal(captured: &str) -> Result<Token, TokenizerError> {
    let bytes = captured.as_bytes();
    if bytes.len() == 1 || bytes[bytes.len() - 1] != b'"' {
        return Err(TokenizerError::UnbalancedString);
    }

    let trailing_backslashes = bytes
        .iter()
        .rev()
        .skip(1)
        .take_while(|&&byte| byte == b'\\')
        .count();
    if trailing_backslashes % 2 == 1 {
        return Err(TokenizerError::UnbalancedString);
    }

    Ok(Token::StringLiteral(&captured[1..captured.len() - 1]))
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizerError> {
    lazy_static! {
        static ref TOKEN_RE: Regex = Regex::new(
            r#"(?x)                      # ignore whitespace in this pattern & allow comments
                \s*                      # leading whitespace, ignored
                (                        # token capture group
                    [(){}]               # single delimiter characters
                    |"(?:                # string literal. its contents, not captured, include:
                        \\.              #    escapes
                        |[^\\"]          #    anything which isn't a backslash or a quote
                      )*
                      "?                 #    possibly missing a closing quote
                    |;[^\r\n]*           # comments
                    |[^\s(){}";]*        # zero or more plain characters
                )
                \s*                      # trailing whitespace, ignored
            "#
        )
        .unwrap();
    }
    let mut remaining = input;
    let mut tokens = Vec::new();
    while !remaining.is_empty() {
        let caps = TOKEN_RE
            .captures(remaining)
            .ok_or_else(|| TokenizerError::NoCapture(String::from(remaining)))?;
        let (captured, consumed) = match (caps.get(1), caps.get(0)) {
            (Some(token), Some(whole)) => (token.as_str(), whole.end()),
            _ => return Err(TokenizerError::NoCapture(String::from(remaining))),
        };
        // An empty capture means the rest of the input was pure whitespace.
        if !captured.is_empty() {
            tokens.push(create_token(captured)?);
        }
        remaining = &remaining[consumed..];
    }
    Ok(tokens)
}
