use crate::strings::{self, BuildError};
use crate::tokens::{tokenize, Token, TokenizerError};
use std::fmt;
use std::iter::Peekable;
use std::slice;

type Tokens<'a, 'b> = Peekable<slice::Iter<'a, Token<'b>>>;

/// One node of the syntax tree handed to the AST adapter. Numbers stay as
/// raw text here; the adapter owns base-10 parsing and its failure mode.
#[derive(Debug, PartialEq)]
pub enum Form {
    Number(String),
    Symbol(String),
    String(String),
    Call(Vec<Form>),
    Quoted(Vec<Form>),
    Toplevel(Vec<Form>),
}

#[derive(Debug)]
pub enum Error {
    Tokenizer(TokenizerError),
    NoMoreTokens,
    UnclosedSequence,
    UnexpectedClose,
    BadEscape(BuildError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Tokenizer(e) => write!(f, "{}", e),
            Error::NoMoreTokens => write!(f, "input ended in the middle of an expression"),
            Error::UnclosedSequence => write!(f, "expression is missing its closing delimiter"),
            Error::UnexpectedClose => write!(f, "closing delimiter with no matching opener"),
            Error::BadEscape(e) => write!(f, "{}", e),
        }
    }
}

/// Parse a whole line or file into its top-level forms.
pub fn read_str(input: &str) -> Result<Vec<Form>, Error> {
    let mut tokens = tokenize(input).map_err(Error::Tokenizer)?;
    tokens.retain(|token| !matches!(token, Token::Comment(_)));
    let mut reader = tokens.iter().peekable();
    let mut forms = Vec::new();
    while reader.peek().is_some() {
        forms.push(read_form(&mut reader)?);
    }
    Ok(forms)
}

fn read_form(reader: &mut Tokens) -> Result<Form, Error> {
    match reader.next() {
        Some(Token::OpenRound) => read_sequence(reader, false),
        Some(Token::OpenBrace) => read_sequence(reader, true),
        Some(Token::CloseRound) | Some(Token::CloseBrace) => Err(Error::UnexpectedClose),
        Some(Token::StringLiteral(raw)) => strings::build_string(raw)
            .map(Form::String)
            .map_err(Error::BadEscape),
        Some(Token::PlainChars(chars)) => Ok(read_atom(chars)),
        Some(Token::Comment(_)) => read_form(reader),
        None => Err(Error::NoMoreTokens),
    }
}

fn read_sequence(reader: &mut Tokens, quoted: bool) -> Result<Form, Error> {
    let mut items = Vec::new();
    loop {
        match reader.peek() {
            Some(Token::CloseRound) if !quoted => {
                reader.next();
                return Ok(Form::Call(items));
            }
            Some(Token::CloseBrace) if quoted => {
                reader.next();
                return Ok(Form::Quoted(items));
            }
            Some(Token::CloseRound) | Some(Token::CloseBrace) => {
                return Err(Error::UnexpectedClose)
            }
            Some(_) => items.push(read_form(reader)?),
            None => return Err(Error::UnclosedSequence),
        }
    }
}

fn read_atom(chars: &str) -> Form {
    let mut rest = chars.chars();
    let numeric = match rest.next() {
        Some('-') => chars.len() > 1 && rest.all(|c| c.is_ascii_digit()),
        Some(c) if c.is_ascii_digit() => rest.all(|c| c.is_ascii_digit()),
        _ => false,
    };
    if numeric {
        Form::Number(String::from(chars))
    } else {
        Form::Symbol(String::from(chars))
    }
}
