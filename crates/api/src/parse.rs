//! Spec expression parser
//!
//! Textual surface for building spec trees and contracts:
//!
//! ```text
//! spec      := union
//! union     := intersect ("|" intersect)*
//! intersect := invert ("&" invert)*
//! invert    := "!" invert | primary
//! primary   := IDENT ("[" spec ("," spec)* "]")? | "(" spec ")"
//!
//! contract  := "(" [arglist] ")" ["->" spec]
//! arglist   := spec ("," spec)* ["," "*" spec] | "*" spec
//! ```
//!
//! Bare identifiers resolve in order: `Any` / `Nothing`, native kind names
//! (`Int`, `Float`, `Str`, ...), then the alias registry. `Array` and
//! `Object` take bracketed element specs. A `*`-marked spec is only legal as
//! the last entry of a contract's argument list.

use conforma_core::{ContainerKind, Spec, SpecError, ValueKind};
use conforma_engine::registry::AliasRegistry;
use conforma_engine::Contract;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while parsing a spec or contract expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A character outside the expression grammar
    #[error("unexpected character `{ch}` at byte {pos}")]
    UnexpectedChar {
        /// The offending character
        ch: char,
        /// Byte offset into the input
        pos: usize,
    },

    /// A well-formed token in an illegal position
    #[error("unexpected `{token}` at byte {pos}")]
    UnexpectedToken {
        /// Rendered token text
        token: String,
        /// Byte offset into the input
        pos: usize,
    },

    /// Input ended mid-expression
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// An identifier that is neither a kind name nor a registered alias
    #[error("unknown type name `{name}`")]
    UnknownName {
        /// The unresolved identifier
        name: String,
    },

    /// A `*`-marked spec somewhere other than the trailing argument position
    #[error("variadic marker is only legal on the last argument")]
    VariadicNotLast,

    /// Bracket parameters on an identifier that is not a container
    #[error("`{name}` does not take element specs")]
    NotAContainer {
        /// The bracketed identifier
        name: String,
    },

    /// Structurally invalid container parametrization
    #[error("invalid container spec: {0}")]
    BadContainer(#[from] SpecError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Pipe,
    Amp,
    Bang,
    Star,
    Comma,
    Arrow,
    LBracket,
    RBracket,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => f.write_str(name),
            Token::Pipe => f.write_str("|"),
            Token::Amp => f.write_str("&"),
            Token::Bang => f.write_str("!"),
            Token::Star => f.write_str("*"),
            Token::Comma => f.write_str(","),
            Token::Arrow => f.write_str("->"),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

fn lex(input: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '|' => {
                chars.next();
                tokens.push((Token::Pipe, pos));
            }
            '&' => {
                chars.next();
                tokens.push((Token::Amp, pos));
            }
            '!' => {
                chars.next();
                tokens.push((Token::Bang, pos));
            }
            '*' => {
                chars.next();
                tokens.push((Token::Star, pos));
            }
            ',' => {
                chars.next();
                tokens.push((Token::Comma, pos));
            }
            '[' => {
                chars.next();
                tokens.push((Token::LBracket, pos));
            }
            ']' => {
                chars.next();
                tokens.push((Token::RBracket, pos));
            }
            '(' => {
                chars.next();
                tokens.push((Token::LParen, pos));
            }
            ')' => {
                chars.next();
                tokens.push((Token::RParen, pos));
            }
            '-' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '>')) => {
                        chars.next();
                        tokens.push((Token::Arrow, pos));
                    }
                    _ => return Err(ParseError::UnexpectedChar { ch: '-', pos }),
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((Token::Ident(ident), pos));
            }
            c => return Err(ParseError::UnexpectedChar { ch: c, pos }),
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    registry: &'a AliasRegistry,
}

impl<'a> Parser<'a> {
    fn new(input: &str, registry: &'a AliasRegistry) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: lex(input)?,
            pos: 0,
            registry,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn bump(&mut self) -> Result<(Token, usize), ParseError> {
        let entry = self.tokens.get(self.pos).cloned().ok_or(ParseError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(entry)
    }

    fn eat(&mut self, expected: &Token) -> Result<(), ParseError> {
        let (token, pos) = self.bump()?;
        if &token == expected {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                token: token.to_string(),
                pos,
            })
        }
    }

    fn at_end(&self) -> bool {
        self.pos == self.tokens.len()
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        match self.tokens.get(self.pos) {
            None => Ok(()),
            Some((token, pos)) => Err(ParseError::UnexpectedToken {
                token: token.to_string(),
                pos: *pos,
            }),
        }
    }

    fn union(&mut self) -> Result<Arc<Spec>, ParseError> {
        let mut spec = self.intersect()?;
        while self.peek() == Some(&Token::Pipe) {
            self.pos += 1;
            let right = self.intersect()?;
            spec = Arc::new(Spec::union(spec, right));
        }
        Ok(spec)
    }

    fn intersect(&mut self) -> Result<Arc<Spec>, ParseError> {
        let mut spec = self.invert()?;
        while self.peek() == Some(&Token::Amp) {
            self.pos += 1;
            let right = self.invert()?;
            spec = Arc::new(Spec::intersection(spec, right));
        }
        Ok(spec)
    }

    fn invert(&mut self) -> Result<Arc<Spec>, ParseError> {
        if self.peek() == Some(&Token::Bang) {
            self.pos += 1;
            let inner = self.invert()?;
            return Ok(Arc::new(Spec::inversion(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Arc<Spec>, ParseError> {
        let (token, pos) = self.bump()?;
        match token {
            Token::LParen => {
                let spec = self.union()?;
                self.eat(&Token::RParen)?;
                Ok(spec)
            }
            Token::Ident(name) => {
                if self.peek() == Some(&Token::LBracket) {
                    self.pos += 1;
                    let kind = match name.as_str() {
                        "Array" => ContainerKind::Array,
                        "Object" => ContainerKind::Object,
                        _ => return Err(ParseError::NotAContainer { name }),
                    };
                    let mut elements = vec![self.union()?];
                    while self.peek() == Some(&Token::Comma) {
                        self.pos += 1;
                        elements.push(self.union()?);
                    }
                    self.eat(&Token::RBracket)?;
                    Ok(Arc::new(Spec::container(kind, elements)?))
                } else {
                    self.resolve(name)
                }
            }
            other => Err(ParseError::UnexpectedToken {
                token: other.to_string(),
                pos,
            }),
        }
    }

    fn resolve(&self, name: String) -> Result<Arc<Spec>, ParseError> {
        match name.as_str() {
            "Any" => Ok(Arc::new(Spec::Any)),
            "Nothing" => Ok(Arc::new(Spec::Nothing)),
            _ => {
                if let Some(kind) = ValueKind::from_name(&name) {
                    return Ok(Arc::new(Spec::atomic(kind)));
                }
                self.registry
                    .resolve(&name)
                    .ok_or(ParseError::UnknownName { name })
            }
        }
    }

    fn contract(&mut self) -> Result<Contract, ParseError> {
        self.eat(&Token::LParen)?;
        let mut builder = Contract::builder();
        if self.peek() != Some(&Token::RParen) {
            loop {
                if self.peek() == Some(&Token::Star) {
                    self.pos += 1;
                    let rest = self.union()?;
                    // star-marked specs are only legal in trailing position
                    if self.peek() == Some(&Token::Comma) {
                        return Err(ParseError::VariadicNotLast);
                    }
                    builder = builder.variadic(rest);
                    break;
                }
                builder = builder.arg(self.union()?);
                match self.peek() {
                    Some(&Token::Comma) => {
                        self.pos += 1;
                    }
                    _ => break,
                }
            }
        }
        self.eat(&Token::RParen)?;
        if self.peek() == Some(&Token::Arrow) {
            self.pos += 1;
            builder = builder.returns(self.union()?);
        }
        self.expect_end()?;
        Ok(builder.build())
    }
}

/// Build a spec tree from its textual expression.
///
/// # Errors
/// [`ParseError`] on malformed input or unresolvable names.
pub fn build_spec(input: &str, registry: &AliasRegistry) -> Result<Arc<Spec>, ParseError> {
    let mut parser = Parser::new(input, registry)?;
    if parser.at_end() {
        return Err(ParseError::UnexpectedEnd);
    }
    let spec = parser.union()?;
    parser.expect_end()?;
    Ok(spec)
}

/// Parse a full contract: argument list, optional trailing `*` variadic,
/// optional `->` return spec.
///
/// # Errors
/// [`ParseError`] on malformed input, unresolvable names, or a variadic
/// marker anywhere but the trailing argument position.
pub fn parse_contract(input: &str, registry: &AliasRegistry) -> Result<Contract, ParseError> {
    let mut parser = Parser::new(input, registry)?;
    parser.contract()
}
