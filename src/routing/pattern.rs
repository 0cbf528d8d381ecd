//! Pattern compilation.
//!
//! # Grammar
//! ```text
//! pattern   := ( "/" | literal | "\" any | param )*
//! param     := ":" name "?"?
//! name      := [A-Za-z0-9_]+
//! ```
//! A `/` immediately followed by an optional parameter is optional together
//! with it, so `/profile/:id/:title?` matches both `/profile/1` and
//! `/profile/1/title`. Unescaped `?` and `#` are reserved for the query
//! string and anchor of candidate paths.
//!
//! # Matching
//! Every compiled matcher additionally accepts a trailing slash, a query
//! string (`?k=v&k2`), an anchor (`#frag`), and dangling `?`/`#` with no
//! content. Matching is anchored at both ends: a path either conforms
//! entirely or yields nothing.

use indexmap::IndexMap;
use regex::Regex;

use crate::error::PatternError;
use crate::routing::request::{parse_query, Request};

/// Characters a parameter value may consist of.
const PARAM_VALUE: &str = r"[\w-]+";

/// Matcher suffix: optional trailing slash, query string and anchor.
const TAIL: &str = r"/?(?:\?([^#]*))?(?:#(.*))?$";

/// One lexical element of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A `/` path separator.
    Separator,
    /// Literal text, already unescaped.
    Literal(String),
    /// A named parameter.
    Param { name: String, optional: bool },
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub optional: bool,
}

/// Split a pattern into tokens. Pure: no state survives between calls.
pub fn tokenize(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, escaped)) => literal.push(escaped),
                None => {
                    return Err(PatternError::DanglingEscape {
                        pattern: pattern.to_string(),
                    })
                }
            },
            '/' => {
                flush_literal(&mut literal, &mut tokens);
                tokens.push(Token::Separator);
            }
            ':' => {
                flush_literal(&mut literal, &mut tokens);
                let mut name = String::new();
                while let Some((_, c)) = chars.next_if(|(_, c)| c.is_alphanumeric() || *c == '_') {
                    name.push(c);
                }
                if name.is_empty() {
                    return Err(PatternError::MissingParamName {
                        pattern: pattern.to_string(),
                        position,
                    });
                }
                let optional = chars.next_if(|(_, c)| *c == '?').is_some();
                tokens.push(Token::Param { name, optional });
            }
            '?' | '#' => {
                return Err(PatternError::ReservedCharacter {
                    pattern: pattern.to_string(),
                    ch,
                    position,
                })
            }
            other => literal.push(other),
        }
    }
    flush_literal(&mut literal, &mut tokens);

    Ok(tokens)
}

fn flush_literal(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    matcher: Regex,
    params: Vec<ParamSpec>,
}

impl CompiledPattern {
    /// Compile a pattern, failing fast on malformed syntax.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let tokens = tokenize(pattern)?;
        let mut params: Vec<ParamSpec> = Vec::new();
        let mut expr = String::from("^");

        let mut iter = tokens.into_iter().peekable();
        while let Some(token) = iter.next() {
            match token {
                Token::Separator => {
                    // "/:name?" is optional as a unit
                    if let Some(Token::Param { optional: true, .. }) = iter.peek() {
                        if let Some(Token::Param { name, .. }) = iter.next() {
                            push_param(pattern, &mut params, name, true)?;
                            expr.push_str(&format!("(?:/({PARAM_VALUE}))?"));
                        }
                    } else {
                        expr.push('/');
                    }
                }
                Token::Literal(text) => expr.push_str(&regex::escape(&text)),
                Token::Param { name, optional } => {
                    push_param(pattern, &mut params, name, optional)?;
                    if optional {
                        expr.push_str(&format!("({PARAM_VALUE})?"));
                    } else {
                        expr.push_str(&format!("({PARAM_VALUE})"));
                    }
                }
            }
        }
        expr.push_str(TAIL);

        let matcher = Regex::new(&expr).map_err(|source| PatternError::Regex {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            source: pattern.to_string(),
            matcher,
            params,
        })
    }

    /// The pattern text this matcher was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Declared parameters, in declaration order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Match a candidate path, extracting parameters, query and anchor.
    pub fn matches(&self, path: &str) -> Option<Request> {
        let captures = self.matcher.captures(path)?;
        let count = self.params.len();

        let mut params = IndexMap::with_capacity(count);
        for (i, spec) in self.params.iter().enumerate() {
            if let Some(value) = captures.get(i + 1) {
                params.insert(spec.name.clone(), value.as_str().to_string());
            }
        }

        let query = captures
            .get(count + 1)
            .map(|m| parse_query(m.as_str()))
            .unwrap_or_default();
        let anchor = captures
            .get(count + 2)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        Some(Request::new(params, query, anchor))
    }
}

fn push_param(
    pattern: &str,
    params: &mut Vec<ParamSpec>,
    name: String,
    optional: bool,
) -> Result<(), PatternError> {
    if params.iter().any(|p| p.name == name) {
        return Err(PatternError::DuplicateParam {
            pattern: pattern.to_string(),
            name,
        });
    }
    params.push(ParamSpec { name, optional });
    Ok(())
}
