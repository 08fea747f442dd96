//! Thread query language: whitespace means AND, `|` or `OR` means OR (lower
//! precedence), parentheses group.

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Query {
    /// Blank query; matches every thread
    All,
    Word(String),
    And(Box<Query>, Box<Query>),
    Or(Box<Query>, Box<Query>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Or,
    Open,
    Close,
}

fn tokenize(input: &str) -> Vec<Token> {
    fn flush(word: &mut String, tokens: &mut Vec<Token>) {
        if word.is_empty() {
            return;
        }
        let word = std::mem::take(word);
        if word.eq_ignore_ascii_case("or") {
            tokens.push(Token::Or);
        } else {
            tokens.push(Token::Word(word));
        }
    }

    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in input.chars() {
        if c.is_alphanumeric() {
            word.push(c);
            continue;
        }
        flush(&mut word, &mut tokens);
        match c {
            '|' => tokens.push(Token::Or),
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            _ => {}
        }
    }
    flush(&mut word, &mut tokens);
    tokens
}

/// Plain search words of `input`, operators removed
pub(crate) fn query_words(input: &str) -> Vec<String> {
    tokenize(input)
        .into_iter()
        .filter_map(|token| match token {
            Token::Word(word) => Some(word),
            _ => None,
        })
        .collect()
}

pub(crate) fn parse(input: &str) -> Result<Query> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Ok(Query::All);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let query = parser.expr()?;
    match parser.peek() {
        None => Ok(query),
        Some(Token::Close) => Err(invalid("unexpected ')'")),
        Some(_) => Err(invalid("unexpected token")),
    }
}

fn invalid(reason: &str) -> EngineError {
    EngineError::InvalidQuery(reason.to_string())
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<Query> {
        let mut left = self.and_expr()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let right = self.and_expr()?;
            left = Query::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Query> {
        let mut left = self.primary()?;
        while matches!(self.peek(), Some(Token::Word(_)) | Some(Token::Open)) {
            let right = self.primary()?;
            left = Query::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn primary(&mut self) -> Result<Query> {
        match self.next() {
            Some(Token::Word(word)) => Ok(Query::Word(word)),
            Some(Token::Open) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Token::Close) => Ok(inner),
                    _ => Err(invalid("missing ')'")),
                }
            }
            Some(Token::Or) => Err(invalid("operator without left operand")),
            Some(Token::Close) => Err(invalid("unexpected ')'")),
            None => Err(invalid("unexpected end of query")),
        }
    }
}

/// Intersection of two ascending lists
pub(crate) fn intersect_sorted(left: &[usize], right: &[usize]) -> Vec<usize> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::new();
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(left[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Union of two ascending lists, without duplicates
pub(crate) fn union_sorted(left: &[usize], right: &[usize]) -> Vec<usize> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::with_capacity(left.len() + right.len());
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Less => {
                out.push(left[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(right[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(left[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&left[i..]);
    out.extend_from_slice(&right[j..]);
    out
}
