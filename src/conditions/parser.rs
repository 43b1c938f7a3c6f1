//! condition parser - converts attribute text to a condition AST
//!
//! grammar:
//!
//! ```text
//! condition  := term (("&&" | "||") term)*
//! term       := "!" comparison | "!" "(" condition ")" | comparison | "(" condition ")"
//! comparison := name ("==" | "!=") literal
//! literal    := raw text up to the next "&&", "||" or ")" outside quotes
//! ```
//!
//! a literal is trimmed and loses one layer of surrounding quotes, so
//! `city==New York` and `dept==R&D` compare against the whole value.
//!
//! with [`Precedence::LeftToRight`] the operators of one chain fold strictly
//! from the left; with [`Precedence::Standard`] `&&` binds tighter than `||`.

use std::iter::Peekable;
use std::str::CharIndices;

use super::types::{CompareOp, Comparison, Condition, Precedence};

/// error type for parsing conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// byte offset into the condition text
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at position {}", self.message, self.position)
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Op(CompareOp),
    Word(String),
    Quoted(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::And => "'&&'".to_string(),
            Token::Or => "'||'".to_string(),
            Token::Not => "'!'".to_string(),
            Token::Op(op) => format!("'{}'", op),
            Token::Word(w) => format!("'{}'", w),
            Token::Quoted(q) => format!("\"{}\"", q),
        }
    }
}

#[derive(Debug, Clone)]
struct Lexed {
    token: Token,
    position: usize,
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '&' | '|' | '!' | '=' | '<' | '>' | '"' | '\'')
}

fn tokenize(input: &str) -> Result<Vec<Lexed>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '&' => match chars.next() {
                Some((_, '&')) => Token::And,
                _ => return Err(ParseError::new("expected '&&'", pos)),
            },
            '|' => match chars.next() {
                Some((_, '|')) => Token::Or,
                _ => return Err(ParseError::new("expected '||'", pos)),
            },
            '!' => {
                if let Some((_, '=')) = chars.peek() {
                    chars.next();
                    Token::Op(CompareOp::Ne)
                } else {
                    Token::Not
                }
            }
            '=' => match chars.next() {
                Some((_, '=')) => Token::Op(CompareOp::Eq),
                _ => return Err(ParseError::new("unknown operator '=', use '=='", pos)),
            },
            '<' | '>' => {
                return Err(ParseError::new(
                    format!("unknown operator '{}', only '==' and '!=' are supported", c),
                    pos,
                ))
            }
            '"' | '\'' => {
                let mut content = String::new();
                let mut closed = false;
                for (_, next) in chars.by_ref() {
                    if next == c {
                        closed = true;
                        break;
                    }
                    content.push(next);
                }
                if !closed {
                    return Err(ParseError::new("unterminated quoted string", pos));
                }
                Token::Quoted(content)
            }
            _ => {
                let mut word = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if !is_word_char(next) {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                Token::Word(word)
            }
        };

        let operator = matches!(token, Token::Op(_));
        tokens.push(Lexed {
            token,
            position: pos,
        });

        if operator {
            if let Some(literal) = lex_literal(input, &mut chars)? {
                tokens.push(literal);
            }
        }
    }

    Ok(tokens)
}

/// read the raw span after a comparison operator
///
/// the span ends at the next `&&`, `||` or `)` that is not inside a
/// leading quoted section. returns `None` when the span is blank.
fn lex_literal(
    input: &str,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<Option<Lexed>, ParseError> {
    while let Some(&(_, c)) = chars.peek() {
        if !c.is_whitespace() {
            break;
        }
        chars.next();
    }

    let Some(&(start, first)) = chars.peek() else {
        return Ok(None);
    };

    let mut quote = matches!(first, '"' | '\'').then_some(first);
    let mut end = start;
    if quote.is_some() {
        chars.next();
        end += first.len_utf8();
    }

    while let Some(&(pos, c)) = chars.peek() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == ')' => break,
            None if matches!(c, '&' | '|') && input[pos + 1..].starts_with(c) => break,
            None => {}
        }
        chars.next();
        end = pos + c.len_utf8();
    }

    if quote.is_some() {
        return Err(ParseError::new("unterminated quoted string", start));
    }

    let raw = input[start..end].trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let token = match unquote(raw) {
        Some(inner) => Token::Quoted(inner.to_string()),
        None => Token::Word(raw.to_string()),
    };
    Ok(Some(Lexed {
        token,
        position: start,
    }))
}

fn unquote(raw: &str) -> Option<&str> {
    let first = raw.chars().next()?;
    if matches!(first, '"' | '\'') && raw.len() >= 2 && raw.ends_with(first) {
        Some(&raw[1..raw.len() - 1])
    } else {
        None
    }
}

struct Parser<'a> {
    tokens: &'a [Lexed],
    pos: usize,
    end: usize,
    precedence: Precedence,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|l| &l.token)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|l| l.position)
            .unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<&'a Lexed> {
        let lexed = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(lexed)
    }

    fn parse_expr(&mut self) -> Result<Condition, ParseError> {
        match self.precedence {
            Precedence::LeftToRight => self.parse_chain(),
            Precedence::Standard => self.parse_or(),
        }
    }

    fn parse_chain(&mut self) -> Result<Condition, ParseError> {
        let mut lhs = self.parse_term()?;
        loop {
            match self.peek() {
                Some(Token::And) => {
                    self.pos += 1;
                    lhs = Condition::and(lhs, self.parse_term()?);
                }
                Some(Token::Or) => {
                    self.pos += 1;
                    lhs = Condition::or(lhs, self.parse_term()?);
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_or(&mut self) -> Result<Condition, ParseError> {
        let mut lhs = self.parse_and()?;
        while let Some(Token::Or) = self.peek() {
            self.pos += 1;
            lhs = Condition::or(lhs, self.parse_and()?);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Condition, ParseError> {
        let mut lhs = self.parse_term()?;
        while let Some(Token::And) = self.peek() {
            self.pos += 1;
            lhs = Condition::and(lhs, self.parse_term()?);
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Condition, ParseError> {
        match self.peek() {
            Some(Token::Not) => {
                self.pos += 1;
                let inner = match self.peek() {
                    Some(Token::LParen) => self.parse_group()?,
                    _ => self.parse_comparison()?,
                };
                Ok(Condition::negate(inner))
            }
            Some(Token::LParen) => self.parse_group(),
            _ => self.parse_comparison(),
        }
    }

    fn parse_group(&mut self) -> Result<Condition, ParseError> {
        let open = self.position();
        self.pos += 1;
        let inner = self.parse_expr()?;
        match self.advance() {
            Some(Lexed {
                token: Token::RParen,
                ..
            }) => Ok(Condition::group(inner)),
            Some(other) => Err(ParseError::new(
                format!("expected ')', found {}", other.token.describe()),
                other.position,
            )),
            None => Err(ParseError::new("unbalanced '(': missing ')'", open)),
        }
    }

    fn parse_comparison(&mut self) -> Result<Condition, ParseError> {
        let position = self.position();
        let name = match self.advance() {
            Some(Lexed {
                token: Token::Word(w),
                ..
            }) => w.clone(),
            Some(other) => {
                return Err(ParseError::new(
                    format!("expected input name, found {}", other.token.describe()),
                    other.position,
                ))
            }
            None => return Err(ParseError::new("expected input name", position)),
        };

        let position = self.position();
        let op = match self.advance() {
            Some(Lexed {
                token: Token::Op(op),
                ..
            }) => *op,
            Some(other) => {
                return Err(ParseError::new(
                    format!(
                        "expected '==' or '!=' after '{}', found {}",
                        name,
                        other.token.describe()
                    ),
                    other.position,
                ))
            }
            None => {
                return Err(ParseError::new(
                    format!("expected '==' or '!=' after '{}'", name),
                    position,
                ))
            }
        };

        let position = self.position();
        let literal = match self.advance() {
            Some(Lexed {
                token: Token::Word(w),
                ..
            }) => w.clone(),
            Some(Lexed {
                token: Token::Quoted(q),
                ..
            }) => q.clone(),
            Some(other) => {
                return Err(ParseError::new(
                    format!("expected value after '{}', found {}", op, other.token.describe()),
                    other.position,
                ))
            }
            None => {
                return Err(ParseError::new(
                    format!("expected value after '{}'", op),
                    position,
                ))
            }
        };

        Ok(Condition::compare(Comparison::new(name, op, literal)))
    }
}

/// parse condition text into a condition AST
///
/// # Arguments
/// * `input` - the raw condition text from a directive attribute
/// * `precedence` - how `&&` and `||` bind relative to each other
///
/// # Returns
/// * `Ok(Condition)` - the parsed condition
/// * `Err(ParseError)` - if the text does not follow the grammar
pub fn parse_condition(input: &str, precedence: Precedence) -> Result<Condition, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::new("empty condition", 0));
    }

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        end: input.len(),
        precedence,
    };

    let condition = parser.parse_expr()?;

    if let Some(rest) = parser.advance() {
        let message = match rest.token {
            Token::RParen => "unbalanced ')': no matching '('".to_string(),
            ref other => format!("unexpected {} after condition", other.describe()),
        };
        return Err(ParseError::new(message, rest.position));
    }

    Ok(condition)
}
