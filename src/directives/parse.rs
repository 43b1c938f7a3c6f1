//! directive attribute parsing

use thiserror::Error;

use crate::conditions::{parse_condition, ParseError, Precedence};

use super::types::{AttrAssign, ClassRule, Directive, DirectiveKind, IfRule};

/// error type for malformed directive attributes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("invalid condition: {0}")]
    Condition(#[from] ParseError),
    #[error("empty {0} directive")]
    Empty(DirectiveKind),
    #[error("malformed {kind} directive '{raw}': {message}")]
    Malformed {
        kind: DirectiveKind,
        raw: String,
        message: String,
    },
}

impl DirectiveError {
    fn malformed(kind: DirectiveKind, raw: &str, message: impl Into<String>) -> Self {
        DirectiveError::Malformed {
            kind,
            raw: raw.to_string(),
            message: message.into(),
        }
    }
}

/// options that change how directive values are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub precedence: Precedence,
    /// allow `'a b':cond` quoted class lists in classname directives
    pub quoted_classnames: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            precedence: Precedence::default(),
            quoted_classnames: true,
        }
    }
}

/// parse the raw attribute value of a directive
pub fn parse_directive(
    kind: DirectiveKind,
    raw: &str,
    options: &ParseOptions,
) -> Result<Directive, DirectiveError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(DirectiveError::Empty(kind));
    }

    match kind {
        DirectiveKind::Show => Ok(Directive::Show(parse_condition(value, options.precedence)?)),
        DirectiveKind::Hide => Ok(Directive::Hide(parse_condition(value, options.precedence)?)),
        DirectiveKind::Disable => Ok(Directive::Disable(parse_condition(
            value,
            options.precedence,
        )?)),
        DirectiveKind::Classname => parse_classname(value, options).map(Directive::Classname),
        DirectiveKind::If => parse_if(value, options).map(Directive::If),
        DirectiveKind::State => Ok(Directive::State(value.to_string())),
        DirectiveKind::Switch => Ok(Directive::Switch {
            group: value.to_string(),
            class: None,
        }),
    }
}

fn parse_classname(value: &str, options: &ParseOptions) -> Result<Vec<ClassRule>, DirectiveError> {
    let kind = DirectiveKind::Classname;
    let mut rules = Vec::new();

    for pair in split_outside_quotes(value, ',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let (classes, condition) = split_once_outside_quotes(pair, ':')
            .ok_or_else(|| DirectiveError::malformed(kind, value, format!("missing ':' in '{}'", pair)))?;

        let classes = if options.quoted_classnames {
            strip_quotes(classes)
        } else {
            classes.trim()
        };
        let classes: Vec<String> = classes.split_whitespace().map(str::to_string).collect();
        if classes.is_empty() {
            return Err(DirectiveError::malformed(
                kind,
                value,
                format!("no class names before ':' in '{}'", pair),
            ));
        }

        rules.push(ClassRule {
            classes,
            condition: parse_condition(condition.trim(), options.precedence)?,
        });
    }

    if rules.is_empty() {
        return Err(DirectiveError::Empty(kind));
    }

    Ok(rules)
}

fn parse_if(value: &str, options: &ParseOptions) -> Result<IfRule, DirectiveError> {
    let kind = DirectiveKind::If;

    let (condition, branches) = split_once_outside_quotes(value, '?')
        .ok_or_else(|| DirectiveError::malformed(kind, value, "missing '?' after condition"))?;

    let (then, otherwise) = match split_once_outside_quotes(branches, ':') {
        Some((then, otherwise)) => (then, Some(otherwise)),
        None => (branches, None),
    };

    Ok(IfRule {
        condition: parse_condition(condition.trim(), options.precedence)?,
        then: parse_assign(then, value)?,
        otherwise: otherwise.map(|o| parse_assign(o, value)).transpose()?,
    })
}

fn parse_assign(text: &str, raw: &str) -> Result<AttrAssign, DirectiveError> {
    let kind = DirectiveKind::If;
    let (name, value) = split_once_outside_quotes(text, '=').ok_or_else(|| {
        DirectiveError::malformed(kind, raw, format!("expected attr=value, found '{}'", text.trim()))
    })?;

    let name = name.trim();
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(DirectiveError::malformed(
            kind,
            raw,
            format!("invalid attribute name '{}'", name),
        ));
    }

    Ok(AttrAssign::new(name, strip_quotes(value)))
}

/// trim, then strip one layer of surrounding quotes
pub fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    let bytes = s.as_bytes();
    if bytes.len() >= 2
        && matches!(bytes[0], b'\'' | b'"')
        && matches!(bytes[bytes.len() - 1], b'\'' | b'"')
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// split on `sep` wherever it is not inside a quoted section
pub fn split_outside_quotes(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;

    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == sep => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            None => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// split at the first `sep` outside a quoted section
pub fn split_once_outside_quotes(s: &str, sep: char) -> Option<(&str, &str)> {
    let mut quote: Option<char> = None;

    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == sep => return Some((&s[..i], &s[i + c.len_utf8()..])),
            None => {}
        }
    }
    None
}
