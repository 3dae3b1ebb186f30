//! Path expression parser.
//!
//! The accepted grammar is deliberately small:
//!
//! ```text
//! path      := ""                                  (empty target)
//!            | ident                               (attribute or collection)
//!            | ident "." ident                     (sub-attribute)
//!            | ident "[" ident "eq" literal "]"    (filtered collection)
//! ident     := [A-Za-z$] [A-Za-z0-9_$-]*
//! literal   := '"' ( [^"\\] | '\"' | '\\' )* '"'
//! ```
//!
//! `eq` is matched case-insensitively and whitespace is allowed around the filter tokens.
//! A bare identifier is classified as a collection when it names one of the resource's
//! multi-valued attributes.

use std::fmt;

/// The target of a patch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathExpression {
    /// No path: the value is a fragment whose top-level keys name attributes.
    Empty,
    /// A single-valued attribute, e.g. `displayName`.
    Attribute(String),
    /// A sub-attribute of a complex attribute, e.g. `name.givenName`.
    SubAttribute {
        attribute: String,
        sub_attribute: String,
    },
    /// A bare multi-valued attribute, e.g. `members`.
    Collection(String),
    /// A multi-valued attribute narrowed by one equality predicate.
    Filtered {
        collection: String,
        filter: ValueFilter,
    },
}

/// `attribute eq "value"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueFilter {
    pub attribute: String,
    pub value: String,
}

/// Why a path could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("expected {expected} at position {position}")]
    Expected {
        expected: &'static str,
        position: usize,
    },

    #[error("unsupported filter operator '{operator}', only 'eq' is allowed")]
    UnsupportedOperator { operator: String },

    #[error("unterminated string literal starting at position {position}")]
    UnterminatedLiteral { position: usize },

    #[error("unexpected trailing input '{rest}'")]
    TrailingInput { rest: String },
}

impl PathExpression {
    /// Parse an optional path.
    ///
    /// `multi_valued` lists the attribute names (case-insensitive) that are collections on
    /// the target resource kind.
    pub fn parse(path: Option<&str>, multi_valued: &[&str]) -> Result<Self, PathError> {
        let Some(path) = path else {
            return Ok(PathExpression::Empty);
        };
        if path.trim().is_empty() {
            return Ok(PathExpression::Empty);
        }

        let mut cursor = Cursor::new(path.trim());
        let head = cursor.ident()?;

        let expression = match cursor.peek() {
            None => {
                if multi_valued.iter().any(|m| m.eq_ignore_ascii_case(&head)) {
                    PathExpression::Collection(head)
                } else {
                    PathExpression::Attribute(head)
                }
            }
            Some('.') => {
                cursor.bump();
                let sub_attribute = cursor.ident()?;
                PathExpression::SubAttribute {
                    attribute: head,
                    sub_attribute,
                }
            }
            Some('[') => {
                cursor.bump();
                let filter = cursor.filter()?;
                cursor.skip_whitespace();
                cursor.expect(']', "']'")?;
                PathExpression::Filtered {
                    collection: head,
                    filter,
                }
            }
            Some(_) => {
                return Err(PathError::TrailingInput {
                    rest: cursor.rest().to_string(),
                });
            }
        };

        if !cursor.is_done() {
            return Err(PathError::TrailingInput {
                rest: cursor.rest().to_string(),
            });
        }

        Ok(expression)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathExpression::Empty => Ok(()),
            PathExpression::Attribute(name) | PathExpression::Collection(name) => {
                f.write_str(name)
            }
            PathExpression::SubAttribute {
                attribute,
                sub_attribute,
            } => write!(f, "{}.{}", attribute, sub_attribute),
            PathExpression::Filtered { collection, filter } => write!(
                f,
                "{}[{} eq \"{}\"]",
                collection,
                filter.attribute,
                filter.value.replace('\\', "\\\\").replace('"', "\\\"")
            ),
        }
    }
}

struct Cursor<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn is_done(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char, label: &'static str) -> Result<(), PathError> {
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(PathError::Expected {
                expected: label,
                position: self.position,
            })
        }
    }

    fn ident(&mut self) -> Result<String, PathError> {
        let start = self.position;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '$' => {
                self.bump();
            }
            _ => {
                return Err(PathError::Expected {
                    expected: "attribute name",
                    position: start,
                });
            }
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '-'))
        {
            self.bump();
        }
        Ok(self.input[start..self.position].to_string())
    }

    // ident ws "eq" ws literal
    fn filter(&mut self) -> Result<ValueFilter, PathError> {
        self.skip_whitespace();
        let attribute = self.ident()?;

        let before_operator = self.position;
        self.skip_whitespace();
        if self.position == before_operator {
            return Err(PathError::Expected {
                expected: "whitespace before operator",
                position: self.position,
            });
        }
        let operator = self.ident()?;
        if !operator.eq_ignore_ascii_case("eq") {
            return Err(PathError::UnsupportedOperator { operator });
        }

        self.skip_whitespace();
        let value = self.literal()?;
        Ok(ValueFilter { attribute, value })
    }

    fn literal(&mut self) -> Result<String, PathError> {
        let start = self.position;
        self.expect('"', "string literal")?;

        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(PathError::UnterminatedLiteral { position: start }),
                Some('"') => return Ok(value),
                Some('\\') => match self.bump() {
                    Some(escaped @ ('"' | '\\')) => value.push(escaped),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => return Err(PathError::UnterminatedLiteral { position: start }),
                },
                Some(c) => value.push(c),
            }
        }
    }
}
