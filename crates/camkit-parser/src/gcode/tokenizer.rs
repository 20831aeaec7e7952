//! Line tokenizer
//!
//! Splits one comment-free line into words (letter plus value) and
//! standalone bracketed expressions. Letters are case-insensitive and
//! whitespace between a letter and its number is tolerated.

use serde::{Deserialize, Serialize};

/// Value attached to a word letter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WordValue {
    /// Plain signed decimal
    Number(f64),
    /// Bracketed expression or `#n` reference, without brackets
    Expression(String),
    /// Text that is not a number, e.g. `1.2.3`
    Invalid(String),
}

/// A single token on a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    Word {
        letter: char,
        value: WordValue,
        /// Numeric text as written, used to tell `G5.1` from `G5.10`
        raw: String,
    },
    /// Standalone `[ ... ]` not attached to a letter
    Expression(String),
}

impl Token {
    pub fn letter(&self) -> Option<char> {
        match self {
            Token::Word { letter, .. } => Some(*letter),
            Token::Expression(_) => None,
        }
    }
}

/// Tokenize a line that has already had its comments removed
pub fn tokenize(line: &str) -> Vec<Token> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c == '[' {
            let (body, next) = read_bracketed(&chars, i);
            tokens.push(Token::Expression(body));
            i = next;
            continue;
        }

        if c.is_ascii_alphabetic() {
            let letter = c.to_ascii_uppercase();
            i += 1;
            while i < chars.len() && (chars[i] == ' ' || chars[i] == '\t') {
                i += 1;
            }

            if i < chars.len() && chars[i] == '[' {
                let (body, next) = read_bracketed(&chars, i);
                tokens.push(Token::Word {
                    letter,
                    raw: format!("[{}]", body),
                    value: WordValue::Expression(body),
                });
                i = next;
                continue;
            }

            if i < chars.len() && chars[i] == '#' {
                let start = i;
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let reference: String = chars[start..i].iter().collect();
                tokens.push(Token::Word {
                    letter,
                    raw: reference.clone(),
                    value: WordValue::Expression(reference),
                });
                continue;
            }

            let start = i;
            while i < chars.len() && is_number_char(chars[i]) {
                i += 1;
            }
            let raw: String = chars[start..i].iter().collect();
            let value = match raw.parse::<f64>() {
                Ok(v) if !raw.is_empty() => WordValue::Number(v),
                _ => WordValue::Invalid(raw.clone()),
            };
            tokens.push(Token::Word { letter, value, raw });
            continue;
        }

        // Stray punctuation or a number with no letter
        i += 1;
    }

    tokens
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '-' || c == '+'
}

/// Read from an opening `[` to its matching `]`; returns the inner text and
/// the index after the closing bracket. An unterminated bracket runs to the
/// end of the line.
fn read_bracketed(chars: &[char], open: usize) -> (String, usize) {
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    let body: String = chars[open + 1..i].iter().collect();
                    return (body.trim().to_string(), i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    let body: String = chars[open + 1..].iter().collect();
    (body.trim().to_string(), chars.len())
}
