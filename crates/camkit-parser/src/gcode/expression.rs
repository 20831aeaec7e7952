//! Inline expression evaluation
//!
//! Bracketed expressions (`X[#1 * 2]`) are evaluated with `evalexpr` after
//! `#n` references have been replaced by values from the parse's variable
//! table. Integer literals are widened to floats so `[1/2]` is `0.5`.

use std::collections::HashMap;

use evalexpr::{build_operator_tree, ContextWithMutableVariables, HashMapContext, Value};

/// Numbered parameters assigned with `#n = value`
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: HashMap<u32, f64>,
}

/// Evaluation result plus the problems met on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    /// Variables referenced but never assigned (read as 0)
    pub unresolved: Vec<u32>,
    /// Evaluator message when evaluation failed (value is 0)
    pub error: Option<String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, number: u32, value: f64) {
        self.values.insert(number, value);
    }

    pub fn get(&self, number: u32) -> Option<f64> {
        self.values.get(&number).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Evaluate an expression without its surrounding brackets
    pub fn evaluate(&self, expression: &str) -> Evaluation {
        let mut unresolved = Vec::new();
        let substituted = self.substitute(expression, &mut unresolved);
        let widened = widen_integers(&substituted);

        match eval_number(&widened) {
            Ok(value) => Evaluation {
                value,
                unresolved,
                error: None,
            },
            Err(error) => Evaluation {
                value: 0.0,
                unresolved,
                error: Some(error),
            },
        }
    }

    /// Replace every `#n` with its value in parentheses and nested brackets
    /// with parentheses
    fn substitute(&self, expression: &str, unresolved: &mut Vec<u32>) -> String {
        let mut out = String::with_capacity(expression.len());
        let mut chars = expression.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '[' => out.push('('),
                ']' => out.push(')'),
                '#' => {}
                _ => out.push(c),
            }
            if c != '#' {
                continue;
            }
            let mut digits = String::new();
            while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                digits.push(d);
                chars.next();
            }
            match digits.parse::<u32>() {
                Ok(number) => {
                    let value = self.get(number).unwrap_or_else(|| {
                        unresolved.push(number);
                        0.0
                    });
                    out.push_str(&format!("({})", value));
                }
                // A bare '#' is left for the evaluator to reject
                Err(_) => out.push('#'),
            }
        }
        out
    }
}

/// Parse a `#n = value` assignment line
///
/// Returns the variable number and the right-hand side with any outer
/// brackets removed.
pub fn parse_assignment(line: &str) -> Option<(u32, String)> {
    let rest = line.trim().strip_prefix('#')?;
    let (lhs, rhs) = rest.split_once('=')?;
    let number = lhs.trim().parse::<u32>().ok()?;
    let rhs = rhs.trim();
    let rhs = rhs
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .unwrap_or(rhs);
    Some((number, rhs.trim().to_string()))
}

fn eval_number(expression: &str) -> Result<f64, String> {
    let context = math_context()?;
    let tree = build_operator_tree(expression).map_err(|e| e.to_string())?;
    let value = tree.eval_with_context(&context).map_err(|e| e.to_string())?;
    match value {
        Value::Float(f) => Ok(f),
        Value::Int(i) => Ok(i as f64),
        other => Err(format!("Expected number, got {:?}", other)),
    }
}

fn math_context() -> Result<HashMapContext, String> {
    let mut context = HashMapContext::new();
    context
        .set_value("PI".to_string(), Value::Float(std::f64::consts::PI))
        .map_err(|e| e.to_string())?;
    Ok(context)
}

/// Append `.0` to integer literals that are not part of a float or identifier
fn widen_integers(expression: &str) -> String {
    let chars: Vec<char> = expression.chars().collect();
    let mut out = String::with_capacity(expression.len() + 8);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let starts_literal = c.is_ascii_digit() && (i == 0 || !is_literal_part(chars[i - 1]));
        if !starts_literal {
            out.push(c);
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        out.extend(&chars[start..i]);
        if i >= chars.len() || !is_literal_part(chars[i]) {
            out.push_str(".0");
        }
    }
    out
}

fn is_literal_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}
