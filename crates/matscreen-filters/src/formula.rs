//! Parser de fórmulas químicas (`"Fe2O3"`, `"Ca(OH)2"`, `"Li0.5CoO2"`).
//!
//! Produce una `Composition`: elementos en orden de primera aparición con su
//! cantidad. Admite paréntesis y corchetes anidados con multiplicador y
//! cantidades fraccionarias. Elementos repetidos se suman.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::elements::{atomic_number, is_element};

#[derive(Debug, Error, PartialEq)]
pub enum FormulaError {
    #[error("empty formula")]
    Empty,
    #[error("unknown element '{0}'")]
    UnknownElement(String),
    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unbalanced brackets")]
    Unbalanced,
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    amounts: IndexMap<String, f64>,
}

impl Composition {
    pub fn parse(formula: &str) -> Result<Self, FormulaError> {
        let chars: Vec<char> = formula.chars().collect();
        let mut parser = Parser { chars: &chars, pos: 0 };
        let amounts = parser.group(None)?;
        if parser.pos < chars.len() {
            return Err(FormulaError::Unbalanced);
        }
        let amounts: IndexMap<String, f64> = amounts.into_iter().filter(|(_, n)| *n > 0.0).collect();
        if amounts.is_empty() {
            return Err(FormulaError::Empty);
        }
        Ok(Self { amounts })
    }

    /// Símbolos en orden de aparición.
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.amounts.keys().map(String::as_str)
    }

    pub fn amount(&self, symbol: &str) -> Option<f64> {
        self.amounts.get(symbol).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.amounts.contains_key(symbol)
    }

    pub fn contains_any(&self, symbols: &[&str]) -> bool {
        symbols.iter().any(|s| self.contains(s))
    }

    /// ¿Algún elemento cumple `pred` sobre su número atómico?
    pub fn any_z(&self, pred: impl Fn(u8) -> bool) -> bool {
        self.atomic_numbers().any(pred)
    }

    pub fn all_z(&self, pred: impl Fn(u8) -> bool) -> bool {
        self.atomic_numbers().all(pred)
    }

    fn atomic_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.amounts.keys().filter_map(|s| atomic_number(s))
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn amounts(&self) -> impl Iterator<Item = (&str, f64)> {
        self.amounts.iter().map(|(s, n)| (s.as_str(), *n))
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, n) in self.amounts() {
            if n == 1.0 {
                write!(f, "{symbol}")?;
            } else {
                write!(f, "{symbol}{n}")?;
            }
        }
        Ok(())
    }
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Lee un grupo hasta `close` (o fin de entrada si `close` es `None`).
    fn group(&mut self, close: Option<char>) -> Result<IndexMap<String, f64>, FormulaError> {
        let mut out: IndexMap<String, f64> = IndexMap::new();
        loop {
            let Some(c) = self.peek() else {
                return match close {
                    None => Ok(out),
                    Some(_) => Err(FormulaError::Unbalanced),
                };
            };
            match c {
                '(' | '[' => {
                    self.pos += 1;
                    let inner = self.group(Some(if c == '(' { ')' } else { ']' }))?;
                    let factor = self.amount()?.unwrap_or(1.0);
                    for (symbol, n) in inner {
                        *out.entry(symbol).or_insert(0.0) += n * factor;
                    }
                }
                ')' | ']' => {
                    if close == Some(c) {
                        self.pos += 1;
                        return Ok(out);
                    }
                    return Err(FormulaError::Unbalanced);
                }
                c if c.is_ascii_uppercase() => {
                    let symbol = self.symbol();
                    if !is_element(&symbol) {
                        return Err(FormulaError::UnknownElement(symbol));
                    }
                    let n = self.amount()?.unwrap_or(1.0);
                    *out.entry(symbol).or_insert(0.0) += n;
                }
                c if c.is_whitespace() => self.pos += 1,
                ch => return Err(FormulaError::UnexpectedChar { ch, pos: self.pos }),
            }
        }
    }

    fn symbol(&mut self) -> String {
        let mut symbol = String::new();
        if let Some(c) = self.peek() {
            symbol.push(c);
            self.pos += 1;
        }
        while let Some(c) = self.peek().filter(char::is_ascii_lowercase) {
            symbol.push(c);
            self.pos += 1;
        }
        symbol
    }

    fn amount(&mut self) -> Result<Option<f64>, FormulaError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        raw.parse::<f64>().map(Some).map_err(|_| FormulaError::InvalidAmount(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(formula: &str) -> Vec<(String, f64)> {
        Composition::parse(formula).unwrap().amounts().map(|(s, n)| (s.to_string(), n)).collect()
    }

    #[test]
    fn simple_formulas() {
        assert_eq!(amounts("Fe2O3"), vec![("Fe".into(), 2.0), ("O".into(), 3.0)]);
        assert_eq!(amounts("NaCl"), vec![("Na".into(), 1.0), ("Cl".into(), 1.0)]);
    }

    #[test]
    fn groups_and_repeats_are_merged() {
        assert_eq!(amounts("Ca(OH)2"), vec![("Ca".into(), 1.0), ("O".into(), 2.0), ("H".into(), 2.0)]);
        assert_eq!(amounts("CH3COOH"), vec![("C".into(), 2.0), ("H".into(), 4.0), ("O".into(), 2.0)]);
        assert_eq!(amounts("K4[Fe(CN)6]"),
                   vec![("K".into(), 4.0), ("Fe".into(), 1.0), ("C".into(), 6.0), ("N".into(), 6.0)]);
    }

    #[test]
    fn fractional_amounts() {
        assert_eq!(amounts("Li0.5CoO2"), vec![("Li".into(), 0.5), ("Co".into(), 1.0), ("O".into(), 2.0)]);
    }

    #[test]
    fn errors() {
        assert_eq!(Composition::parse(""), Err(FormulaError::Empty));
        assert_eq!(Composition::parse("Xx2"), Err(FormulaError::UnknownElement("Xx".into())));
        assert_eq!(Composition::parse("Ca(OH2"), Err(FormulaError::Unbalanced));
        assert_eq!(Composition::parse("CaOH)2"), Err(FormulaError::Unbalanced));
        assert_eq!(Composition::parse("fe2"), Err(FormulaError::UnexpectedChar { ch: 'f', pos: 0 }));
        assert_eq!(Composition::parse("Fe1.2.3"), Err(FormulaError::InvalidAmount("1.2.3".into())));
    }

    #[test]
    fn display_omits_unit_amounts() {
        assert_eq!(Composition::parse("Ti2C").unwrap().to_string(), "Ti2C");
    }
}
