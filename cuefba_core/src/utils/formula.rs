//! Parsing of chemical formulas into element counts
use indexmap::IndexMap;
use thiserror::Error;

/// Parse a chemical formula such as `C6H12O6` into `{C: 6, H: 12, O: 6}`
///
/// Elements start with an uppercase letter followed by any number of lowercase letters, and are
/// followed by an optional (possibly fractional) count. Repeated elements are summed. Generic
/// groups used by genome scale models (`R`, `X`) are kept as regular elements.
pub(crate) fn parse_formula(formula: &str) -> Result<IndexMap<String, f64>, FormulaError> {
    let mut elements: IndexMap<String, f64> = IndexMap::new();
    let chars: Vec<char> = formula.trim().chars().collect();
    let mut pos = 0;
    while pos < chars.len() {
        let c = chars[pos];
        if !c.is_ascii_uppercase() {
            return Err(FormulaError::UnexpectedCharacter {
                formula: formula.to_string(),
                character: c,
            });
        }
        let mut element = String::from(c);
        pos += 1;
        while pos < chars.len() && chars[pos].is_ascii_lowercase() {
            element.push(chars[pos]);
            pos += 1;
        }
        let start = pos;
        while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
            pos += 1;
        }
        let count = if start == pos {
            1.
        } else {
            let digits: String = chars[start..pos].iter().collect();
            digits
                .parse::<f64>()
                .map_err(|_| FormulaError::InvalidCount {
                    formula: formula.to_string(),
                    count: digits.clone(),
                })?
        };
        *elements.entry(element).or_insert(0.) += count;
    }
    Ok(elements)
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Unexpected character '{character}' in formula {formula}")]
    UnexpectedCharacter { formula: String, character: char },
    #[error("Invalid element count '{count}' in formula {formula}")]
    InvalidCount { formula: String, count: String },
}
