use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Instrument identifier as quoted by the market-data collaborator.
///
/// Covers exchange-suffixed codes (`1306.T`), index symbols (`^TOPX`) and
/// plain tickers. Stored upper-cased so `1631.t` and `1631.T` are the same
/// panel column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let code = input.trim().to_ascii_uppercase();
        let len = code.chars().count();
        if len == 0 {
            return Err(ValidationError::EmptySymbol);
        }
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        if let Some((index, ch)) = code
            .chars()
            .enumerate()
            .find(|(index, ch)| !allowed_at(*index, *ch))
        {
            return Err(if index == 0 {
                ValidationError::SymbolInvalidStart { ch }
            } else {
                ValidationError::SymbolInvalidChar { ch, index }
            });
        }

        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `^` only leads index symbols; separators never lead.
fn allowed_at(index: usize, ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || match index {
            0 => ch == '^',
            _ => matches!(ch, '.' | '-' | '_' | '='),
        }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
