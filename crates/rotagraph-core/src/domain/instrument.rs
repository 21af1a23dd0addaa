use serde::{Deserialize, Serialize};

use crate::{Symbol, ValidationError};

/// An instrument plotted on the graph, with the display name supplied by
/// reference data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: Symbol,
    pub name: String,
}

impl Instrument {
    pub fn new(symbol: Symbol, name: impl Into<String>) -> Self {
        Self {
            symbol,
            name: name.into(),
        }
    }

    /// Instrument whose display name is its ticker.
    pub fn unnamed(symbol: Symbol) -> Self {
        let name = symbol.as_str().to_owned();
        Self { symbol, name }
    }

    pub fn parse(symbol: &str, name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self::new(Symbol::parse(symbol)?, name))
    }
}

/// Benchmarks and sector proxies known to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    pub benchmarks: Vec<Instrument>,
    pub sectors: Vec<Instrument>,
}

const TOPIX17_BENCHMARKS: [(&str, &str); 2] =
    [("1306.T", "TOPIX ETF"), ("1321.T", "Nikkei 225 ETF")];

const TOPIX17_SECTORS: [(&str, &str); 17] = [
    ("1617.T", "Foods"),
    ("1618.T", "Energy Resources"),
    ("1619.T", "Construction & Materials"),
    ("1620.T", "Raw Materials & Chemicals"),
    ("1621.T", "Pharmaceutical"),
    ("1622.T", "Automobiles & Transportation Equipment"),
    ("1623.T", "Steel & Nonferrous Metals"),
    ("1624.T", "Machinery"),
    ("1625.T", "Electric Appliances & Precision Instruments"),
    ("1626.T", "IT & Services, Others"),
    ("1627.T", "Electric Power & Gas"),
    ("1628.T", "Transportation & Logistics"),
    ("1629.T", "Commercial & Wholesale Trade"),
    ("1630.T", "Retail Trade"),
    ("1631.T", "Banks"),
    ("1632.T", "Financials (ex Banks)"),
    ("1633.T", "Real Estate"),
];

impl Universe {
    pub fn new(benchmarks: Vec<Instrument>, sectors: Vec<Instrument>) -> Self {
        Self {
            benchmarks,
            sectors,
        }
    }

    /// TOPIX-17 sector ETFs listed in Tokyo, benchmarked against TOPIX or
    /// the Nikkei 225.
    pub fn topix17() -> Result<Self, ValidationError> {
        let to_instruments = |table: &[(&str, &str)]| {
            table
                .iter()
                .map(|(symbol, name)| Instrument::parse(symbol, *name))
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(Self::new(
            to_instruments(&TOPIX17_BENCHMARKS)?,
            to_instruments(&TOPIX17_SECTORS)?,
        ))
    }

    pub fn find(&self, symbol: &Symbol) -> Option<&Instrument> {
        self.sectors
            .iter()
            .chain(self.benchmarks.iter())
            .find(|instrument| &instrument.symbol == symbol)
    }

    /// Display name for `symbol`, falling back to the ticker itself.
    pub fn display_name(&self, symbol: &Symbol) -> String {
        self.find(symbol)
            .map(|instrument| instrument.name.clone())
            .unwrap_or_else(|| symbol.as_str().to_owned())
    }

    pub fn is_benchmark(&self, symbol: &Symbol) -> bool {
        self.benchmarks
            .iter()
            .any(|instrument| &instrument.symbol == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topix17_has_seventeen_sectors() {
        let universe = Universe::topix17().expect("built-in universe is valid");
        assert_eq!(universe.sectors.len(), 17);
        assert_eq!(universe.benchmarks.len(), 2);
        assert!(universe.is_benchmark(&Symbol::parse("1306.T").expect("symbol")));
    }

    #[test]
    fn display_name_falls_back_to_ticker() {
        let universe = Universe::topix17().expect("built-in universe is valid");
        let banks = Symbol::parse("1631.t").expect("symbol");
        assert_eq!(universe.display_name(&banks), "Banks");

        let unknown = Symbol::parse("XLK").expect("symbol");
        assert_eq!(universe.display_name(&unknown), "XLK");
    }
}
