//! Shared fixtures for the behavior and journey tests.

pub use rotagraph_core::{Symbol, TradingDate};

pub fn symbol(value: &str) -> Symbol {
    Symbol::parse(value).expect("valid symbol")
}

/// `count` consecutive weekdays starting at `start`.
pub fn weekdays_from(start: &str, count: usize) -> Vec<TradingDate> {
    let mut current = TradingDate::parse(start).expect("valid date");
    let mut days = Vec::with_capacity(count);
    for _ in 0..count {
        days.push(current);
        current = current.next_weekday().expect("date in range");
    }
    days
}
