// src/common/format.rs

use rust_decimal::{Decimal, RoundingStrategy};

/// Valor em reais com duas casas. Ausente (ex.: SUM sem linhas) vira zero.
pub fn format_money(value: Option<Decimal>) -> String {
    let value = value
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("R$ {value:.2}")
}

/// Duração em minutos com uma casa; ausente vira "-".
pub fn format_minutes(value: Option<f64>) -> String {
    match value {
        Some(minutes) => format!("{minutes:.1} min"),
        None => "-".to_string(),
    }
}

pub fn format_sales_count(count: i64) -> String {
    format!("{count} vendas")
}
