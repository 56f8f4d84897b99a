// src/services/export.rs
//
// Exportação das tabelas de produtos e lojas em CSV (UTF-8, com cabeçalho).

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::dashboard::{ProductBreakdown, StoreBreakdown},
};

pub const PRODUCTS_FILE_NAME: &str = "relatorio_produtos.csv";
pub const STORES_FILE_NAME: &str = "relatorio_lojas.csv";

/// Uma linha de tabela exportável.
pub trait CsvRow {
    const HEADERS: &'static [&'static str];

    fn record(&self) -> Vec<String>;
}

impl CsvRow for ProductBreakdown {
    const HEADERS: &'static [&'static str] =
        &["produto", "quantidade_vendida", "faturamento_produto"];

    fn record(&self) -> Vec<String> {
        vec![
            self.product.clone(),
            self.quantity_sold.to_string(),
            decimal_cell(self.revenue),
        ]
    }
}

impl CsvRow for StoreBreakdown {
    const HEADERS: &'static [&'static str] = &[
        "loja",
        "total_vendas",
        "faturamento_total",
        "ticket_medio",
        "avg_tempo_entrega_min",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.store.clone(),
            self.total_sales.to_string(),
            decimal_cell(self.total_revenue),
            decimal_cell(self.average_ticket),
            self.avg_delivery_minutes
                .map(|minutes| minutes.to_string())
                .unwrap_or_default(),
        ]
    }
}

// Valor nulo vira célula vazia
fn decimal_cell(value: Option<Decimal>) -> String {
    value.map(|v| v.normalize().to_string()).unwrap_or_default()
}

pub fn to_csv<R: CsvRow>(rows: &[R]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(R::HEADERS)?;
    for row in rows {
        writer.write_record(row.record())?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!(e.to_string())))
}
