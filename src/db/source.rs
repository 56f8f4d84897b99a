// src/db/source.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    models::{
        dashboard::{DailyRevenue, OverviewKpis, ProductBreakdown, StoreBreakdown},
        filters::ReferenceLists,
    },
};

/// Fonte de dados somente-leitura do dashboard.
///
/// Cada método recebe o SQL final (já com o WHERE) e devolve as linhas.
/// A implementação de produção é o `DashboardRepository`; nos testes usamos
/// fontes em memória.
#[async_trait]
pub trait SalesSource: Send + Sync {
    async fn reference_lists(&self) -> Result<ReferenceLists, AppError>;

    async fn overview_kpis(&self, sql: &str) -> Result<Vec<OverviewKpis>, AppError>;

    async fn daily_revenue(&self, sql: &str) -> Result<Vec<DailyRevenue>, AppError>;

    async fn product_breakdown(&self, sql: &str) -> Result<Vec<ProductBreakdown>, AppError>;

    async fn store_breakdown(&self, sql: &str) -> Result<Vec<StoreBreakdown>, AppError>;
}
