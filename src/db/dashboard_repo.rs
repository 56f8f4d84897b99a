// src/db/dashboard_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{queries, SalesSource},
    models::{
        dashboard::{DailyRevenue, OverviewKpis, ProductBreakdown, StoreBreakdown},
        filters::ReferenceLists,
    },
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// O SQL é dinâmico (o WHERE depende dos filtros), então usamos as versões
// sem macro do sqlx: query_as::<_, T>(sql) em vez de query_as!.
#[async_trait]
impl SalesSource for DashboardRepository {
    async fn reference_lists(&self) -> Result<ReferenceLists, AppError> {
        // Leitura consistente das quatro listas
        let mut tx = self.pool.begin().await?;

        let stores = sqlx::query_scalar::<_, String>(queries::STORES_SQL)
            .fetch_all(&mut *tx)
            .await?;
        let products = sqlx::query_scalar::<_, String>(queries::PRODUCTS_SQL)
            .fetch_all(&mut *tx)
            .await?;
        let channels = sqlx::query_scalar::<_, String>(queries::CHANNELS_SQL)
            .fetch_all(&mut *tx)
            .await?;
        let statuses = sqlx::query_scalar::<_, String>(queries::STATUSES_SQL)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            stores = stores.len(),
            products = products.len(),
            channels = channels.len(),
            statuses = statuses.len(),
            "Listas de referência carregadas"
        );

        Ok(ReferenceLists {
            stores,
            products,
            channels,
            statuses,
        })
    }

    async fn overview_kpis(&self, sql: &str) -> Result<Vec<OverviewKpis>, AppError> {
        let rows = sqlx::query_as::<_, OverviewKpis>(sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn daily_revenue(&self, sql: &str) -> Result<Vec<DailyRevenue>, AppError> {
        let rows = sqlx::query_as::<_, DailyRevenue>(sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn product_breakdown(&self, sql: &str) -> Result<Vec<ProductBreakdown>, AppError> {
        let rows = sqlx::query_as::<_, ProductBreakdown>(sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn store_breakdown(&self, sql: &str) -> Result<Vec<StoreBreakdown>, AppError> {
        let rows = sqlx::query_as::<_, StoreBreakdown>(sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
