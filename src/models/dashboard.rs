// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::filters::{DateRange, ReferenceLists};

// =============================================================================
//  LINHAS VINDAS DO BANCO
// =============================================================================

// 1. KPIs da visão geral (uma única linha)
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewKpis {
    pub total_sales: i64,
    pub total_revenue: Option<Decimal>,
    pub average_ticket: Option<Decimal>,
    pub avg_delivery_minutes: Option<f64>,
}

// 2. Faturamento por dia (gráfico de linha)
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub day: NaiveDate,
    pub revenue: Option<Decimal>,
}

// 3. Análise de produtos
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductBreakdown {
    pub product: String,
    pub quantity_sold: i64,
    pub revenue: Option<Decimal>,
}

// 4. Análise de lojas
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreBreakdown {
    pub store: String,
    pub total_sales: i64,
    pub total_revenue: Option<Decimal>,
    pub average_ticket: Option<Decimal>,
    pub avg_delivery_minutes: Option<f64>,
}

// =============================================================================
//  RESPOSTAS DA API
// =============================================================================

/// Os cards do topo, já formatados para exibição.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiCards {
    #[schema(example = "R$ 15230.90")]
    pub total_revenue: String,
    #[schema(example = "412 vendas")]
    pub total_sales: String,
    #[schema(example = "R$ 36.97")]
    pub average_ticket: String,
    #[schema(example = "32.4 min")]
    pub delivery_time: String,
    // Valores crus para quem quiser calcular em cima
    pub raw: OverviewKpis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// Aviso exibido no lugar (ou junto) de uma seção.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewSection {
    pub kpis: Option<KpiCards>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartSection {
    pub points: Vec<DailyRevenue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductsSection {
    pub rows: Vec<ProductBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoresSection {
    pub rows: Vec<StoreBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub overview: OverviewSection,
    pub chart: ChartSection,
}

/// Eco dos filtros ativos (só com DEBUG_SHOW_FILTERS ligado).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFilters {
    pub stores: Vec<String>,
    pub channels: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A página inteira: visão geral, gráfico, produtos e lojas.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPage {
    pub overview: OverviewSection,
    pub chart: ChartSection,
    pub products: ProductsSection,
    pub stores: StoresSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_filters: Option<ActiveFilters>,
}

// =============================================================================
//  OPÇÕES DOS FILTROS
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayOption {
    #[schema(example = "Domingo")]
    pub label: String,
    #[schema(example = 0)]
    pub value: u8,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HourBounds {
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(flatten)]
    pub reference: ReferenceLists,
    pub weekdays: Vec<WeekdayOption>,
    #[schema(example = json!(["COMPLETED"]))]
    pub default_statuses: Vec<String>,
    pub dates: DateRange,
    pub hours: HourBounds,
}
