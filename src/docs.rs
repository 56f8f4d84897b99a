// src/docs.rs

use axum::Json;
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SaborBI",
        description = "Análise de dados de restaurantes: KPIs, faturamento por dia e relatórios por produto e loja."
    ),
    paths(
        // --- Filtros ---
        handlers::filters::get_filter_options,

        // --- Dashboard ---
        handlers::dashboard::get_page,
        handlers::dashboard::get_overview,
        handlers::dashboard::get_products,
        handlers::dashboard::get_stores,
        handlers::dashboard::export_products,
        handlers::dashboard::export_stores,
    ),
    components(
        schemas(
            models::filters::ReferenceLists,
            models::filters::DateRange,
            models::dashboard::FilterOptions,
            models::dashboard::WeekdayOption,
            models::dashboard::HourBounds,
            models::dashboard::OverviewKpis,
            models::dashboard::DailyRevenue,
            models::dashboard::ProductBreakdown,
            models::dashboard::StoreBreakdown,
            models::dashboard::KpiCards,
            models::dashboard::Notice,
            models::dashboard::NoticeLevel,
            models::dashboard::OverviewSection,
            models::dashboard::ChartSection,
            models::dashboard::ProductsSection,
            models::dashboard::StoresSection,
            models::dashboard::OverviewResponse,
            models::dashboard::ActiveFilters,
            models::dashboard::DashboardPage,
        )
    ),
    tags(
        (name = "Filtros", description = "Opções da barra lateral"),
        (name = "Dashboard", description = "Visão geral, análise de produtos e de lojas")
    )
)]
pub struct ApiDoc;

// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
