// src/handlers/dashboard.rs

use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::Query;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{
    common::{
        error::{ApiError, AppError},
        format::{format_minutes, format_money, format_sales_count},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        dashboard::{
            ActiveFilters, ChartSection, DailyRevenue, DashboardPage, KpiCards, Notice,
            NoticeLevel, OverviewKpis, OverviewResponse, OverviewSection, ProductBreakdown,
            ProductsSection, StoreBreakdown, StoresSection,
        },
        filters::{HourRange, Weekday},
    },
    services::{
        dashboard_service::{FilterInput, PreparedFilters, SectionResult},
        export::{self, CsvRow},
    },
};

// =============================================================================
//  PARÂMETROS (os mesmos para todas as rotas do dashboard)
// =============================================================================

/// Filtros da barra lateral. Listas vazias significam "todos".
/// Multiselects usam chaves repetidas: `?stores=A&stores=B`.
///
/// Dias e horas chegam como números crus e são checados pelo `validate`,
/// assim um valor fora da faixa vira o mesmo erro 400 traduzido.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_ranges"))]
pub struct DashboardQuery {
    #[serde(default)]
    pub stores: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub statuses: Vec<String>,
    // 0 = domingo ... 6 = sábado
    #[serde(default)]
    #[validate(custom(function = "validate_weekdays"))]
    pub weekdays: Vec<u8>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[validate(range(max = 24, message = "deve estar entre 0 e 24"))]
    pub hour_start: Option<u16>,
    #[validate(range(max = 24, message = "deve estar entre 0 e 24"))]
    pub hour_end: Option<u16>,
}

fn validate_weekdays(weekdays: &[u8]) -> Result<(), ValidationError> {
    match weekdays.iter().find(|day| Weekday::try_from(**day).is_err()) {
        Some(day) => Err(ValidationError::new("weekday")
            .with_message(format!("dia da semana inválido: {day} (esperado 0 a 6)").into())),
        None => Ok(()),
    }
}

fn validate_ranges(query: &DashboardQuery) -> Result<(), ValidationError> {
    let start = query.hour_start.unwrap_or(HourRange::FULL_DAY.start.into());
    let end = query.hour_end.unwrap_or(HourRange::FULL_DAY.end.into());
    if start > end {
        return Err(ValidationError::new("hour_range")
            .with_message("hourStart não pode ser maior que hourEnd".into()));
    }
    Ok(())
}

// Só chamada depois do `validate`: as horas já estão em 0..=24.
fn hour_or(value: Option<u16>, default: u8) -> u8 {
    value
        .and_then(|hour| u8::try_from(hour).ok())
        .unwrap_or(default)
}

impl From<DashboardQuery> for FilterInput {
    fn from(query: DashboardQuery) -> Self {
        let hours = HourRange {
            start: hour_or(query.hour_start, HourRange::FULL_DAY.start),
            end: hour_or(query.hour_end, HourRange::FULL_DAY.end),
        };
        FilterInput {
            stores: query.stores,
            products: query.products,
            channels: query.channels,
            statuses: query.statuses,
            weekdays: query
                .weekdays
                .into_iter()
                .filter_map(|day| Weekday::try_from(day).ok())
                .collect(),
            start: query.start,
            end: query.end,
            hours: Some(hours),
        }
    }
}

/// Extrator dos filtros: desserializa e valida a query string.
/// Qualquer falha sai como `{"error": ...}` no idioma do cliente.
pub struct FilterQuery(pub DashboardQuery);

impl FromRequestParts<AppState> for FilterQuery {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        app_state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(locale) = Locale::from_request_parts(parts, app_state).await;

        let Query(params) = Query::<DashboardQuery>::from_request_parts(parts, app_state)
            .await
            .map_err(|rejection| {
                AppError::MalformedQuery(rejection.body_text())
                    .to_api_error(&locale, &app_state.i18n_store)
            })?;

        params
            .validate()
            .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

        Ok(FilterQuery(params))
    }
}

// =============================================================================
//  HELPERS
// =============================================================================

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn prepare(
    app_state: &AppState,
    locale: &Locale,
    params: DashboardQuery,
) -> Result<PreparedFilters, ApiError> {
    app_state
        .dashboard_service
        .prepare(params.into(), today())
        .await
        .map_err(|app_err| app_err.to_api_error(locale, &app_state.i18n_store))
}

/// Aviso de uma seção: vazio vira "nenhum dado"; falha vira erro
/// (com detalhe só se SHOW_ERROR_MESSAGES estiver ligado).
fn section_notice<T>(
    app_state: &AppState,
    locale: &Locale,
    result: &SectionResult<T>,
    empty_key: &'static str,
) -> Option<Notice> {
    let store = &app_state.i18n_store;
    match result {
        SectionResult::Ready(_) => None,
        SectionResult::Failed(detail) if app_state.settings.show_error_messages => Some(Notice {
            level: NoticeLevel::Error,
            message: format!("{}: {detail}", store.get(locale, "database_error")),
        }),
        SectionResult::Empty | SectionResult::Failed(_) => Some(Notice {
            level: NoticeLevel::Warning,
            message: store.get(locale, empty_key),
        }),
    }
}

fn kpi_cards(kpis: &OverviewKpis) -> KpiCards {
    KpiCards {
        total_revenue: format_money(kpis.total_revenue),
        total_sales: format_sales_count(kpis.total_sales),
        average_ticket: format_money(kpis.average_ticket),
        delivery_time: format_minutes(kpis.avg_delivery_minutes),
        raw: kpis.clone(),
    }
}

fn overview_section(
    app_state: &AppState,
    locale: &Locale,
    result: &SectionResult<OverviewKpis>,
) -> OverviewSection {
    OverviewSection {
        kpis: result.rows().first().map(kpi_cards),
        notice: section_notice(app_state, locale, result, "no_data"),
    }
}

fn chart_section(
    app_state: &AppState,
    locale: &Locale,
    result: &SectionResult<DailyRevenue>,
) -> ChartSection {
    ChartSection {
        points: result.rows().to_vec(),
        notice: section_notice(app_state, locale, result, "no_chart_data"),
    }
}

fn products_section(
    app_state: &AppState,
    locale: &Locale,
    result: &SectionResult<ProductBreakdown>,
) -> ProductsSection {
    ProductsSection {
        rows: result.rows().to_vec(),
        notice: section_notice(app_state, locale, result, "no_products"),
    }
}

fn stores_section(
    app_state: &AppState,
    locale: &Locale,
    result: &SectionResult<StoreBreakdown>,
) -> StoresSection {
    StoresSection {
        rows: result.rows().to_vec(),
        notice: section_notice(app_state, locale, result, "no_stores"),
    }
}

fn active_filters(prepared: &PreparedFilters) -> ActiveFilters {
    let reference = &prepared.reference;
    ActiveFilters {
        stores: prepared.filters.stores.values(&reference.stores).into_iter().cloned().collect(),
        channels: prepared.filters.channels.values(&reference.channels).into_iter().cloned().collect(),
        start: prepared.filters.dates.start,
        end: prepared.filters.dates.end,
    }
}

// Resposta de download do CSV
fn csv_attachment<R: CsvRow>(
    app_state: &AppState,
    locale: &Locale,
    result: SectionResult<R>,
    empty_key: &'static str,
    file_name: &str,
) -> Result<Response, ApiError> {
    let rows = match result {
        SectionResult::Ready(rows) => rows,
        SectionResult::Empty => {
            return Err(AppError::NoData(empty_key).to_api_error(locale, &app_state.i18n_store));
        }
        SectionResult::Failed(detail) => {
            let mut message = app_state.i18n_store.get(locale, "database_error");
            if app_state.settings.show_error_messages {
                message = format!("{message}: {detail}");
            }
            return Err(ApiError {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message,
            });
        }
    };

    let body = export::to_csv(&rows)
        .map_err(|app_err| app_err.to_api_error(locale, &app_state.i18n_store))?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];

    Ok((StatusCode::OK, headers, body).into_response())
}

// =============================================================================
//  ROTAS
// =============================================================================

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Página completa: KPIs, gráfico, produtos e lojas", body = DashboardPage),
        (status = 400, description = "Filtros inválidos"),
        (status = 503, description = "Listas de referência indisponíveis")
    ),
    params(
        ("stores" = Option<Vec<String>>, Query, description = "Lojas (vazio = todas)"),
        ("products" = Option<Vec<String>>, Query, description = "Produtos (vazio = todos)"),
        ("channels" = Option<Vec<String>>, Query, description = "Canais (vazio = todos)"),
        ("statuses" = Option<Vec<String>>, Query, description = "Status da venda (vazio = todos)"),
        ("weekdays" = Option<Vec<u8>>, Query, description = "Dias da semana, 0 = domingo"),
        ("start" = Option<NaiveDate>, Query, description = "Início do período (inclusivo)"),
        ("end" = Option<NaiveDate>, Query, description = "Fim do período (inclusivo)"),
        ("hourStart" = Option<u8>, Query, description = "Hora inicial (inclusiva)"),
        ("hourEnd" = Option<u8>, Query, description = "Hora final (exclusiva, até 24)")
    )
)]
pub async fn get_page(
    State(app_state): State<AppState>,
    locale: Locale,
    FilterQuery(params): FilterQuery,
) -> Result<impl IntoResponse, ApiError> {
    let prepared = prepare(&app_state, &locale, params).await?;
    let data = app_state.dashboard_service.page(&prepared).await;

    let active_filters = app_state
        .settings
        .debug_show_filters
        .then(|| active_filters(&prepared));

    let page = DashboardPage {
        overview: overview_section(&app_state, &locale, &data.overview),
        chart: chart_section(&app_state, &locale, &data.chart),
        products: products_section(&app_state, &locale, &data.products),
        stores: stores_section(&app_state, &locale, &data.stores),
        active_filters,
    };

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/dashboard/overview
#[utoipa::path(
    get,
    path = "/api/dashboard/overview",
    tag = "Dashboard",
    responses(
        (status = 200, description = "KPIs e faturamento por dia", body = OverviewResponse),
        (status = 400, description = "Filtros inválidos")
    )
)]
pub async fn get_overview(
    State(app_state): State<AppState>,
    locale: Locale,
    FilterQuery(params): FilterQuery,
) -> Result<impl IntoResponse, ApiError> {
    let prepared = prepare(&app_state, &locale, params).await?;
    let service = &app_state.dashboard_service;
    let (overview, chart) = tokio::join!(service.overview(&prepared), service.chart(&prepared));

    let response = OverviewResponse {
        overview: overview_section(&app_state, &locale, &overview),
        chart: chart_section(&app_state, &locale, &chart),
    };

    Ok((StatusCode::OK, Json(response)))
}

// GET /api/dashboard/products
#[utoipa::path(
    get,
    path = "/api/dashboard/products",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Principais produtos pelos filtros globais", body = ProductsSection),
        (status = 400, description = "Filtros inválidos")
    )
)]
pub async fn get_products(
    State(app_state): State<AppState>,
    locale: Locale,
    FilterQuery(params): FilterQuery,
) -> Result<impl IntoResponse, ApiError> {
    let prepared = prepare(&app_state, &locale, params).await?;
    let result = app_state.dashboard_service.products(&prepared).await;

    Ok((StatusCode::OK, Json(products_section(&app_state, &locale, &result))))
}

// GET /api/dashboard/stores
#[utoipa::path(
    get,
    path = "/api/dashboard/stores",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Performance das lojas pelos filtros globais", body = StoresSection),
        (status = 400, description = "Filtros inválidos")
    )
)]
pub async fn get_stores(
    State(app_state): State<AppState>,
    locale: Locale,
    FilterQuery(params): FilterQuery,
) -> Result<impl IntoResponse, ApiError> {
    let prepared = prepare(&app_state, &locale, params).await?;
    let result = app_state.dashboard_service.stores(&prepared).await;

    Ok((StatusCode::OK, Json(stores_section(&app_state, &locale, &result))))
}

// GET /api/dashboard/products/export
#[utoipa::path(
    get,
    path = "/api/dashboard/products/export",
    tag = "Dashboard",
    responses(
        (status = 200, description = "relatorio_produtos.csv", content_type = "text/csv", body = String),
        (status = 404, description = "Nenhum produto para os filtros"),
        (status = 503, description = "Falha no banco de dados")
    )
)]
pub async fn export_products(
    State(app_state): State<AppState>,
    locale: Locale,
    FilterQuery(params): FilterQuery,
) -> Result<impl IntoResponse, ApiError> {
    let prepared = prepare(&app_state, &locale, params).await?;
    let result = app_state.dashboard_service.products(&prepared).await;

    csv_attachment(&app_state, &locale, result, "no_products", export::PRODUCTS_FILE_NAME)
}

// GET /api/dashboard/stores/export
#[utoipa::path(
    get,
    path = "/api/dashboard/stores/export",
    tag = "Dashboard",
    responses(
        (status = 200, description = "relatorio_lojas.csv", content_type = "text/csv", body = String),
        (status = 404, description = "Nenhuma loja para os filtros"),
        (status = 503, description = "Falha no banco de dados")
    )
)]
pub async fn export_stores(
    State(app_state): State<AppState>,
    locale: Locale,
    FilterQuery(params): FilterQuery,
) -> Result<impl IntoResponse, ApiError> {
    let prepared = prepare(&app_state, &locale, params).await?;
    let result = app_state.dashboard_service.stores(&prepared).await;

    csv_attachment(&app_state, &locale, result, "no_stores", export::STORES_FILE_NAME)
}
