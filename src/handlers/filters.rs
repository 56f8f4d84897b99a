// src/handlers/filters.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::{
        dashboard::{FilterOptions, HourBounds, WeekdayOption},
        filters::{HourRange, ReferenceLists, Weekday},
    },
};

// GET /api/filters
#[utoipa::path(
    get,
    path = "/api/filters",
    tag = "Filtros",
    responses(
        (status = 200, description = "Opções da barra lateral: lojas, produtos, canais, status, dias e limites", body = FilterOptions),
        (status = 503, description = "Falha ao carregar as listas de referência")
    )
)]
pub async fn get_filter_options(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let bounds = app_state
        .dashboard_service
        .filter_bounds(chrono::Local::now().date_naive())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let weekdays = Weekday::ALL
        .iter()
        .map(|day| WeekdayOption {
            label: day.label().to_string(),
            value: day.number(),
        })
        .collect();

    let options = FilterOptions {
        reference: ReferenceLists::clone(&bounds.reference),
        weekdays,
        default_statuses: bounds.default_statuses,
        dates: bounds.dates,
        hours: HourBounds {
            min: HourRange::FULL_DAY.start,
            max: HourRange::FULL_DAY.end,
        },
    };

    Ok((StatusCode::OK, Json(options)))
}
