// Testes HTTP: o Router completo contra uma fonte em memória.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    build_router,
    config::{AppState, Settings},
    services::dashboard_service::tests::FakeSource,
};

fn app_with(source: FakeSource, settings: Settings) -> Router {
    build_router(AppState::with_source(settings, Arc::new(source)))
}

fn app() -> Router {
    app_with(FakeSource::with_data(), Settings::for_tests())
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_check() {
    let (status, _, body) = get(app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn filter_options_list_reference_values() {
    let (status, json) = get_json(app(), "/api/filters").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stores"], serde_json::json!(["Centro", "Praia"]));
    assert_eq!(json["defaultStatuses"], serde_json::json!(["COMPLETED"]));
    assert_eq!(json["weekdays"][0]["label"], "Domingo");
    assert_eq!(json["weekdays"][6]["value"], 6);
    assert_eq!(json["dates"]["start"], "2025-01-01");
    assert_eq!(json["hours"]["max"], 24);
}

#[tokio::test]
async fn page_formats_kpis_and_flags_empty_sections() {
    let (status, json) = get_json(app(), "/api/dashboard?statuses=COMPLETED&weekdays=5&weekdays=6").await;

    assert_eq!(status, StatusCode::OK);
    let kpis = &json["overview"]["kpis"];
    assert_eq!(kpis["totalRevenue"], "R$ 59.90");
    assert_eq!(kpis["totalSales"], "2 vendas");
    assert_eq!(kpis["averageTicket"], "R$ 29.95");
    assert_eq!(kpis["deliveryTime"], "31.2 min");
    assert_eq!(json["chart"]["points"][0]["day"], "2025-02-01");
    assert_eq!(json["products"]["rows"][0]["product"], "Burger");

    // A fonte devolve zero lojas: aviso, não erro
    assert_eq!(json["stores"]["rows"], serde_json::json!([]));
    assert_eq!(json["stores"]["notice"]["level"], "warning");
    assert_eq!(
        json["stores"]["notice"]["message"],
        "Nenhuma loja encontrada para os filtros selecionados."
    );
    assert!(json.get("activeFilters").is_none());
}

#[tokio::test]
async fn failed_query_shows_error_only_when_configured() {
    let failing = || FakeSource {
        fail_overview: true,
        ..FakeSource::with_data()
    };

    let (_, json) = get_json(app_with(failing(), Settings::for_tests()), "/api/dashboard").await;
    assert_eq!(json["overview"]["notice"]["level"], "error");
    assert!(json["overview"]["kpis"].is_null());
    assert_eq!(json["chart"]["points"].as_array().unwrap().len(), 1);

    let mut quiet = Settings::for_tests();
    quiet.show_error_messages = false;
    let (_, json) = get_json(app_with(failing(), quiet), "/api/dashboard").await;
    assert_eq!(json["overview"]["notice"]["level"], "warning");
    assert_eq!(
        json["overview"]["notice"]["message"],
        "Nenhum dado encontrado para os filtros selecionados."
    );
}

#[tokio::test]
async fn debug_flag_echoes_active_filters() {
    let mut settings = Settings::for_tests();
    settings.debug_show_filters = true;
    let app = app_with(FakeSource::with_data(), settings);

    let (status, json) = get_json(app, "/api/dashboard?stores=Praia&start=2025-02-01&end=2025-02-28").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["activeFilters"]["stores"], serde_json::json!(["Praia"]));
    assert_eq!(json["activeFilters"]["channels"], serde_json::json!(["App", "iFood"]));
    assert_eq!(json["activeFilters"]["start"], "2025-02-01");
    assert_eq!(json["activeFilters"]["end"], "2025-02-28");
}

#[tokio::test]
async fn invalid_hours_are_rejected() {
    let (status, json) = get_json(app(), "/api/dashboard/overview?hourStart=30").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("hour_start"));

    let (status, json) = get_json(app(), "/api/dashboard/overview?hourStart=15&hourEnd=10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Um ou mais filtros são inválidos. hourStart não pode ser maior que hourEnd"
    );
}

#[tokio::test]
async fn out_of_range_numbers_get_json_errors() {
    let (status, headers, body) = get(app(), "/api/dashboard?weekdays=9").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        json["error"],
        "Um ou mais filtros são inválidos. weekdays: dia da semana inválido: 9 (esperado 0 a 6)"
    );

    let (status, json) = get_json(app(), "/api/dashboard?hourStart=300").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("hour_start: deve estar entre 0 e 24"));
}

#[tokio::test]
async fn unparseable_query_is_translated_json() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/dashboard/stores?hourStart=abc")
                .header(header::ACCEPT_LANGUAGE, "en")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().starts_with("Malformed query parameters: "));
}

#[tokio::test]
async fn unknown_store_is_bad_request_in_client_language() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/dashboard/products?stores=Lua")
                .header(header::ACCEPT_LANGUAGE, "en-US")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Unknown filter value (stores): Lua");
}

#[tokio::test]
async fn product_export_is_a_csv_attachment() {
    let (status, headers, body) = get(app(), "/api/dashboard/products/export?products=Burger").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"relatorio_produtos.csv\""
    );
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "produto,quantidade_vendida,faturamento_produto\nBurger,2,39.8\n"
    );
}

#[tokio::test]
async fn empty_store_export_is_not_found() {
    let (status, json) = get_json(app(), "/api/dashboard/stores/export").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Nenhuma loja encontrada para os filtros selecionados.");
}

#[tokio::test]
async fn missing_reference_data_is_service_unavailable() {
    let (status, _) = get_json(app_with(FakeSource::default(), Settings::for_tests()), "/api/dashboard").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn openapi_document_lists_dashboard_paths() {
    let (status, json) = get_json(app(), "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/api/dashboard"].is_object());
    assert!(json["paths"]["/api/dashboard/stores/export"].is_object());
}
