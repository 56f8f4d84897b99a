use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Nosso tipo de erro interno, com `thiserror` para a ergonomia do `?`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Query string que nem chega a ser desserializada (ex.: `hourStart=abc`)
    #[error("Query string malformada: {0}")]
    MalformedQuery(String),

    #[error("Valor desconhecido para o filtro '{category}': {value}")]
    UnknownFilterValue { category: &'static str, value: String },

    #[error("Período inválido: {0}")]
    InvalidDateRange(String),

    // Sem lojas ou sem canais não dá para montar o WHERE
    #[error("Listas de referência indisponíveis: {0}")]
    ReferenceDataUnavailable(String),

    #[error("Nenhum dado para exportar")]
    NoData(&'static str),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro ao gerar CSV: {0}")]
    CsvError(#[from] csv::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

/// O erro que vai para o cliente: status HTTP + mensagem já traduzida.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MalformedQuery(_)
            | AppError::UnknownFilterValue { .. }
            | AppError::InvalidDateRange(_) => StatusCode::BAD_REQUEST,
            AppError::NoData(_) => StatusCode::NOT_FOUND,
            AppError::ReferenceDataUnavailable(_) | AppError::DatabaseError(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::CsvError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converte para a resposta HTTP no idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();
        let message = match self {
            AppError::ValidationError(errors) => {
                format!("{} {}", store.get(locale, "validation"), validation_details(errors))
            }
            AppError::MalformedQuery(detail) => {
                format!("{}: {detail}", store.get(locale, "malformed_query"))
            }
            AppError::UnknownFilterValue { category, value } => {
                format!("{} ({category}): {value}", store.get(locale, "unknown_filter_value"))
            }
            AppError::InvalidDateRange(detail) => {
                format!("{}: {detail}", store.get(locale, "invalid_date_range"))
            }
            AppError::ReferenceDataUnavailable(_) => store.get(locale, "reference_unavailable"),
            AppError::NoData(key) => store.get(locale, *key),
            AppError::DatabaseError(_) => store.get(locale, "database_error"),
            AppError::CsvError(_) | AppError::InternalServerError(_) => {
                store.get(locale, "internal")
            }
        };

        // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        ApiError { status, message }
    }
}

// Chave que o validator usa para os erros de `#[validate(schema(...))]`
const SCHEMA_ERRORS_KEY: &str = "__all__";

// "campo: msg1, msg2; campo2: msg". Erros de schema saem sem o prefixo.
fn validation_details(errors: &validator::ValidationErrors) -> String {
    let mut details: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, field_errors)| {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            if *field == SCHEMA_ERRORS_KEY {
                messages.join(", ")
            } else {
                format!("{field}: {}", messages.join(", "))
            }
        })
        .collect();
    details.sort();
    details.join("; ")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
