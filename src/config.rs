// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;

use crate::{
    common::i18n::I18nStore,
    db::{DashboardRepository, SalesSource},
    services::dashboard_service::DashboardService,
};

// Limite máximo aceito para LIMIT_LIST_VIEW_AMOUNT
const LIST_VIEW_AMOUNT_CAP: u32 = 1000;

/// Configurações lidas do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub server_addr: String,
    pub db_max_connections: u32,
    // Data menor que todas as vendas; limite inferior do seletor de período
    pub min_date: NaiveDate,
    pub limit_list_view: bool,
    // Quantos produtos/lojas aparecem na lista
    pub limit_list_view_amount: u32,
    pub debug_show_filters: bool,
    pub show_error_messages: bool,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta as configurações a partir de uma função de busca (testável).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?;

        let min_date = match lookup("MIN_DATE") {
            Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .with_context(|| format!("MIN_DATE inválida: {raw} (use AAAA-MM-DD)"))?,
            None => NaiveDate::from_ymd_opt(2025, 1, 1).context("data padrão inválida")?,
        };

        let limit_list_view = flag_or(&lookup, "LIMIT_LIST_VIEW", false)?;
        let limit_list_view_amount = parse_or(&lookup, "LIMIT_LIST_VIEW_AMOUNT", 50)?;
        if limit_list_view_amount == 0 || limit_list_view_amount > LIST_VIEW_AMOUNT_CAP {
            bail!(
                "LIMIT_LIST_VIEW_AMOUNT deve estar entre 1 e {LIST_VIEW_AMOUNT_CAP}, veio {limit_list_view_amount}"
            );
        }

        let debug_show_filters = flag_or(&lookup, "DEBUG_SHOW_FILTERS", false)?;
        let show_error_messages = flag_or(&lookup, "SHOW_ERROR_MESSAGES", true)?;

        Ok(Self {
            database_url,
            server_addr,
            db_max_connections,
            min_date,
            limit_list_view,
            limit_list_view_amount,
            debug_show_filters,
            show_error_messages,
        })
    }

    /// LIMIT aplicado às listas de produtos e lojas, se ligado.
    pub fn list_limit(&self) -> Option<u32> {
        self.limit_list_view.then_some(self.limit_list_view_amount)
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/test".to_string(),
            server_addr: "127.0.0.1:0".to_string(),
            db_max_connections: 1,
            min_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            limit_list_view: false,
            limit_list_view_amount: 50,
            debug_show_filters: false,
            show_error_messages: true,
        }
    }
}

fn parse_or<F>(lookup: &F, key: &str, default: u32) -> anyhow::Result<u32>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} deve ser um número inteiro, veio '{raw}'")),
        None => Ok(default),
    }
}

fn flag_or<F>(lookup: &F, key: &str, default: bool) -> anyhow::Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|raw| raw.trim().to_lowercase()) {
        None => Ok(default),
        Some(raw) => match raw.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => bail!("{key} deve ser true ou false, veio '{raw}'"),
        },
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub dashboard_service: DashboardService,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let repo = DashboardRepository::new(db_pool);
        Ok(Self::with_source(settings, Arc::new(repo)))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_source(settings: Settings, source: Arc<dyn SalesSource>) -> Self {
        let settings = Arc::new(settings);
        let dashboard_service = DashboardService::new(source, Arc::clone(&settings));

        Self {
            settings,
            dashboard_service,
            i18n_store: Arc::new(I18nStore::new()),
        }
    }
}
