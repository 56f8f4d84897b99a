// src/services/dashboard_service.rs
//
// O pipeline da página: filtros -> normalização -> WHERE -> consultas.
// Cada consulta roda e falha de forma independente.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::OnceCell;

use crate::{
    common::error::AppError,
    config::Settings,
    db::{queries, SalesSource},
    models::{
        dashboard::{DailyRevenue, OverviewKpis, ProductBreakdown, StoreBreakdown},
        filters::{DateRange, FilterSelection, HourRange, NormalizedFilters, ReferenceLists, Weekday},
    },
    services::{filter_compiler, query_cache::QueryCache},
};

// Seleção inicial de status sugerida ao front
const DEFAULT_STATUS: &str = "COMPLETED";

/// Resultado de uma seção do dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionResult<T> {
    Ready(Vec<T>),
    // Consulta válida, nenhuma linha
    Empty,
    // Falha na fonte de dados; o texto é o detalhe técnico
    Failed(String),
}

impl<T: Clone> SectionResult<T> {
    fn from_query(section: &'static str, result: Result<Arc<Vec<T>>, AppError>) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => SectionResult::Empty,
            Ok(rows) => SectionResult::Ready(rows.as_ref().clone()),
            Err(e) => {
                tracing::warn!(section, error = %e, "Consulta do dashboard falhou");
                SectionResult::Failed(e.to_string())
            }
        }
    }

    pub fn rows(&self) -> &[T] {
        match self {
            SectionResult::Ready(rows) => rows,
            SectionResult::Empty | SectionResult::Failed(_) => &[],
        }
    }
}

/// Filtros já validados, normalizados e compilados para uma requisição.
#[derive(Debug, Clone)]
pub struct PreparedFilters {
    pub filters: NormalizedFilters,
    pub where_sql: String,
    pub reference: Arc<ReferenceLists>,
}

/// Entrada crua do front; datas ausentes ainda não foram resolvidas.
#[derive(Debug, Clone, Default)]
pub struct FilterInput {
    pub stores: Vec<String>,
    pub products: Vec<String>,
    pub channels: Vec<String>,
    pub statuses: Vec<String>,
    pub weekdays: Vec<Weekday>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub hours: Option<HourRange>,
}

pub struct PageData {
    pub overview: SectionResult<OverviewKpis>,
    pub chart: SectionResult<DailyRevenue>,
    pub products: SectionResult<ProductBreakdown>,
    pub stores: SectionResult<StoreBreakdown>,
}

pub struct FilterBounds {
    pub reference: Arc<ReferenceLists>,
    pub default_statuses: Vec<String>,
    pub dates: DateRange,
}

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn SalesSource>,
    settings: Arc<Settings>,
    reference: Arc<OnceCell<Arc<ReferenceLists>>>,
    overview_cache: Arc<QueryCache<OverviewKpis>>,
    chart_cache: Arc<QueryCache<DailyRevenue>>,
    products_cache: Arc<QueryCache<ProductBreakdown>>,
    stores_cache: Arc<QueryCache<StoreBreakdown>>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn SalesSource>, settings: Arc<Settings>) -> Self {
        Self {
            source,
            settings,
            reference: Arc::new(OnceCell::new()),
            overview_cache: Arc::new(QueryCache::new()),
            chart_cache: Arc::new(QueryCache::new()),
            products_cache: Arc::new(QueryCache::new()),
            stores_cache: Arc::new(QueryCache::new()),
        }
    }

    /// Listas de referência, carregadas uma vez por processo.
    /// Uma falha não fica memorizada: a próxima requisição tenta de novo.
    pub async fn reference_lists(&self) -> Result<Arc<ReferenceLists>, AppError> {
        let lists = self
            .reference
            .get_or_try_init(|| async {
                let lists = self.source.reference_lists().await?;
                Ok::<_, AppError>(Arc::new(lists))
            })
            .await?;

        Ok(Arc::clone(lists))
    }

    pub async fn filter_bounds(&self, today: NaiveDate) -> Result<FilterBounds, AppError> {
        let reference = self.reference_lists().await?;
        let default_statuses = reference
            .statuses
            .iter()
            .filter(|status| status.as_str() == DEFAULT_STATUS)
            .cloned()
            .collect();

        Ok(FilterBounds {
            reference,
            default_statuses,
            dates: DateRange {
                start: self.settings.min_date,
                end: today,
            },
        })
    }

    /// Valida a entrada, aplica "vazio = tudo" e compila o WHERE.
    pub async fn prepare(&self, input: FilterInput, today: NaiveDate) -> Result<PreparedFilters, AppError> {
        let reference = self.reference_lists().await?;

        if reference.stores.is_empty() || reference.channels.is_empty() {
            return Err(AppError::ReferenceDataUnavailable(format!(
                "{} lojas e {} canais cadastrados",
                reference.stores.len(),
                reference.channels.len()
            )));
        }

        ensure_known("stores", &input.stores, &reference.stores)?;
        ensure_known("products", &input.products, &reference.products)?;
        ensure_known("channels", &input.channels, &reference.channels)?;
        ensure_known("statuses", &input.statuses, &reference.statuses)?;

        let dates = resolve_dates(input.start, input.end, self.settings.min_date, today)?;

        let selection = FilterSelection {
            stores: input.stores,
            products: input.products,
            channels: input.channels,
            statuses: input.statuses,
            weekdays: input.weekdays,
            dates,
            hours: input.hours.unwrap_or(HourRange::FULL_DAY),
        };

        let filters = filter_compiler::normalize(selection, &reference);
        let where_sql = filter_compiler::compile_where_clause(&filters, &reference);

        if self.settings.debug_show_filters {
            tracing::info!(%where_sql, "Filtros compilados");
        }

        Ok(PreparedFilters {
            filters,
            where_sql,
            reference,
        })
    }

    fn list_limit(&self) -> Option<u32> {
        self.settings.list_limit()
    }

    pub async fn overview(&self, prepared: &PreparedFilters) -> SectionResult<OverviewKpis> {
        let sql = queries::overview_kpis(&prepared.where_sql);
        let result = self
            .overview_cache
            .get_or_load(&sql, || self.source.overview_kpis(&sql))
            .await;
        SectionResult::from_query("overview", result)
    }

    pub async fn chart(&self, prepared: &PreparedFilters) -> SectionResult<DailyRevenue> {
        let sql = queries::daily_revenue(&prepared.where_sql);
        let result = self
            .chart_cache
            .get_or_load(&sql, || self.source.daily_revenue(&sql))
            .await;
        SectionResult::from_query("chart", result)
    }

    pub async fn products(&self, prepared: &PreparedFilters) -> SectionResult<ProductBreakdown> {
        let sql = queries::product_breakdown(&prepared.where_sql, self.list_limit());
        let result = self
            .products_cache
            .get_or_load(&sql, || self.source.product_breakdown(&sql))
            .await;
        SectionResult::from_query("products", result)
    }

    pub async fn stores(&self, prepared: &PreparedFilters) -> SectionResult<StoreBreakdown> {
        let sql = queries::store_breakdown(&prepared.where_sql, self.list_limit());
        let result = self
            .stores_cache
            .get_or_load(&sql, || self.source.store_breakdown(&sql))
            .await;
        SectionResult::from_query("stores", result)
    }

    /// Todas as seções; uma falha não impede as outras.
    pub async fn page(&self, prepared: &PreparedFilters) -> PageData {
        let (overview, chart, products, stores) = tokio::join!(
            self.overview(prepared),
            self.chart(prepared),
            self.products(prepared),
            self.stores(prepared),
        );

        PageData {
            overview,
            chart,
            products,
            stores,
        }
    }
}

fn ensure_known(category: &'static str, chosen: &[String], reference: &[String]) -> Result<(), AppError> {
    match chosen.iter().find(|value| !reference.contains(value)) {
        Some(unknown) => Err(AppError::UnknownFilterValue {
            category,
            value: unknown.clone(),
        }),
        None => Ok(()),
    }
}

/// Sem datas: [data mínima, hoje]. Só o início: [início, hoje].
fn resolve_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    min_date: NaiveDate,
    today: NaiveDate,
) -> Result<DateRange, AppError> {
    let start = start.unwrap_or(min_date);
    let end = end.unwrap_or(today);

    if start > end {
        return Err(AppError::InvalidDateRange(format!("{start} é depois de {end}")));
    }
    if start < min_date {
        return Err(AppError::InvalidDateRange(format!("{start} é anterior a {min_date}")));
    }
    if end > today {
        return Err(AppError::InvalidDateRange(format!("{end} é posterior a {today}")));
    }

    Ok(DateRange { start, end })
}
