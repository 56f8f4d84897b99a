// src/models/filters.rs

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- SELEÇÃO POR CATEGORIA ---

/// Decisão explícita de cada filtro: "tudo" ou um subconjunto estrito.
///
/// Uma seleção vazia vinda da interface significa "tudo", nunca "nada".
/// A conversão acontece em `filter_compiler::normalize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T: Ord> {
    All,
    Subset(BTreeSet<T>),
}

impl<T: Ord + Clone> Selection<T> {
    /// Decide entre `All` e `Subset` comparando com a lista de referência.
    pub fn from_choices<I>(chosen: I, reference: &[T]) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let chosen: BTreeSet<T> = chosen.into_iter().collect();
        if chosen.is_empty() || reference.iter().all(|value| chosen.contains(value)) {
            Selection::All
        } else {
            Selection::Subset(chosen)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Valores efetivamente selecionados, em ordem determinística.
    /// `All` devolve a lista de referência na ordem em que veio do banco.
    pub fn values<'a>(&'a self, reference: &'a [T]) -> Vec<&'a T> {
        match self {
            Selection::All => reference.iter().collect(),
            Selection::Subset(chosen) => chosen.iter().collect(),
        }
    }
}

// --- DIAS DA SEMANA ---

// A numeração segue o EXTRACT(DOW ...) do Postgres: domingo = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Rótulo mostrado no multiselect do front.
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Sunday => "Domingo",
            Weekday::Monday => "Segunda",
            Weekday::Tuesday => "Terça",
            Weekday::Wednesday => "Quarta",
            Weekday::Thursday => "Quinta",
            Weekday::Friday => "Sexta",
            Weekday::Saturday => "Sábado",
        }
    }
}

impl TryFrom<u8> for Weekday {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Weekday::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| format!("dia da semana inválido: {value} (esperado 0 a 6)"))
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> Self {
        day.number()
    }
}

// --- INTERVALOS ---

/// Intervalo de datas, inclusivo nas duas pontas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Faixa de horário: início inclusivo, fim exclusivo (0..=24).
/// (0, 24) significa "o dia todo".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    pub start: u8,
    pub end: u8,
}

impl HourRange {
    pub const FULL_DAY: HourRange = HourRange { start: 0, end: 24 };

    /// Último horário incluído, já no formato inclusivo do BETWEEN.
    /// Para (h, h) o resultado é h - 1 e o BETWEEN não casa nenhuma linha.
    pub fn last_included_hour(&self) -> i16 {
        i16::from(self.end) - 1
    }
}

// --- LISTAS DE REFERÊNCIA ---

/// Todos os valores conhecidos de cada categoria. Carregadas uma vez por processo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceLists {
    pub stores: Vec<String>,
    pub products: Vec<String>,
    pub channels: Vec<String>,
    pub statuses: Vec<String>,
}

// --- SELEÇÃO CRUA E NORMALIZADA ---

/// O que o usuário escolheu, sem tratamento. Listas vazias são válidas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub stores: Vec<String>,
    pub products: Vec<String>,
    pub channels: Vec<String>,
    pub statuses: Vec<String>,
    pub weekdays: Vec<Weekday>,
    pub dates: DateRange,
    pub hours: HourRange,
}

/// Seleção pronta para virar SQL: cada categoria já decidida.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFilters {
    pub stores: Selection<String>,
    pub products: Selection<String>,
    pub channels: Selection<String>,
    pub statuses: Selection<String>,
    pub weekdays: Selection<Weekday>,
    pub dates: DateRange,
    pub hours: HourRange,
}
