// src/common/i18n.rs

use std::collections::HashMap;

use crate::middleware::i18n::Locale;

// Idioma usado quando não há tradução para o pedido
const FALLBACK_LANG: &str = "pt";

/// Mensagens exibidas ao usuário, por chave e idioma.
#[derive(Debug, Clone)]
pub struct I18nStore {
    // chave -> idioma -> texto
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let entries: &[(&'static str, &'static str, &'static str)] = &[
            ("validation", "pt", "Um ou mais filtros são inválidos."),
            ("validation", "en", "One or more filters are invalid."),
            ("malformed_query", "pt", "Parâmetros de consulta malformados"),
            ("malformed_query", "en", "Malformed query parameters"),
            ("unknown_filter_value", "pt", "Valor de filtro desconhecido"),
            ("unknown_filter_value", "en", "Unknown filter value"),
            ("invalid_date_range", "pt", "Período inválido"),
            ("invalid_date_range", "en", "Invalid date range"),
            ("reference_unavailable", "pt", "Não foi possível carregar lojas e canais do banco de dados."),
            ("reference_unavailable", "en", "Could not load stores and channels from the database."),
            ("no_data", "pt", "Nenhum dado encontrado para os filtros selecionados."),
            ("no_data", "en", "No data found for the selected filters."),
            ("no_chart_data", "pt", "Nenhum dado para o gráfico."),
            ("no_chart_data", "en", "No data for the chart."),
            ("no_products", "pt", "Nenhum produto encontrado para os filtros selecionados."),
            ("no_products", "en", "No products found for the selected filters."),
            ("no_stores", "pt", "Nenhuma loja encontrada para os filtros selecionados."),
            ("no_stores", "en", "No stores found for the selected filters."),
            ("database_error", "pt", "Erro ao conectar com o banco de dados"),
            ("database_error", "en", "Error connecting to the database"),
            ("internal", "pt", "Ocorreu um erro inesperado."),
            ("internal", "en", "An unexpected error occurred."),
        ];

        let mut messages: HashMap<&'static str, HashMap<&'static str, &'static str>> =
            HashMap::new();
        for (key, lang, text) in entries {
            messages.entry(*key).or_default().insert(*lang, *text);
        }

        Self { messages }
    }

    /// Busca a mensagem no idioma do pedido, caindo para português.
    /// Chave desconhecida devolve a própria chave, para ficar visível no front.
    pub fn get(&self, locale: &Locale, key: &'static str) -> String {
        self.messages
            .get(key)
            .and_then(|by_lang| {
                by_lang
                    .get(locale.0.as_str())
                    .or_else(|| by_lang.get(FALLBACK_LANG))
            })
            .map(|text| text.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
