// src/services/filter_compiler.rs
//
// Traduz os filtros escolhidos na tela para o predicado SQL compartilhado
// pelas consultas agregadas (KPIs, gráfico, produtos e lojas).

use chrono::{Days, NaiveDate};

use crate::models::filters::{FilterSelection, NormalizedFilters, ReferenceLists, Selection, Weekday};

/// Aplica a regra "vazio = tudo" em cada categoria.
pub fn normalize(selection: FilterSelection, reference: &ReferenceLists) -> NormalizedFilters {
    NormalizedFilters {
        stores: Selection::from_choices(selection.stores, &reference.stores),
        products: Selection::from_choices(selection.products, &reference.products),
        channels: Selection::from_choices(selection.channels, &reference.channels),
        statuses: Selection::from_choices(selection.statuses, &reference.statuses),
        weekdays: Selection::from_choices(selection.weekdays, &Weekday::ALL),
        dates: selection.dates,
        hours: selection.hours,
    }
}

/// Monta o predicado (sem o `WHERE`) a partir dos filtros normalizados.
///
/// A ordem das cláusulas é fixa: lojas, canais, datas, horário, produtos,
/// dias da semana e status. As três últimas só aparecem quando a seleção
/// é um subconjunto estrito. O texto resultante também é a chave do cache,
/// então a mesma entrada sempre gera o mesmo texto.
///
/// # Panics
///
/// Se a lista efetiva de lojas ou de canais estiver vazia. Isso só acontece
/// se a normalização foi pulada ou as listas de referência chegaram vazias,
/// e um `IN ()` silencioso esconderia o defeito.
pub fn compile_where_clause(filters: &NormalizedFilters, reference: &ReferenceLists) -> String {
    let stores = filters.stores.values(&reference.stores);
    let channels = filters.channels.values(&reference.channels);

    assert!(!stores.is_empty(), "filtro de lojas vazio ao compilar o WHERE");
    assert!(!channels.is_empty(), "filtro de canais vazio ao compilar o WHERE");

    let mut clauses = vec![
        format!("st.name IN ({})", literal_list(&stores)),
        format!("ch.name IN ({})", literal_list(&channels)),
        date_clause(filters.dates.start, filters.dates.end),
        format!(
            "EXTRACT(HOUR FROM s.created_at) BETWEEN {} AND {}",
            filters.hours.start,
            filters.hours.last_included_hour()
        ),
    ];

    // Subquery em vez de JOIN: a venda entra inteira (com os outros produtos
    // do mesmo pedido), só restringimos QUAIS vendas entram.
    if let Selection::Subset(products) = &filters.products {
        let products: Vec<&String> = products.iter().collect();
        clauses.push(format!(
            "s.id IN (SELECT DISTINCT ps.sale_id FROM product_sales ps \
             JOIN products p ON ps.product_id = p.id WHERE p.name IN ({}))",
            literal_list(&products)
        ));
    }

    if let Selection::Subset(days) = &filters.weekdays {
        let numbers: Vec<String> = days.iter().map(|d| d.number().to_string()).collect();
        clauses.push(format!("EXTRACT(DOW FROM s.created_at) IN ({})", numbers.join(", ")));
    }

    if let Selection::Subset(statuses) = &filters.statuses {
        let statuses: Vec<&String> = statuses.iter().collect();
        clauses.push(format!("s.sale_status_desc IN ({})", literal_list(&statuses)));
    }

    clauses.join(" AND ")
}

// O fim é inclusivo no calendário: vai até o último instante do dia `end`.
// `end` chega limitado a hoje pelo serviço, então o dia seguinte sempre existe.
fn date_clause(start: NaiveDate, end: NaiveDate) -> String {
    let after_end = end
        .checked_add_days(Days::new(1))
        .expect("fim do período deveria estar limitado a hoje");
    format!(
        "s.created_at >= '{}' AND s.created_at < '{}'",
        start.format("%Y-%m-%d"),
        after_end.format("%Y-%m-%d")
    )
}

fn literal_list(values: &[&String]) -> String {
    values
        .iter()
        .map(|value| quote_literal(value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Literal de string do Postgres: aspas simples internas são dobradas.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filters::{DateRange, HourRange};

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn reference() -> ReferenceLists {
        ReferenceLists {
            stores: names(&["Centro", "Praia"]),
            products: names(&[
                "Batata", "Burger", "Coca", "Cookie", "Hot Dog", "Milkshake", "Nuggets",
                "Pizza", "Salada", "Suco",
            ]),
            channels: names(&["App", "Balcão", "iFood"]),
            statuses: names(&["CANCELLED", "COMPLETED"]),
        }
    }

    fn selection() -> FilterSelection {
        FilterSelection {
            stores: Vec::new(),
            products: Vec::new(),
            channels: Vec::new(),
            statuses: Vec::new(),
            weekdays: Vec::new(),
            dates: DateRange {
                start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            },
            hours: HourRange::FULL_DAY,
        }
    }

    fn compile(selection: FilterSelection) -> String {
        let reference = reference();
        compile_where_clause(&normalize(selection, &reference), &reference)
    }

    #[test]
    fn normalize_turns_empty_categories_into_all() {
        let normalized = normalize(selection(), &reference());
        assert!(normalized.stores.is_all());
        assert!(normalized.products.is_all());
        assert!(normalized.channels.is_all());
        assert!(normalized.statuses.is_all());
        assert!(normalized.weekdays.is_all());
    }

    #[test]
    fn normalize_is_idempotent() {
        let reference = reference();
        let mut raw = selection();
        raw.stores = names(&["Praia"]);
        raw.weekdays = vec![Weekday::Friday, Weekday::Saturday];

        let once = normalize(raw, &reference);
        let again = normalize(
            FilterSelection {
                stores: once.stores.values(&reference.stores).into_iter().cloned().collect(),
                products: once.products.values(&reference.products).into_iter().cloned().collect(),
                channels: once.channels.values(&reference.channels).into_iter().cloned().collect(),
                statuses: once.statuses.values(&reference.statuses).into_iter().cloned().collect(),
                weekdays: once.weekdays.values(&Weekday::ALL).into_iter().copied().collect(),
                dates: once.dates,
                hours: once.hours,
            },
            &reference,
        );
        assert_eq!(once, again);
    }

    #[test]
    fn default_selection_has_only_unconditional_clauses() {
        let sql = compile(selection());
        assert_eq!(
            sql,
            "st.name IN ('Centro', 'Praia') AND ch.name IN ('App', 'Balcão', 'iFood') \
             AND s.created_at >= '2025-01-01' AND s.created_at < '2025-04-01' \
             AND EXTRACT(HOUR FROM s.created_at) BETWEEN 0 AND 23"
        );
    }

    #[test]
    fn hour_end_is_translated_to_inclusive_bound() {
        let mut raw = selection();
        raw.hours = HourRange { start: 11, end: 15 };
        assert!(compile(raw).contains("EXTRACT(HOUR FROM s.created_at) BETWEEN 11 AND 14"));
    }

    #[test]
    fn status_subset_adds_only_status_clause() {
        let mut raw = selection();
        raw.statuses = names(&["COMPLETED"]);
        let sql = compile(raw);

        assert!(sql.ends_with("AND s.sale_status_desc IN ('COMPLETED')"));
        assert!(!sql.contains("product_sales"));
        assert!(!sql.contains("DOW"));
    }

    #[test]
    fn product_subset_filters_by_sale_id() {
        let mut raw = selection();
        raw.products = names(&["Burger"]);
        let sql = compile(raw);

        assert!(sql.contains(
            "s.id IN (SELECT DISTINCT ps.sale_id FROM product_sales ps \
             JOIN products p ON ps.product_id = p.id WHERE p.name IN ('Burger'))"
        ));
        assert!(!sql.contains("s.sale_status_desc"));
    }

    #[test]
    fn weekday_subset_lists_dow_numbers() {
        let mut raw = selection();
        raw.weekdays = vec![Weekday::Saturday, Weekday::Sunday];
        assert!(compile(raw).ends_with("AND EXTRACT(DOW FROM s.created_at) IN (0, 6)"));
    }

    #[test]
    fn all_seven_weekdays_omit_the_clause() {
        let mut raw = selection();
        raw.weekdays = Weekday::ALL.to_vec();
        assert!(!compile(raw).contains("DOW"));
    }

    #[test]
    fn optional_clauses_keep_fixed_order() {
        let mut raw = selection();
        raw.statuses = names(&["CANCELLED"]);
        raw.weekdays = vec![Weekday::Monday];
        raw.products = names(&["Pizza", "Coca"]);
        let sql = compile(raw.clone());

        let product = sql.find("product_sales").unwrap();
        let weekday = sql.find("DOW").unwrap();
        let status = sql.find("sale_status_desc").unwrap();
        assert!(product < weekday && weekday < status);
        assert_eq!(sql, compile(raw));
    }

    #[test]
    fn selecting_everything_explicitly_equals_selecting_nothing() {
        let reference = reference();
        let mut explicit = selection();
        explicit.stores = reference.stores.clone();
        explicit.products = reference.products.clone();
        explicit.channels = reference.channels.clone();
        explicit.statuses = names(&["COMPLETED"]);

        let mut implicit = selection();
        implicit.statuses = names(&["COMPLETED"]);

        assert_eq!(compile(explicit), compile(implicit));
    }

    #[test]
    fn single_quotes_are_escaped() {
        let mut reference = reference();
        reference.stores.push("Bob's".to_string());
        let mut raw = selection();
        raw.stores = names(&["Bob's"]);

        let sql = compile_where_clause(&normalize(raw, &reference), &reference);
        assert!(sql.starts_with("st.name IN ('Bob''s')"));
    }

    #[test]
    #[should_panic(expected = "fim do período deveria estar limitado a hoje")]
    fn last_representable_end_date_is_a_defect() {
        let mut selection = selection();
        selection.dates.end = NaiveDate::MAX;
        compile_where_clause(&normalize(selection, &reference()), &reference());
    }

    #[test]
    #[should_panic(expected = "filtro de lojas vazio")]
    fn empty_store_list_is_a_defect() {
        let mut reference = reference();
        reference.stores.clear();
        compile_where_clause(&normalize(selection(), &reference), &reference);
    }

    #[test]
    #[should_panic(expected = "filtro de canais vazio")]
    fn empty_channel_list_is_a_defect() {
        let mut reference = reference();
        reference.channels.clear();
        compile_where_clause(&normalize(selection(), &reference), &reference);
    }
}
