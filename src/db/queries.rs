// src/db/queries.rs
//
// Templates das consultas agregadas. Todas recebem o mesmo predicado
// gerado por `filter_compiler::compile_where_clause`.

pub const STORES_SQL: &str = "SELECT name FROM stores ORDER BY name";
pub const PRODUCTS_SQL: &str = "SELECT name FROM products ORDER BY name";
pub const CHANNELS_SQL: &str = "SELECT name FROM channels ORDER BY name";
pub const STATUSES_SQL: &str = "SELECT DISTINCT sale_status_desc FROM sales \
     WHERE sale_status_desc IS NOT NULL ORDER BY sale_status_desc";

// Casts explícitos: COUNT vira BIGINT, somas viram NUMERIC e o tempo médio
// vira FLOAT8, para casar com os tipos de `models::dashboard`.

pub fn overview_kpis(where_sql: &str) -> String {
    format!(
        r#"
        SELECT
            COUNT(s.id)::BIGINT AS total_sales,
            SUM(s.total_amount)::NUMERIC AS total_revenue,
            AVG(s.total_amount)::NUMERIC AS average_ticket,
            AVG(s.delivery_seconds / 60.0)::FLOAT8 AS avg_delivery_minutes
        FROM sales s
        JOIN stores st ON s.store_id = st.id
        JOIN channels ch ON s.channel_id = ch.id
        WHERE {where_sql}
        "#
    )
}

pub fn daily_revenue(where_sql: &str) -> String {
    format!(
        r#"
        SELECT
            DATE(s.created_at) AS day,
            SUM(s.total_amount)::NUMERIC AS revenue
        FROM sales s
        JOIN stores st ON s.store_id = st.id
        JOIN channels ch ON s.channel_id = ch.id
        WHERE {where_sql}
        GROUP BY day
        ORDER BY day
        "#
    )
}

pub fn product_breakdown(where_sql: &str, limit: Option<u32>) -> String {
    let sql = format!(
        r#"
        SELECT
            p.name AS product,
            COUNT(ps.id)::BIGINT AS quantity_sold,
            SUM(ps.total_price)::NUMERIC AS revenue
        FROM product_sales ps
        JOIN products p ON ps.product_id = p.id
        JOIN sales s ON ps.sale_id = s.id
        JOIN stores st ON s.store_id = st.id
        JOIN channels ch ON s.channel_id = ch.id
        WHERE {where_sql}
        GROUP BY p.name
        ORDER BY revenue DESC
        "#
    );
    with_limit(sql, limit)
}

pub fn store_breakdown(where_sql: &str, limit: Option<u32>) -> String {
    let sql = format!(
        r#"
        SELECT
            st.name AS store,
            COUNT(s.id)::BIGINT AS total_sales,
            SUM(s.total_amount)::NUMERIC AS total_revenue,
            AVG(s.total_amount)::NUMERIC AS average_ticket,
            AVG(s.delivery_seconds / 60.0)::FLOAT8 AS avg_delivery_minutes
        FROM sales s
        JOIN stores st ON s.store_id = st.id
        JOIN channels ch ON s.channel_id = ch.id
        WHERE {where_sql}
        GROUP BY st.name
        ORDER BY total_revenue DESC
        "#
    );
    with_limit(sql, limit)
}

fn with_limit(mut sql: String, limit: Option<u32>) -> String {
    if let Some(limit) = limit {
        sql.push_str(&format!("LIMIT {limit}\n"));
    }
    sql
}
