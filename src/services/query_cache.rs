// src/services/query_cache.rs
//
// Cache de resultados por texto exato da consulta. Assumimos que o banco
// não muda durante a vida do processo, então nada é invalidado.

use std::{collections::HashMap, future::Future, sync::Arc};

use tokio::sync::RwLock;

use crate::common::error::AppError;

pub struct QueryCache<T> {
    entries: RwLock<HashMap<String, Arc<Vec<T>>>>,
}

impl<T> QueryCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Devolve o resultado guardado para `sql` ou executa `load` e guarda.
    ///
    /// Só resultados de sucesso entram no cache: uma falha de conexão é
    /// tentada de novo na próxima requisição.
    pub async fn get_or_load<F, Fut>(&self, sql: &str, load: F) -> Result<Arc<Vec<T>>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, AppError>>,
    {
        if let Some(rows) = self.entries.read().await.get(sql) {
            tracing::debug!(rows = rows.len(), "Consulta servida do cache");
            return Ok(Arc::clone(rows));
        }

        // Corrida entre requisições iguais: a segunda escrita só repete o valor
        let rows = Arc::new(load().await?);
        self.entries
            .write()
            .await
            .insert(sql.to_string(), Arc::clone(&rows));

        Ok(rows)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn same_sql_hits_the_cache() {
        let cache: QueryCache<i32> = QueryCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let rows = cache
                .get_or_load("SELECT 1", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![1])
                })
                .await
                .unwrap();
            assert_eq!(*rows, vec![1]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn different_sql_is_a_different_entry() {
        let cache: QueryCache<i32> = QueryCache::new();
        cache.get_or_load("SELECT 1", || async { Ok(vec![1]) }).await.unwrap();
        let rows = cache.get_or_load("SELECT 2", || async { Ok(vec![2]) }).await.unwrap();

        assert_eq!(*rows, vec![2]);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache: QueryCache<i32> = QueryCache::new();
        let failed = cache
            .get_or_load("SELECT 1", || async {
                Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut))
            })
            .await;
        assert!(failed.is_err());
        assert_eq!(cache.len().await, 0);

        let rows = cache.get_or_load("SELECT 1", || async { Ok(vec![7]) }).await.unwrap();
        assert_eq!(*rows, vec![7]);
    }
}
