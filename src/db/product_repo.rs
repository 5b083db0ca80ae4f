// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{Product, SortDir, SortField},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras (escopadas)
    // ---
    // O filtro de escopo chega como Option<Uuid>: None = admin (todas as
    // linhas), Some(id) = só as linhas daquele dono. Os filtros opcionais
    // usam o padrão "($n IS NULL OR ...)" para manter o SQL estático.

    pub async fn count_filtered(
        &self,
        owner: Option<Uuid>,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE ($1::uuid IS NULL OR owner_id = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR category = $3)
            "#,
        )
        .bind(owner)
        .bind(search)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn list_filtered(
        &self,
        owner: Option<Uuid>,
        search: Option<&str>,
        category: Option<&str>,
        sort_field: SortField,
        sort_dir: SortDir,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, AppError> {
        // ORDER BY não aceita bind; a coluna e a direção vêm de enums
        // fechados (nunca da query string crua).
        let sql = format!(
            r#"
            SELECT *
            FROM products
            WHERE ($1::uuid IS NULL OR owner_id = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR category = $3)
            ORDER BY {} {}
            LIMIT $4 OFFSET $5
            "#,
            sort_field.column(),
            sort_dir.keyword()
        );

        let items = sqlx::query_as::<_, Product>(&sql)
            .bind(owner)
            .bind(search)
            .bind(category)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn list_categories(&self, owner: Option<Uuid>) -> Result<Vec<String>, AppError> {
        let categories = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category
            FROM products
            WHERE category IS NOT NULL
              AND ($1::uuid IS NULL OR owner_id = $1)
            ORDER BY category ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn list_low_stock(
        &self,
        owner: Option<Uuid>,
        threshold: i32,
    ) -> Result<Vec<Product>, AppError> {
        let items = sqlx::query_as::<_, Product>(
            r#"
            SELECT *
            FROM products
            WHERE quantity <= $2
              AND ($1::uuid IS NULL OR owner_id = $1)
            ORDER BY quantity ASC
            "#,
        )
        .bind(owner)
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    // Leitura por id sem escopo (semântica herdada: qualquer usuário
    // autenticado pode ler um item pelo id).
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let maybe_product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_product)
    }

    // ---
    // Escritas (transacionais)
    // ---
    // Estas recebem o executor da transação do serviço, para que a
    // mutação e a entrada de auditoria commitem juntas.

    /// Busca com lock de linha. Serializa decrementos concorrentes no
    /// mesmo produto: o segundo `decrease` espera o primeiro commitar e
    /// relê a quantidade já atualizada.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_product =
            sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(maybe_product)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        name: &str,
        description: Option<&str>,
        quantity: i32,
        category: Option<&str>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, quantity, category, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(quantity)
        .bind(category)
        .bind(owner_id)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    // Atualização parcial via COALESCE: campo nulo = mantém o valor atual.
    pub async fn update_partial<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        quantity: Option<i32>,
        category: Option<&str>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name        = COALESCE($2, name),
                description = COALESCE($3, description),
                quantity    = COALESCE($4, quantity),
                category    = COALESCE($5, category),
                updated_at  = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(quantity)
        .bind(category)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    pub async fn set_quantity<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        quantity: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET quantity = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(quantity)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
