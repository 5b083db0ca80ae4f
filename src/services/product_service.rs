// src/services/product_service.rs
//
// O motor de inventário. Toda mutação roda numa única transação que
// contém a escrita E a entrada de auditoria: ou as duas commitam, ou
// nenhuma. O lock de linha (FOR UPDATE) serializa ajustes concorrentes
// de estoque no mesmo produto.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, policy},
    db::{LogRepository, ProductRepository},
    middleware::auth::CurrentUser,
    models::{
        log::AuditAction,
        product::{CreateProductPayload, Product, ProductListQuery, ProductPage, UpdateProductPayload},
    },
};

const ENTITY_PRODUCT: &str = "product";

pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    Increase,
    Decrease,
}

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    log_repo: LogRepository,
    pool: PgPool,
}

impl ProductService {
    pub fn new(product_repo: ProductRepository, log_repo: LogRepository, pool: PgPool) -> Self {
        Self {
            product_repo,
            log_repo,
            pool,
        }
    }

    // Listagem paginada. O escopo por papel entra ANTES dos filtros de
    // busca/categoria; `total` conta o resultado filtrado inteiro,
    // independente da janela de página.
    pub async fn list(
        &self,
        caller: &CurrentUser,
        query: &ProductListQuery,
    ) -> Result<ProductPage, AppError> {
        let owner = policy::scope_for(caller).owner_filter();
        let page = query.page();
        let page_size = query.page_size();

        let total = self
            .product_repo
            .count_filtered(owner, query.search(), query.category())
            .await?;

        let items = self
            .product_repo
            .list_filtered(
                owner,
                query.search(),
                query.category(),
                query.sort_field(),
                query.sort_dir(),
                page_size,
                query.offset(),
            )
            .await?;

        Ok(ProductPage {
            items,
            total,
            page,
            page_size,
        })
    }

    pub async fn categories(&self, caller: &CurrentUser) -> Result<Vec<String>, AppError> {
        let owner = policy::scope_for(caller).owner_filter();
        self.product_repo.list_categories(owner).await
    }

    pub async fn low_stock(
        &self,
        caller: &CurrentUser,
        threshold: Option<i32>,
    ) -> Result<Vec<Product>, AppError> {
        let owner = policy::scope_for(caller).owner_filter();
        let threshold = threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
        self.product_repo.list_low_stock(owner, threshold).await
    }

    // Leitura por id: visível a qualquer autenticado, sem escopo.
    // Inconsistente com a listagem de propósito (semântica herdada,
    // sinalizada ao time de produto em vez de unificada por conta própria).
    pub async fn get(&self, id: Uuid) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    pub async fn create(
        &self,
        caller: &CurrentUser,
        payload: CreateProductPayload,
    ) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self
            .product_repo
            .insert(
                &mut *tx,
                caller.user_id,
                &payload.name,
                payload.description.as_deref(),
                payload.quantity,
                payload.category.as_deref(),
            )
            .await?;

        self.log_repo
            .append(
                &mut *tx,
                caller.user_id,
                AuditAction::CreateProduct,
                ENTITY_PRODUCT,
                Some(product.id),
            )
            .await?;

        tx.commit().await?;
        Ok(product)
    }

    // Atualização parcial: campos ausentes ficam intocados.
    // Existência primeiro (NotFound), dono/admin depois (Forbidden).
    pub async fn update(
        &self,
        caller: &CurrentUser,
        id: Uuid,
        payload: UpdateProductPayload,
    ) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = self
            .product_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;
        policy::ensure_can_modify(caller, existing.owner_id)?;

        let updated = self
            .product_repo
            .update_partial(
                &mut *tx,
                id,
                payload.name.as_deref(),
                payload.description.as_deref(),
                payload.quantity,
                payload.category.as_deref(),
            )
            .await?;

        self.log_repo
            .append(
                &mut *tx,
                caller.user_id,
                AuditAction::UpdateProduct,
                ENTITY_PRODUCT,
                Some(updated.id),
            )
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    // Ajuste de estoque. O FOR UPDATE garante que dois `decrease`
    // concorrentes lendo quantity=5 não commitem os dois: o segundo
    // espera o lock e relê o valor já decrementado.
    pub async fn adjust_stock(
        &self,
        caller: &CurrentUser,
        id: Uuid,
        direction: StockDirection,
        amount: i32,
    ) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = self
            .product_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;
        policy::ensure_can_modify(caller, existing.owner_id)?;

        let (new_quantity, action) = match direction {
            StockDirection::Increase => {
                let q = existing
                    .quantity
                    .checked_add(amount)
                    .ok_or_else(|| anyhow::anyhow!("Overflow na quantidade do produto {}", id))?;
                (q, AuditAction::IncreaseStock)
            }
            StockDirection::Decrease => {
                if amount > existing.quantity {
                    // Rollback implícito no drop da transação: a
                    // quantidade fica como estava e nada é auditado.
                    return Err(AppError::InsufficientStock);
                }
                (existing.quantity - amount, AuditAction::DecreaseStock)
            }
        };

        let updated = self
            .product_repo
            .set_quantity(&mut *tx, id, new_quantity)
            .await?;

        self.log_repo
            .append(
                &mut *tx,
                caller.user_id,
                action,
                ENTITY_PRODUCT,
                Some(updated.id),
            )
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, caller: &CurrentUser, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = self
            .product_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;
        policy::ensure_can_modify(caller, existing.owner_id)?;

        self.product_repo.delete(&mut *tx, id).await?;

        self.log_repo
            .append(
                &mut *tx,
                caller.user_id,
                AuditAction::DeleteProduct,
                ENTITY_PRODUCT,
                Some(id),
            )
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

// Testes de integração contra um Postgres real. O atributo #[sqlx::test]
// cria um banco descartável por teste a partir de DATABASE_URL e roda as
// migrações; ficam como #[ignore] porque o CI padrão não sobe Postgres.
// Rodar com: cargo test -- --ignored
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use crate::models::product::{CreateProductPayload, ProductListQuery, UpdateProductPayload};

    fn service(pool: &PgPool) -> ProductService {
        ProductService::new(
            ProductRepository::new(pool.clone()),
            LogRepository::new(pool.clone()),
            pool.clone(),
        )
    }

    async fn seed_user(pool: &PgPool, role: Role) -> CurrentUser {
        let suffix = Uuid::new_v4().simple().to_string();
        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(format!("u_{suffix}"))
        .bind(format!("u_{suffix}@example.com"))
        .bind("$2b$12$hash-que-nunca-confere")
        .bind(role)
        .fetch_one(pool)
        .await
        .expect("falha ao inserir usuário de teste");
        CurrentUser { user_id, role }
    }

    async fn audit_count(pool: &PgPool, entity_id: Uuid, action: AuditAction) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM logs WHERE entity_id = $1 AND action = $2")
            .bind(entity_id)
            .bind(action)
            .fetch_one(pool)
            .await
            .expect("falha ao contar entradas de auditoria")
    }

    fn payload(name: &str, quantity: i32) -> CreateProductPayload {
        CreateProductPayload {
            name: name.into(),
            description: None,
            quantity,
            category: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres acessível via DATABASE_URL"]
    async fn should_append_exactly_one_audit_entry_per_mutation(pool: PgPool) {
        let svc = service(&pool);
        let caller = seed_user(&pool, Role::User).await;

        let product = svc.create(&caller, payload("Teclado", 10)).await.unwrap();
        assert_eq!(audit_count(&pool, product.id, AuditAction::CreateProduct).await, 1);

        svc.adjust_stock(&caller, product.id, StockDirection::Increase, 5)
            .await
            .unwrap();
        assert_eq!(audit_count(&pool, product.id, AuditAction::IncreaseStock).await, 1);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logs WHERE entity_id = $1")
            .bind(product.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(total, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres acessível via DATABASE_URL"]
    async fn should_leave_quantity_untouched_when_decrease_exceeds_stock(pool: PgPool) {
        let svc = service(&pool);
        let caller = seed_user(&pool, Role::User).await;
        let product = svc.create(&caller, payload("Mouse", 3)).await.unwrap();

        let result = svc
            .adjust_stock(&caller, product.id, StockDirection::Decrease, 5)
            .await;
        assert!(matches!(result, Err(AppError::InsufficientStock)));

        let unchanged = svc.get(product.id).await.unwrap();
        assert_eq!(unchanged.quantity, 3);
        assert_eq!(audit_count(&pool, product.id, AuditAction::DecreaseStock).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres acessível via DATABASE_URL"]
    async fn should_scope_listing_by_role_and_gate_foreign_mutations(pool: PgPool) {
        let svc = service(&pool);
        let alice = seed_user(&pool, Role::User).await;
        let bob = seed_user(&pool, Role::User).await;
        let admin = seed_user(&pool, Role::Admin).await;

        let product = svc.create(&alice, payload("Monitor", 2)).await.unwrap();

        let query = ProductListQuery::default();
        assert_eq!(svc.list(&alice, &query).await.unwrap().total, 1);
        assert_eq!(svc.list(&bob, &query).await.unwrap().total, 0);
        assert_eq!(svc.list(&admin, &query).await.unwrap().total, 1);

        // Produto existe mas não é do Bob: Forbidden, não NotFound.
        let update = UpdateProductPayload {
            name: Some("Monitor 4K".into()),
            description: None,
            quantity: None,
            category: None,
        };
        let denied = svc.update(&bob, product.id, update).await;
        assert!(matches!(denied, Err(AppError::Forbidden)));

        let missing = svc.delete(&bob, Uuid::new_v4()).await;
        assert!(matches!(missing, Err(AppError::ProductNotFound)));

        // Admin altera produto alheio, e a auditoria registra quem fez.
        svc.adjust_stock(&admin, product.id, StockDirection::Increase, 1)
            .await
            .unwrap();
        let actor: Uuid = sqlx::query_scalar(
            "SELECT user_id FROM logs WHERE entity_id = $1 AND action = $2",
        )
        .bind(product.id)
        .bind(AuditAction::IncreaseStock)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(actor, admin.user_id);
    }
}
