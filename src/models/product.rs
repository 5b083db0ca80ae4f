// src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, max = 100, message = "O nome deve ter entre 1 e 100 caracteres."))]
    pub name: String,

    #[validate(length(max = 500, message = "A descrição pode ter no máximo 500 caracteres."))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i32,

    #[validate(length(max = 100, message = "A categoria pode ter no máximo 100 caracteres."))]
    pub category: Option<String>,
}

// Atualização parcial: campo ausente = campo intocado.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, max = 100, message = "O nome deve ter entre 1 e 100 caracteres."))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "A descrição pode ter no máximo 500 caracteres."))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: Option<i32>,

    #[validate(length(max = 100, message = "A categoria pode ter no máximo 100 caracteres."))]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdjustStockPayload {
    #[validate(range(min = 0, message = "O valor não pode ser negativo."))]
    pub amount: i32,
}

// --- Ordenação ---
// Lista branca de colunas. Qualquer valor fora dela cai em CreatedAt,
// nunca chega ao SQL como string livre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Quantity,
    Category,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("id") => SortField::Id,
            Some("name") => SortField::Name,
            Some("quantity") => SortField::Quantity,
            Some("category") => SortField::Category,
            Some("updated_at") => SortField::UpdatedAt,
            _ => SortField::CreatedAt,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Quantity => "quantity",
            SortField::Category => "category",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("asc") => SortDir::Asc,
            _ => SortDir::Desc,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

// Query string da listagem paginada
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Filtro por substring do nome
    pub search: Option<String>,
    /// Filtro exato por categoria
    pub category: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// id | name | quantity | category | created_at | updated_at
    pub sort_by: Option<String>,
    /// asc | desc
    pub sort_dir: Option<String>,
}

impl ProductListQuery {
    /// Página mínima é 1; valores menores voltam para 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Janela da página em linhas. Saturante: uma página absurda vira um
    /// OFFSET gigante (lista vazia), nunca overflow nem valor negativo.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }

    /// Filtro de busca; string vazia (`?search=`) conta como ausente.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// Filtro de categoria; string vazia conta como ausente.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|s| !s.is_empty())
    }

    /// Fora de [1, 100] volta para o padrão 10 (não é clamp no limite).
    pub fn page_size(&self) -> i64 {
        match self.page_size {
            Some(n) if (1..=100).contains(&n) => n,
            _ => 10,
        }
    }

    pub fn sort_field(&self) -> SortField {
        SortField::parse(self.sort_by.as_deref())
    }

    pub fn sort_dir(&self) -> SortDir {
        SortDir::parse(self.sort_dir.as_deref())
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_fall_back_to_created_at_for_unknown_sort_field() {
        assert_eq!(SortField::parse(Some("name")), SortField::Name);
        assert_eq!(SortField::parse(Some("owner_id")), SortField::CreatedAt);
        assert_eq!(SortField::parse(Some("; DROP TABLE products")), SortField::CreatedAt);
        assert_eq!(SortField::parse(None), SortField::CreatedAt);
    }

    #[test]
    fn should_default_sort_dir_to_desc() {
        assert_eq!(SortDir::parse(Some("asc")), SortDir::Asc);
        assert_eq!(SortDir::parse(Some("ASC")), SortDir::Asc);
        assert_eq!(SortDir::parse(Some("sideways")), SortDir::Desc);
        assert_eq!(SortDir::parse(None), SortDir::Desc);
    }

    #[test]
    fn should_reset_page_below_one() {
        let q = ProductListQuery { page: Some(-1), ..Default::default() };
        assert_eq!(q.page(), 1);
        let q = ProductListQuery { page: Some(0), ..Default::default() };
        assert_eq!(q.page(), 1);
        let q = ProductListQuery { page: Some(3), ..Default::default() };
        assert_eq!(q.page(), 3);
    }

    #[test]
    fn should_reset_page_size_outside_bounds_to_default() {
        let q = ProductListQuery { page_size: Some(0), ..Default::default() };
        assert_eq!(q.page_size(), 10);
        let q = ProductListQuery { page_size: Some(500), ..Default::default() };
        assert_eq!(q.page_size(), 10);
        let q = ProductListQuery { page_size: Some(100), ..Default::default() };
        assert_eq!(q.page_size(), 100);
        let q = ProductListQuery { page_size: None, ..Default::default() };
        assert_eq!(q.page_size(), 10);
    }

    #[test]
    fn should_compute_offset_without_overflow_for_huge_page() {
        let q = ProductListQuery { page: Some(i64::MAX), ..Default::default() };
        let offset = q.offset();
        assert!(offset >= 0);
        assert_eq!(offset, i64::MAX);

        let q = ProductListQuery {
            page: Some(i64::MAX),
            page_size: Some(100),
            ..Default::default()
        };
        assert_eq!(q.offset(), i64::MAX);
    }

    #[test]
    fn should_compute_offset_from_page_window() {
        let q = ProductListQuery { page: Some(3), page_size: Some(20), ..Default::default() };
        assert_eq!(q.offset(), 40);
        let q = ProductListQuery::default();
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn should_treat_empty_filter_strings_as_absent() {
        let q = ProductListQuery {
            search: Some(String::new()),
            category: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(q.search(), None);
        assert_eq!(q.category(), None);

        let q = ProductListQuery {
            search: Some("teclado".into()),
            category: Some("perifericos".into()),
            ..Default::default()
        };
        assert_eq!(q.search(), Some("teclado"));
        assert_eq!(q.category(), Some("perifericos"));
    }

    #[test]
    fn should_deserialize_empty_query_with_defaults() {
        let q: ProductListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page(), 1);
        assert_eq!(q.page_size(), 10);
        assert_eq!(q.sort_field(), SortField::CreatedAt);
        assert_eq!(q.sort_dir(), SortDir::Desc);
    }
}
