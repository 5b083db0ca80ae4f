// src/handlers/products.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentUser,
    models::product::{
        AdjustStockPayload, CreateProductPayload, Product, ProductListQuery, ProductPage,
        UpdateProductPayload,
    },
    services::product_service::StockDirection,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LowStockQuery {
    /// Limite de estoque baixo (padrão 5)
    pub threshold: Option<i32>,
}

// Listagem paginada/filtrada/ordenada, escopada pelo papel do chamador
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Página de produtos no escopo do chamador", body = ProductPage),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    caller: CurrentUser,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ProductPage>, AppError> {
    let page = app_state.product_service.list(&caller, &query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/products/categories",
    tag = "Products",
    responses(
        (status = 200, description = "Categorias distintas no escopo do chamador", body = Vec<String>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<Vec<String>>, AppError> {
    let categories = app_state.product_service.categories(&caller).await?;
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/api/products/low_stock",
    tag = "Products",
    params(LowStockQuery),
    responses(
        (status = 200, description = "Produtos com estoque no limite ou abaixo", body = Vec<Product>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_low_stock(
    State(app_state): State<AppState>,
    caller: CurrentUser,
    Query(query): Query<LowStockQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let items = app_state
        .product_service
        .low_stock(&caller, query.threshold)
        .await?;
    Ok(Json(items))
}

// Leitura por id: sem escopo (qualquer autenticado enxerga)
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = app_state.product_service.get(id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado (chamador vira dono)", body = Product),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    caller: CurrentUser,
    Json(payload): Json<CreateProductPayload>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state.product_service.create(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    request_body = UpdateProductPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 403, description = "Não é dono nem admin"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .product_service
        .update(&caller, id, payload)
        .await?;
    Ok(Json(product))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/increase",
    tag = "Products",
    request_body = AdjustStockPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Estoque aumentado", body = Product),
        (status = 403, description = "Não é dono nem admin"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn increase_stock(
    State(app_state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustStockPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .product_service
        .adjust_stock(&caller, id, StockDirection::Increase, payload.amount)
        .await?;
    Ok(Json(product))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/decrease",
    tag = "Products",
    request_body = AdjustStockPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Estoque reduzido", body = Product),
        (status = 400, description = "Estoque insuficiente"),
        (status = 403, description = "Não é dono nem admin"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn decrease_stock(
    State(app_state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustStockPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .product_service
        .adjust_stock(&caller, id, StockDirection::Decrease, payload.amount)
        .await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto excluído"),
        (status = 403, description = "Não é dono nem admin"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.product_service.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
