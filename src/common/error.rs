// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Todo erro encerra a operação atual: nenhum retry interno, e qualquer
// transação aberta sofre rollback junto (mutação + auditoria).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Username já existe")]
    UsernameAlreadyExists,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Estoque insuficiente")]
    InsufficientStock,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Violações de unicidade no registro voltam como 400
            // (comportamento herdado da API original).
            AppError::UsernameAlreadyExists => {
                (StatusCode::BAD_REQUEST, "Este username já está em uso.")
            }
            AppError::EmailAlreadyExists => {
                (StatusCode::BAD_REQUEST, "Este e-mail já está em uso.")
            }
            AppError::InsufficientStock => (
                StatusCode::BAD_REQUEST,
                "Estoque insuficiente para esta operação.",
            ),

            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Username ou senha inválidos.")
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ),

            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Você não tem permissão para esta operação.",
            ),

            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::ProductNotFound => (StatusCode::NOT_FOUND, "Produto não encontrado."),

            // Todos os outros erros (DatabaseError, InternalServerError...)
            // viram 500. O `tracing` loga o detalhe, o cliente recebe o
            // genérico.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.",
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn assert_error(error: AppError, expected_status: StatusCode, expected_message: &str) {
        let resp = error.into_response();
        assert_eq!(resp.status(), expected_status);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], expected_message);
    }

    #[tokio::test]
    async fn should_map_forbidden_to_403() {
        assert_error(
            AppError::Forbidden,
            StatusCode::FORBIDDEN,
            "Você não tem permissão para esta operação.",
        )
        .await;
    }

    #[tokio::test]
    async fn should_map_product_not_found_to_404() {
        assert_error(
            AppError::ProductNotFound,
            StatusCode::NOT_FOUND,
            "Produto não encontrado.",
        )
        .await;
    }

    #[tokio::test]
    async fn should_map_insufficient_stock_to_400() {
        assert_error(
            AppError::InsufficientStock,
            StatusCode::BAD_REQUEST,
            "Estoque insuficiente para esta operação.",
        )
        .await;
    }

    // Duplicidade de username/email volta como 400, não 409.
    #[tokio::test]
    async fn should_map_unique_violations_to_400() {
        assert_error(
            AppError::UsernameAlreadyExists,
            StatusCode::BAD_REQUEST,
            "Este username já está em uso.",
        )
        .await;
        assert_error(
            AppError::EmailAlreadyExists,
            StatusCode::BAD_REQUEST,
            "Este e-mail já está em uso.",
        )
        .await;
    }

    #[tokio::test]
    async fn should_map_invalid_token_to_401() {
        assert_error(
            AppError::InvalidToken,
            StatusCode::UNAUTHORIZED,
            "Token de autenticação inválido ou ausente.",
        )
        .await;
    }

    #[tokio::test]
    async fn should_hide_internal_detail_from_client() {
        assert_error(
            AppError::InternalServerError(anyhow::anyhow!("pool esgotada")),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Ocorreu um erro inesperado.",
        )
        .await;
    }
}
