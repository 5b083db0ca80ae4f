// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::auth::Role};

/// Identidade autenticada da requisição corrente.
///
/// Vem inteira do token (id + papel): o guard não consulta o banco.
/// Uma mudança de papel só vale a partir do próximo login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub role: Role,
}

// O middleware em si: extrai o Bearer, valida o JWT e injeta o
// CurrentUser nos extensions da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let current_user = app_state.auth_service.decode_token(token)?;
            request.extensions_mut().insert(current_user);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // axum 0.8 define o método como `fn -> impl Future + Send`; extrair
    // de forma síncrona e devolver um bloco async evita capturar o
    // lifetime de `parts` (E0195 com `async fn` em alguns rustc).
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or(AppError::InvalidToken);
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn should_extract_current_user_from_extensions() {
        let current = CurrentUser {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        };
        let mut request = Request::builder().method("GET").uri("/test").body(()).unwrap();
        request.extensions_mut().insert(current);
        let (mut parts, _body) = request.into_parts();

        let extracted = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, current);
    }

    #[tokio::test]
    async fn should_reject_request_without_identity() {
        let request = Request::builder().method("GET").uri("/test").body(()).unwrap();
        let (mut parts, _body) = request.into_parts();

        let result = CurrentUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }
}
