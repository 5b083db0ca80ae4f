// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    middleware::auth::CurrentUser,
    models::auth::{Claims, Role, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self {
            user_repo,
            jwt_secret,
        }
    }

    // Registro público. O papel é sempre 'user' (default da coluna);
    // não existe caminho de auto-promoção por aqui.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AppError> {
        // Hashing fora do runtime async (bcrypt é CPU-bound)
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let new_user = self
            .user_repo
            .create_user(username, email, &hashed_password)
            .await?;

        let token = self.create_token(new_user.id, new_user.role)?;
        Ok((new_user, token))
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id, user.role)
    }

    pub fn create_token(&self, user_id: Uuid, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    /// Resolve a identidade a partir do token, sem tocar no banco.
    pub fn decode_token(&self, token: &str) -> Result<CurrentUser, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(CurrentUser {
            user_id: token_data.claims.sub,
            role: token_data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    // Pool "lazy": nunca conecta de fato — os testes abaixo só exercitam
    // a parte de token, que não toca no banco.
    fn service() -> AuthService {
        let pool = PgPoolOptions::new().connect_lazy("postgres://localhost/teste").unwrap();
        AuthService::new(UserRepository::new(pool), "segredo-de-teste".into())
    }

    #[tokio::test]
    async fn should_round_trip_token_claims() {
        let svc = service();
        let user_id = Uuid::new_v4();

        let token = svc.create_token(user_id, Role::Admin).unwrap();
        let current = svc.decode_token(&token).unwrap();

        assert_eq!(current.user_id, user_id);
        assert_eq!(current.role, Role::Admin);
    }

    #[tokio::test]
    async fn should_reject_token_signed_with_other_secret() {
        let svc = service();
        let other = {
            let pool = PgPoolOptions::new().connect_lazy("postgres://localhost/teste").unwrap();
            AuthService::new(UserRepository::new(pool), "outro-segredo".into())
        };

        let token = other.create_token(Uuid::new_v4(), Role::User).unwrap();
        assert!(matches!(
            svc.decode_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn should_reject_expired_token() {
        let svc = service();
        let past = Utc::now() - chrono::Duration::days(1);
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::User,
            exp: past.timestamp() as usize,
            iat: (past - chrono::Duration::days(7)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("segredo-de-teste".as_ref()),
        )
        .unwrap();

        assert!(matches!(
            svc.decode_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn should_reject_garbage_token() {
        let svc = service();
        assert!(matches!(
            svc.decode_token("nem.um.jwt"),
            Err(AppError::InvalidToken)
        ));
    }
}
