// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Papel do usuário ---
// Enum fechado (banco E aplicação). Um typo em "admin" deixa de ser um
// bypass silencioso e vira erro de decodificação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")] // Banco
#[serde(rename_all = "lowercase")] // JSON
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// Dados para registro de um novo usuário.
// Não existe campo `role` aqui: todo registro nasce como "user".
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(length(min = 3, max = 50, message = "O username deve ter entre 3 e 50 caracteres."))]
    pub username: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 3, max = 50, message = "O username deve ter entre 3 e 50 caracteres."))]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Atualização administrativa de um usuário (parcial).
// Só um admin chega aqui, e é o único lugar onde `role` muda.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserPayload {
    #[validate(length(min = 3, max = 50, message = "O username deve ter entre 3 e 50 caracteres."))]
    pub username: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub role: Option<Role>,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Resposta do registro: o cliente já recebe o perfil recém-criado
// junto com o token, sem precisar de um GET /me em seguida.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT.
// O papel viaja no token: o guard não consulta o banco por requisição.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // ID do usuário
    pub role: Role, // Papel no momento do login
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_role_as_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn should_reject_unknown_role_values() {
        let parsed: Result<Role, _> = serde_json::from_str("\"superadmin\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn should_include_user_and_token_in_register_response() {
        let response = RegisterResponse {
            token: "abc.def.ghi".into(),
            user: User {
                id: Uuid::new_v4(),
                username: "maria".into(),
                email: "maria@example.com".into(),
                password_hash: "$2b$12$segredo".into(),
                role: Role::User,
                created_at: Utc::now(),
            },
        };
        let json: serde_json::Value = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token"], "abc.def.ghi");
        assert_eq!(json["user"]["username"], "maria");
        assert!(json["user"].get("passwordHash").is_none());
    }

    #[test]
    fn should_never_serialize_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "maria".into(),
            email: "maria@example.com".into(),
            password_hash: "$2b$12$segredo".into(),
            role: Role::User,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("segredo"));
        assert!(!json.contains("passwordHash"));
    }
}
