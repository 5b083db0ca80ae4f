// src/services/user_service.rs

use uuid::Uuid;

use crate::{
    common::{error::AppError, policy},
    db::UserRepository,
    middleware::auth::CurrentUser,
    models::auth::{UpdateUserPayload, User},
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    // Perfil do próprio usuário. Pode dar NotFound se a conta foi
    // excluída depois da emissão do token.
    pub async fn me(&self, caller: &CurrentUser) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(caller.user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn list_users(&self, caller: &CurrentUser) -> Result<Vec<User>, AppError> {
        policy::ensure_admin(caller)?;
        self.user_repo.list_all().await
    }

    // Único caminho em que `role` muda.
    pub async fn update_user(
        &self,
        caller: &CurrentUser,
        id: Uuid,
        payload: UpdateUserPayload,
    ) -> Result<User, AppError> {
        policy::ensure_admin(caller)?;
        self.user_repo
            .update_user(
                id,
                payload.username.as_deref(),
                payload.email.as_deref(),
                payload.role,
            )
            .await?
            .ok_or(AppError::UserNotFound)
    }

    // Exclui o usuário e, por cascade, todos os produtos dele.
    // As entradas de auditoria do usuário permanecem.
    pub async fn delete_user(&self, caller: &CurrentUser, id: Uuid) -> Result<(), AppError> {
        policy::ensure_admin(caller)?;
        let deleted = self.user_repo.delete_user(id).await?;
        if !deleted {
            return Err(AppError::UserNotFound);
        }
        tracing::info!("Usuário {} excluído pelo admin {}", id, caller.user_id);
        Ok(())
    }
}
