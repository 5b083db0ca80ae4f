// src/common/policy.rs
//
// Política de autorização: funções puras, sem I/O.
// Toda decisão de quem enxerga/altera o quê passa por aqui — os
// handlers e serviços não comparam papéis por conta própria.

use uuid::Uuid;

use crate::{common::error::AppError, middleware::auth::CurrentUser, models::auth::Role};

/// Escopo de visibilidade de uma listagem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Admin enxerga todas as linhas.
    All,
    /// Usuário comum enxerga apenas as linhas cujo owner_id é o seu.
    Mine(Uuid),
}

impl Scope {
    /// Quando o escopo restringe por dono, devolve o owner_id exigido.
    /// `None` significa "sem filtro" (conveniente para bind SQL opcional).
    pub fn owner_filter(self) -> Option<Uuid> {
        match self {
            Scope::All => None,
            Scope::Mine(id) => Some(id),
        }
    }
}

pub fn scope_for(caller: &CurrentUser) -> Scope {
    match caller.role {
        Role::Admin => Scope::All,
        Role::User => Scope::Mine(caller.user_id),
    }
}

/// Mutação/exclusão de um recurso existente: dono ou admin.
///
/// A existência do recurso deve ser verificada ANTES desta função:
/// NotFound só vale quando a linha realmente não existe. Um usuário
/// comum pedindo o recurso existente de outro recebe Forbidden (o que
/// vaza existência — comportamento documentado e mantido).
pub fn ensure_can_modify(caller: &CurrentUser, owner_id: Uuid) -> Result<(), AppError> {
    if owner_id == caller.user_id || caller.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Endpoints administrativos: listar usuários, ver auditoria,
/// alterar/excluir qualquer usuário.
pub fn ensure_admin(caller: &CurrentUser) -> Result<(), AppError> {
    if caller.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn should_scope_admin_to_all_rows() {
        let admin = user(Role::Admin);
        assert_eq!(scope_for(&admin), Scope::All);
        assert_eq!(scope_for(&admin).owner_filter(), None);
    }

    #[test]
    fn should_scope_regular_user_to_own_rows() {
        let u = user(Role::User);
        assert_eq!(scope_for(&u), Scope::Mine(u.user_id));
        assert_eq!(scope_for(&u).owner_filter(), Some(u.user_id));
    }

    #[test]
    fn should_allow_owner_to_modify() {
        let u = user(Role::User);
        assert!(ensure_can_modify(&u, u.user_id).is_ok());
    }

    #[test]
    fn should_allow_admin_to_modify_anything() {
        let admin = user(Role::Admin);
        assert!(ensure_can_modify(&admin, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn should_forbid_non_owner_non_admin() {
        let u = user(Role::User);
        let result = ensure_can_modify(&u, Uuid::new_v4());
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[test]
    fn should_gate_admin_endpoints() {
        assert!(ensure_admin(&user(Role::Admin)).is_ok());
        assert!(matches!(
            ensure_admin(&user(Role::User)),
            Err(AppError::Forbidden)
        ));
    }
}
