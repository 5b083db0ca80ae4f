// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::users::get_me,
        handlers::users::list_users,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::list_categories,
        handlers::products::list_low_stock,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::increase_stock,
        handlers::products::decrease_stock,
        handlers::products::delete_product,

        // --- Stats ---
        handlers::stats::get_summary,
        handlers::stats::get_daily,

        // --- Logs ---
        handlers::logs::list_logs,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::AuthResponse,
            models::auth::RegisterResponse,

            // --- Products ---
            models::product::Product,
            models::product::ProductPage,
            models::product::CreateProductPayload,
            models::product::UpdateProductPayload,
            models::product::AdjustStockPayload,

            // --- Stats ---
            models::stats::CountPair,
            models::stats::LowStockStats,
            models::stats::StatsSummary,
            models::stats::DailyStat,

            // --- Logs ---
            models::log::AuditAction,
            models::log::AuditLog,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Perfil e administração de usuários"),
        (name = "Products", description = "Gestão de Estoque e Produtos"),
        (name = "Stats", description = "Indicadores do painel"),
        (name = "Logs", description = "Trilha de auditoria (admin)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
