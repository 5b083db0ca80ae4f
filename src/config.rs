// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{LogRepository, ProductRepository, StatsRepository, UserRepository},
    services::{
        auth::AuthService, product_service::ProductService, stats_service::StatsService,
        user_service::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub product_service: ProductService,
    pub stats_service: StatsService,
    // A listagem da auditoria é leitura pura; o repositório basta.
    pub log_repo: LogRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let log_repo = LogRepository::new(db_pool.clone());
        let stats_repo = StatsRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let user_service = UserService::new(user_repo);
        let product_service =
            ProductService::new(product_repo, log_repo.clone(), db_pool.clone());
        let stats_service = StatsService::new(stats_repo);

        Ok(Self {
            db_pool,
            auth_service,
            user_service,
            product_service,
            stats_service,
            log_repo,
        })
    }
}
