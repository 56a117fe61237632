use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

mod auth;
mod config;
mod content;
mod controllers;
mod db;
mod error;
mod git;
mod models;
mod rate_limit;
mod security;

use config::Config;
use content::ContentStore;
use db::Database;
use git::{Publisher, SystemGit};
use rate_limit::LoginRateLimiter;

pub struct AppState {
    pub db: Arc<Database>,
    pub config: Config,
    pub content: Arc<ContentStore>,
    pub publisher: Arc<Publisher>,
    pub login_limiter: LoginRateLimiter,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;
    log::info!("CMS backend v{}", env!("CARGO_PKG_VERSION"));

    // Content roots must exist before the store or git touch them.
    for dir in [config.notes_dir(), config.posts_dir()] {
        if let Err(e) = std::fs::create_dir_all(&dir) {
            log::error!("Failed to create content directory {:?}: {}", dir, e);
        }
    }

    log::info!("Initializing database at {:?}", config.db_path);
    let db = Arc::new(Database::open(&config.db_path).expect("Failed to initialize database"));

    let store = Arc::new(ContentStore::new(config.notes_dir(), config.posts_dir()));
    let publisher = Arc::new(Publisher::new(
        Arc::new(SystemGit::new(config.blog_root.clone())),
        &config,
    ));
    let login_limiter = LoginRateLimiter::default();

    log::info!("Content root: {:?}", config.blog_root);
    log::info!("Listening on 0.0.0.0:{}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&config.allowed_origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                config: config.clone(),
                content: Arc::clone(&store),
                publisher: Arc::clone(&publisher),
                login_limiter: login_limiter.clone(),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::auth::config)
            .configure(controllers::content::config)
            .configure(controllers::git::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
