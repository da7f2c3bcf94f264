use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use blog_posts::config::ServerConfig;
use blog_posts::db::{ensure_schema, establish_connection_pool};
use blog_posts::repository::DieselRepository;
use blog_posts::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = ServerConfig::from_env();

    let pool = match establish_connection_pool(&config.database_url, &config.pool) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let schema_result = pool
        .get()
        .map_err(blog_posts::db::DbError::from)
        .and_then(|mut conn| ensure_schema(&mut conn));
    if let Err(e) = schema_result {
        log::error!("Failed to prepare database schema: {e}");
        std::process::exit(1);
    }

    let repo = DieselRepository::new(pool);

    log::info!("Listening on {}:{}", config.address, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
            .app_data(web::Data::new(repo.clone()))
    })
    .bind((config.address.clone(), config.port))?
    .run()
    .await
}
