use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};

use kreismeisterschaft_api::api::{self, AppState};
use kreismeisterschaft_api::config::AppConfig;
use kreismeisterschaft_api::domain::rules::CompatibilityChecker;
use kreismeisterschaft_api::infrastructure::repositories::postgres_repositories;
use kreismeisterschaft_api::logging;
use kreismeisterschaft_api::services::TeamService;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    logging::init();

    let config = AppConfig::from_env().expect("Invalid configuration");
    let rules = config.team_rules().expect("Failed to load team rules");
    let table = rules.rule_table().expect("Invalid team rule table");
    tracing::info!(rules = table.rules().len(), "Team rules loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Database connected successfully");

    let service = TeamService::new(
        postgres_repositories(pool),
        rules.calculator(),
        CompatibilityChecker::new(table),
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(AppState::new(service)).layer(cors);

    // Start server
    tracing::info!("Server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
