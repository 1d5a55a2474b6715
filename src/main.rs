use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use gallery::auth::hash_password;
use gallery::config::{Cli, Command, Config};
use gallery::db::{self, catalog, models::Role, users};
use gallery::routes;
use gallery::state::{AppState, DbPool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Initialize database
    let pool = db::create_pool(config.db_path())?;
    db::run_migrations(&pool)?;

    match cli.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => serve(pool, config).await,
        Command::CreateUser {
            username,
            password,
            admin,
        } => create_user(&pool, &config, &username, &password, admin),
        Command::CreateCollection { name, description } => {
            let conn = pool.get()?;
            let id = catalog::create_collection(&conn, &name, description.as_deref())?;
            tracing::info!("Created collection {} ({})", name, id);
            Ok(())
        }
    }
}

async fn serve(pool: DbPool, config: Config) -> anyhow::Result<()> {
    // Ensure uploads directory exists
    std::fs::create_dir_all(config.uploads_path())?;
    tracing::info!("Upload directory: {}", config.uploads_path().display());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = routes::app(AppState::new(pool, config));

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_user(
    pool: &DbPool,
    config: &Config,
    username: &str,
    password: &str,
    admin: bool,
) -> anyhow::Result<()> {
    let username = username.trim();
    anyhow::ensure!(!username.is_empty(), "username must not be empty");
    anyhow::ensure!(!password.is_empty(), "password must not be empty");

    let conn = pool.get()?;
    if users::find_by_username(&conn, username)?.is_some() {
        anyhow::bail!("user {} already exists", username);
    }

    let hash = hash_password(password, config.auth.bcrypt_cost)?;
    let role = if admin { Role::Admin } else { Role::User };
    let id = users::create(&conn, username, &hash, role)?;
    tracing::info!("Created {} account {} ({})", role.as_str(), username, id);
    Ok(())
}
