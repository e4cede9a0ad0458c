use std::sync::Arc;

use anyhow::Result;
use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig, init_pool},
};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use membership::{
    clock::SystemClock,
    repositories::{
        MemoryTokenStore, MemoryUserStore, PgUserStore, RedisTokenStore, TokenStore, UserStore,
    },
    routes,
    service::MembershipService,
    settings::{Settings, StorageBackend},
    state::AppState,
    throttle::LoginThrottle,
};

type Stores = (Arc<dyn UserStore>, Arc<dyn TokenStore>);

async fn init_stores(backend: StorageBackend) -> Result<Stores> {
    match backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage, data is lost on restart");
            let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
            let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
            Ok((users, tokens))
        }
        StorageBackend::Postgres => {
            // Initialize database connection pool
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if database::health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            let users = PgUserStore::new(pool);
            users.migrate().await?;

            // Initialize Redis connection pool
            let redis_config = RedisConfig::from_env()?;
            let redis_pool = RedisPool::new(&redis_config).await?;
            if !redis_pool.health_check().await? {
                anyhow::bail!("Failed to connect to Redis");
            }

            let users: Arc<dyn UserStore> = Arc::new(users);
            let tokens: Arc<dyn TokenStore> = Arc::new(RedisTokenStore::new(redis_pool));
            Ok((users, tokens))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    // Initialize logging
    let level = settings.log.level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting membership service");

    let (users, tokens) = init_stores(settings.storage.backend).await?;
    let app_state = AppState {
        membership: MembershipService::new(users, tokens, Arc::new(SystemClock)),
        login_throttle: LoginThrottle::new(settings.throttle.clone()),
    };

    info!("Membership service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Membership service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
