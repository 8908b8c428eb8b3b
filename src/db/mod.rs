use diesel::r2d2::{ConnectionManager, Pool};
use diesel::{r2d2, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

mod analytics;
mod errors;
mod favorites;
mod menu;
mod orders;
pub mod schema;
mod users;

pub use analytics::AnalyticsOperations;
pub use errors::RepositoryError;
pub use favorites::FavoriteOperations;
pub use menu::MenuOperations;
pub use orders::{OrderFilter, OrderOperations};
pub use users::UserOperations;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn establish_connection_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    Pool::builder()
        .max_size(20)
        .build(manager)
        .expect("Unable to build database connection pool")
}

pub fn run_db_migrations(pool: DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = DbConnection::new(&pool)?;
    let applied = conn.connection().run_pending_migrations(MIGRATIONS)?;
    if !applied.is_empty() {
        info!("Applied {} database migration(s)", applied.len());
    }
    Ok(())
}

// Connection Guard - Manages pool
pub struct DbConnection<'a> {
    conn: r2d2::PooledConnection<ConnectionManager<PgConnection>>,
    _lifetime: std::marker::PhantomData<&'a ()>,
}

impl DbConnection<'_> {
    pub fn new(pool: &DbPool) -> Result<Self, RepositoryError> {
        Ok(Self {
            conn: pool.get().map_err(RepositoryError::ConnectionPoolError)?,
            _lifetime: std::marker::PhantomData,
        })
    }

    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}
