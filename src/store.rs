use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};

use crate::config::DatabaseSettings;

/// Hands out one short-lived connection per logical operation. There is no
/// pool: the connection is closed when the handle goes out of scope, whichever
/// way the operation exits, so a wedged operation cannot poison later ones.
#[derive(Clone)]
pub struct Store {
    options: PgConnectOptions,
}

impl Store {
    pub fn new(options: PgConnectOptions) -> Store {
        Store { options }
    }

    pub fn from_settings(settings: &DatabaseSettings) -> Store {
        Store::new(settings.get_db_options())
    }

    #[tracing::instrument(name = "Opening a database connection", skip(self))]
    pub async fn connect(&self) -> Result<PgConnection, sqlx::Error> {
        PgConnection::connect_with(&self.options).await
    }
}
