use reqwest::Response;
use sqlx::postgres::PgRow;
use sqlx::{migrate, Connection, Executor, PgConnection, PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

use blog_newsletter::{
    config::{get_configuration, DatabaseSettings, Settings},
    domain::{
        subscriber::Subscriber, subscriber_email::SubscriberEmail,
        subscriber_status::SubscriberStatus, unsubscribe_token::UnsubscribeToken,
    },
    startup::Application,
    store::Store,
};

pub struct TestApp {
    pub config: Settings,
    pub address: String,
    pub db_pool: PgPool,
    pub store: Store,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        let mut config = get_configuration().expect("Missing configuration file.");
        let db_test_name = format!("db_{}", Uuid::new_v4().to_string().replace('-', "_"));

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);

        let db_pool = configure_db(&mut config.database, db_test_name.clone()).await;
        let store = Store::from_settings(&config.database);

        let application = Application::build(config.clone())
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            config: config.clone(),
            db_pool,
            store,
        }
    }

    pub async fn post_subscribe(&self, body: HashMap<&str, &str>) -> Response {
        let client = reqwest::Client::new();
        let url = format!("{}/api/subscribe", self.address);

        client
            .post(&url)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscribe_raw(&self, body: String) -> Response {
        let client = reqwest::Client::new();
        let url = format!("{}/api/subscribe", self.address);

        client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn fetch_subscriber(&self, email: &str) -> Subscriber {
        sqlx::query(
            "SELECT id, email, status, unsubscribe_token, created_at, unsubscribed_at
             FROM subscribers WHERE email = $1",
        )
        .bind(email)
        .map(map_subscriber_row)
        .fetch_one(&self.db_pool)
        .await
        .expect("Query to fetch the subscriber failed.")
    }

    pub async fn count_subscribers(&self) -> i64 {
        sqlx::query("SELECT COUNT(*) AS total FROM subscribers")
            .map(|row: PgRow| row.get::<i64, _>("total"))
            .fetch_one(&self.db_pool)
            .await
            .expect("Query to count subscribers failed.")
    }
}

pub fn map_subscriber_row(row: PgRow) -> Subscriber {
    Subscriber {
        id: row.get("id"),
        email: SubscriberEmail::parse(row.get("email")).unwrap(),
        status: SubscriberStatus::parse(row.get("status")).unwrap(),
        unsubscribe_token: UnsubscribeToken::parse(row.get("unsubscribe_token")).unwrap(),
        created_at: row.get("created_at"),
        unsubscribed_at: row.get("unsubscribed_at"),
    }
}

async fn configure_db(db_config: &mut DatabaseSettings, db_test_name: String) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect_with(&db_config.get_db_options())
        .await
        .expect("Failed to connect to Postgres.");

    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, db_test_name))
        .await
        .expect("Failed to create database.");

    connection
        .close()
        .await
        .expect("Failed to close connection.");

    // Execute migrations
    db_config.set_name(db_test_name);

    let db_pool = PgPool::connect_with(db_config.get_db_options())
        .await
        .expect("Failed to connect to the test database.");

    migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run migrations.");

    db_pool
}
