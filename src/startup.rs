use actix_web::dev::Server;
use actix_web::{web, App, HttpResponse, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::config::Settings;
use crate::domain::subscription_result::SubscriptionResult;
use crate::routes::{handle_subscribe, health_check};
use crate::store::Store;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let store = Store::from_settings(&config.database);
        let listener =
            TcpListener::bind(config.get_address()).expect("Failed to bind the address.");
        let port = listener.local_addr().unwrap().port();
        let server = run(listener, store)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(listener: TcpListener, store: Store) -> Result<Server, std::io::Error> {
    let store = web::Data::new(store);

    let server = HttpServer::new(move || {
        // Bodies that fail JSON parsing or deserialization never reach the
        // handler; they get the same uniform validation body the handler
        // produces for an invalid email.
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(SubscriptionResult::<()>::failure(String::from(
                    "Validation error",
                ))),
            )
            .into()
        });

        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/api/subscribe", web::post().to(handle_subscribe))
            .app_data(json_config)
            .app_data(store.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
