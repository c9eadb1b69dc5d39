use blog_newsletter::config::get_configuration;
use blog_newsletter::startup::Application;
use blog_newsletter::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber(String::from("blog_newsletter"), String::from("info"));

    init_subscriber(subscriber);

    let config = get_configuration().expect("Missing configuration file.");
    let address = config.get_address();
    let application = Application::build(config).await?;

    tracing::info!("Server listening on {}", address);

    application.run_until_stop().await
}
