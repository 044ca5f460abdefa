use wedding_rsvp::configuration::get_configuration;
use wedding_rsvp::startup::Application;
use wedding_rsvp::telemetry::get_subscriber;
use wedding_rsvp::telemetry::init_subscriber;

/// Initialise telemetry, load config, and start the server
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("wedding-rsvp", "info", std::io::stdout);
    init_subscriber(subscriber);

    let cfg = get_configuration()?;
    let app = Application::build(cfg).await?;
    tracing::info!(port = app.get_port(), "accepting RSVPs");

    if let Err(e) = app.run_until_stopped().await {
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "server exited with error"
        );
        return Err(e.into());
    }
    tracing::info!("server exited gracefully");
    Ok(())
}
