use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::web;
use actix_web::App;
use actix_web::HttpServer;
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::email_client::MailRelay;
use crate::email_client::SmtpRelay;
use crate::notifier::RsvpNotifier;
use crate::routes::health_check;
use crate::routes::json_error_handler;
use crate::routes::rsvp;

/// Wrapper for actix's `Server` with access to the bound port. Not to be
/// confused with actix's `App`!
pub struct Application {
    /// Left private; use `get_port` to access
    port: u16,
    server: Server,
}

impl Application {
    /// Bind to the configured address and relay mail over SMTP
    pub async fn build(cfg: Settings) -> Result<Self, anyhow::Error> {
        let relay = Arc::new(SmtpRelay::new(cfg.email_client.clone()));
        Self::build_with_relay(cfg, relay).await
    }

    /// Like `build`, with the mail relay supplied by the caller (tests use an
    /// in-memory outbox)
    pub async fn build_with_relay(
        cfg: Settings,
        relay: Arc<dyn MailRelay>,
    ) -> Result<Self, anyhow::Error> {
        let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
        let listener = TcpListener::bind(addr)?;

        // port 0 means the OS picked one
        let port = listener.local_addr()?.port();

        let notifier = RsvpNotifier::new(relay, cfg.email_client.sender.as_deref());
        let server = run(listener, notifier)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 { self.port }

    /// Because this consumes `self`, this should be the final function call (or
    /// passed to `tokio::spawn`)
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> { self.server.await }
}

/// The server is not responsible for binding to an address, it only listens to
/// an already bound address.
///
/// Declares all API endpoints.
pub fn run(
    listener: TcpListener,
    notifier: RsvpNotifier,
) -> Result<Server, anyhow::Error> {
    // `Data` is an `Arc`; every worker gets a clone of the same notifier
    let notifier = web::Data::new(notifier);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/api/rsvp", web::post().to(rsvp))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(notifier.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
