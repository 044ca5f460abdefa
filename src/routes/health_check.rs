use actix_web::HttpResponse;

/// `GET /health_check`
///
/// Liveness only; the SMTP relay is not contacted.
pub async fn health_check() -> HttpResponse { HttpResponse::Ok().finish() }
