use crate::health::{CompositeResult, ProbeRegistry};
use actix_web::web;

/// `200` when every probe is UP, `503` otherwise; same JSON body either way.
#[tracing::instrument(name = "Health check", skip(registry))]
pub async fn health_check(registry: web::Data<ProbeRegistry>) -> CompositeResult {
    registry.check().await
}
