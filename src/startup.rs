use crate::configuration::Settings;
use crate::health::ProbeRegistry;
use crate::routes;
use actix_web::{dev::Server, web, App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub fn run(
    listener: TcpListener,
    registry: ProbeRegistry,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let registry = web::Data::new(registry);
    let health_path = settings.health.path.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(
                web::resource(health_path.as_str()).route(web::get().to(routes::health_check)),
            )
            .app_data(registry.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
