pub mod configuration;
pub mod health;
pub mod probes;
pub mod routes;
pub mod startup;
pub mod telemetry;
