pub mod config;
pub mod encoder;
pub mod form;
pub mod session;
pub mod telemetry;
pub mod transport;
