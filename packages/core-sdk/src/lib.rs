pub mod db;
pub mod models;
pub mod server;
pub mod snippets;
pub mod telemetry;
pub mod template;
