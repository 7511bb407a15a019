pub mod config;
pub mod logging;

pub mod client;
pub mod countries;
pub mod deadline;
pub mod download;
pub mod error;
pub mod generate;
pub mod reporter;
pub mod transport;
pub mod wire;
