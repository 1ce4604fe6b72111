pub mod config;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod stats;
pub mod store;
