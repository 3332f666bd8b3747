//! History configuration: database location, schema generation and log file. Loaded from env.

mod history_config;


pub use history_config::HistoryConfig;
