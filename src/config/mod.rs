//! Configuration loading and management for the payroll sheet engine.
//!
//! This module loads the export layout (column positions, header keywords,
//! delivery date rules) and the locale data (currency format, month names)
//! from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_sheets::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap().into_config();
//! println!("Currency symbol: {}", config.currency().symbol);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ColumnPositions, CurrencyFormat, DeliveryRules, EngineConfig, HeaderKeywords, LayoutConfig,
    Locale,
};
