//! Configuration loading for the advance engine.
//!
//! Settings are passed explicitly into the calculators and the service; there
//! is no global settings singleton.
//!
//! # Example
//!
//! ```no_run
//! use advance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/advance").unwrap();
//! println!("Interest rate: {:?}", config.global.annual_interest_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DirectorySeed, EngineConfig, GlobalSettings, NotificationSettings, TransitionPolicy,
};
