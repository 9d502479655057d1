mod settings;

pub use settings::{BackendConfig, Config, ConfigError, EXAMPLE_CONFIG};
