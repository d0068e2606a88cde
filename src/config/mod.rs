mod settings;

pub use settings::{
    ApiConfig, BlogConfig, DatabaseConfig, LogConfig, OtelConfig, ServerConfig, Settings,
    StorageConfig,
};
