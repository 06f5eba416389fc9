pub mod load;
pub mod types;

pub use load::{get_atelier_data_dir, get_credential_file_path, load_default};
pub use types::{ApiConfig, AppConfig, AuthConfig, BootstrapConfig, LoggingConfig};
