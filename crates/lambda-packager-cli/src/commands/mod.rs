mod config;
mod doctor;
mod package;

pub use config::show_config;
pub use doctor::doctor;
pub use package::package;
