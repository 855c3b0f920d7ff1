pub mod appearance;
pub mod defaults;
pub mod settings;

pub use appearance::{Appearance, ColorScheme};
pub use settings::Settings;
