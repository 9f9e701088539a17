//! Configuration section definitions.

mod build;
mod images;
mod paths;
mod scripts;
mod serve;
mod styles;

pub use build::BuildConfig;
pub use images::ImagesConfig;
pub use paths::PathsConfig;
pub use scripts::ScriptsConfig;
pub use serve::ServeConfig;
pub use styles::StylesConfig;
