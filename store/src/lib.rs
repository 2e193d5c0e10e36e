//! File-backed pieces around the pairs engine: the CSV score history, its analysis and player settings.

pub use csv_store::*;
pub use error::*;
pub use history::*;
pub use record::*;
pub use settings::*;

mod csv_store;
mod error;
mod history;
mod record;
mod settings;
