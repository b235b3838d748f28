pub mod console;
pub mod style;
pub mod summary;

pub use style::Palette;
pub use summary::{write_summary, RunSummary};
