pub mod categories;
pub mod preferences;
pub mod tasks;

pub use categories::CategoryWrite;
