//! Loading and normalizing the input price table

mod scaler;
mod table;

pub use scaler::StandardScaler;
pub use table::PriceTable;
