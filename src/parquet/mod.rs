//! Handles serialising and saving output tables in the _parquet_ file format.

pub mod land_cover;
pub mod series;

pub use land_cover::save_land_cover;
pub use series::save_series;
