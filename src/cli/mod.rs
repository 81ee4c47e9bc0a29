pub mod compare;
pub mod gold;
pub mod import;
pub mod series;
pub mod setup;
pub mod summary;
pub mod ui;
