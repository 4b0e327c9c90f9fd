// File decode and export operations

pub mod csv;
pub mod export;
pub mod xlsx;
