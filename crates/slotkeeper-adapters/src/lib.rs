pub mod lock;
pub mod persistence;
