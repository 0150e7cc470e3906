pub mod confirmation;
pub mod repository;
pub mod types;
