//! Port traits implemented by the storage adapters.

pub mod repository;

pub use repository::RatesRepository;
