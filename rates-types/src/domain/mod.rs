//! Domain models for the currency rates service.

pub mod conversion;
pub mod currency;

pub use conversion::Conversion;
pub use currency::Currency;
