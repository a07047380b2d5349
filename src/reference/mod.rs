//! Reference data fetched by the host for specific question types.

pub mod countries;

pub use countries::{Country, CountryDirectory, CountryOption};
