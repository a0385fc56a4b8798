// Service exports
pub mod postgres;

pub use postgres::{AddressStore, PoolOptions, StoreError};
