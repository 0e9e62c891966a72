//! Service layer for customer management.
//! - Business rules (email uniqueness, existence checks) live in `customer::service`.
//! - Persistence is reached only through the `customer::repository` trait.

pub mod customer;
#[cfg(test)]
pub mod test_support;
