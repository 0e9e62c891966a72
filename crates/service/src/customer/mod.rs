//! Customer module: three-layer architecture (domain, repository, service).

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{CreateCustomerRequest, Customer, CustomerUpdate};
pub use errors::CustomerError;
pub use repository::CustomerRepository;
pub use service::CustomerService;
