use async_trait::async_trait;

use super::domain::Customer;
use super::errors::CustomerError;

/// Repository abstraction for customer persistence.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Customer>, CustomerError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, CustomerError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, CustomerError>;
    /// Insert when `customer.id` is `None`, otherwise overwrite the row with that id.
    async fn save(&self, customer: Customer) -> Result<Customer, CustomerError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), CustomerError>;
}

/// In-process repository used by the `memory` storage backend and in tests.
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct MemoryCustomerRepository {
        inner: RwLock<State>,
    }

    #[derive(Default)]
    struct State {
        rows: BTreeMap<i64, Customer>, // key: id
        last_id: i64,
    }

    impl MemoryCustomerRepository {
        pub fn new() -> Self { Self::default() }
    }

    #[async_trait]
    impl CustomerRepository for MemoryCustomerRepository {
        async fn find_all(&self) -> Result<Vec<Customer>, CustomerError> {
            let state = self.inner.read().await;
            Ok(state.rows.values().cloned().collect())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, CustomerError> {
            let state = self.inner.read().await;
            Ok(state.rows.get(&id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError> {
            let state = self.inner.read().await;
            Ok(state.rows.values().find(|c| c.email == email).cloned())
        }

        async fn exists_by_id(&self, id: i64) -> Result<bool, CustomerError> {
            let state = self.inner.read().await;
            Ok(state.rows.contains_key(&id))
        }

        async fn save(&self, mut customer: Customer) -> Result<Customer, CustomerError> {
            let mut state = self.inner.write().await;
            // Same guarantee as the unique index on customer.email
            if state.rows.values().any(|c| c.email == customer.email && c.id != customer.id) {
                return Err(CustomerError::Repository(format!(
                    "duplicate key value violates unique constraint \"idx_customer_email\" ({})",
                    customer.email
                )));
            }
            let id = match customer.id {
                // 与 SeaORM 的 RecordNotUpdated 保持一致：不复活已删除的行
                Some(id) if !state.rows.contains_key(&id) => {
                    return Err(CustomerError::Repository(format!(
                        "record not updated: customer {id} no longer exists"
                    )));
                }
                Some(id) => id,
                None => {
                    state.last_id += 1;
                    state.last_id
                }
            };
            customer.id = Some(id);
            state.rows.insert(id, customer.clone());
            Ok(customer)
        }

        async fn delete_by_id(&self, id: i64) -> Result<(), CustomerError> {
            let mut state = self.inner.write().await;
            state.rows.remove(&id);
            Ok(())
        }
    }

}
