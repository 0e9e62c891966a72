use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{changed, CreateCustomerRequest, Customer, CustomerUpdate};
use super::errors::CustomerError;
use super::repository::CustomerRepository;

/// Customer business service independent of web framework.
///
/// `R` may be unsized so the server can hold `CustomerService<dyn CustomerRepository>`.
pub struct CustomerService<R: CustomerRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CustomerRepository + ?Sized> CustomerService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// All customers in store order.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, CustomerError> {
        self.repo.find_all().await
    }

    pub async fn get_customer(&self, id: i64) -> Result<Customer, CustomerError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| CustomerError::not_found(id))
    }

    /// Create a customer whose email is not yet in use.
    ///
    /// # Examples
    /// ```
    /// use service::customer::{CustomerService, CreateCustomerRequest};
    /// use service::customer::repository::memory::MemoryCustomerRepository;
    /// use std::sync::Arc;
    /// let svc = CustomerService::new(Arc::new(MemoryCustomerRepository::new()));
    /// let req = CreateCustomerRequest { name: "Filipe".into(), email: "filipe@gmail.com".into(), address: "BE".into() };
    /// let created = tokio_test::block_on(svc.create_customer(req.clone())).unwrap();
    /// assert_eq!(created.id, Some(1));
    /// assert!(tokio_test::block_on(svc.create_customer(req)).is_err());
    /// ```
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_customer(&self, request: CreateCustomerRequest) -> Result<Customer, CustomerError> {
        if self.repo.find_by_email(&request.email).await?.is_some() {
            return Err(CustomerError::email_unavailable(&request.email));
        }

        let created = self.repo.save(Customer::from(request)).await?;
        info!(customer_id = ?created.id, email = %created.email, "customer_created");
        Ok(created)
    }

    /// Apply a partial update. A field is written only when it is present,
    /// non-empty and different from the stored value.
    ///
    /// On an email conflict the error names the email held by the conflicting
    /// record, as returned by the lookup.
    #[instrument(skip(self, update))]
    pub async fn update_customer(&self, id: i64, update: CustomerUpdate) -> Result<Customer, CustomerError> {
        let mut customer = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| CustomerError::not_found(id))?;

        if let Some(name) = changed(update.name.as_deref(), &customer.name) {
            customer.name = name.to_string();
        }

        if let Some(email) = changed(update.email.as_deref(), &customer.email) {
            if let Some(existing) = self.repo.find_by_email(email).await? {
                debug!(conflicting_id = ?existing.id, "email already held by another customer");
                return Err(CustomerError::email_unavailable(&existing.email));
            }
            customer.email = email.to_string();
        }

        if let Some(address) = changed(update.address.as_deref(), &customer.address) {
            customer.address = address.to_string();
        }

        let saved = self.repo.save(customer).await?;
        info!(customer_id = id, "customer_updated");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: i64) -> Result<(), CustomerError> {
        if !self.repo.exists_by_id(id).await? {
            return Err(CustomerError::not_found(id));
        }
        self.repo.delete_by_id(id).await?;
        info!(customer_id = id, "customer_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::repository::memory::MemoryCustomerRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Wraps the memory store, counting writes and optionally faking the email lookup.
    #[derive(Default)]
    struct RecordingRepository {
        inner: MemoryCustomerRepository,
        saves: AtomicUsize,
        deletes: AtomicUsize,
        saved: Mutex<Vec<Customer>>,
        email_hit: Option<Customer>,
    }

    impl RecordingRepository {
        fn writes(&self) -> usize {
            self.saves.load(Ordering::SeqCst) + self.deletes.load(Ordering::SeqCst)
        }

        fn last_saved(&self) -> Customer {
            self.saved.lock().unwrap().last().cloned().expect("no customer saved")
        }
    }

    #[async_trait]
    impl CustomerRepository for RecordingRepository {
        async fn find_all(&self) -> Result<Vec<Customer>, CustomerError> { self.inner.find_all().await }
        async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, CustomerError> { self.inner.find_by_id(id).await }
        async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError> {
            match &self.email_hit {
                Some(hit) => Ok(Some(hit.clone())),
                None => self.inner.find_by_email(email).await,
            }
        }
        async fn exists_by_id(&self, id: i64) -> Result<bool, CustomerError> { self.inner.exists_by_id(id).await }
        async fn save(&self, customer: Customer) -> Result<Customer, CustomerError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.saved.lock().unwrap().push(customer.clone());
            self.inner.save(customer).await
        }
        async fn delete_by_id(&self, id: i64) -> Result<(), CustomerError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_by_id(id).await
        }
    }

    fn request(name: &str, email: &str, address: &str) -> CreateCustomerRequest {
        CreateCustomerRequest { name: name.into(), email: email.into(), address: address.into() }
    }

    /// Store seeded with Filipe (id 1); the write counter starts at zero.
    async fn seeded() -> (Arc<RecordingRepository>, CustomerService<RecordingRepository>) {
        let repo = Arc::new(RecordingRepository::default());
        repo.inner.save(Customer::new("Filipe", "filipe@gmail.com", "BE")).await.unwrap();
        (repo.clone(), CustomerService::new(repo))
    }

    #[tokio::test]
    async fn list_is_empty_for_empty_store() {
        let svc = CustomerService::new(Arc::new(RecordingRepository::default()));
        assert!(svc.list_customers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_persists_request_fields() {
        let repo = Arc::new(RecordingRepository::default());
        let svc = CustomerService::new(repo.clone());

        svc.create_customer(request("Filipe", "filipe@gmail.com", "BE")).await.unwrap();

        let captured = repo.last_saved();
        assert_eq!(captured.id, None);
        assert_eq!(captured.name, "Filipe");
        assert_eq!(captured.email, "filipe@gmail.com");
        assert_eq!(captured.address, "BE");

        let all = svc.list_customers().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, Some(1));
        assert_eq!(all[0].email, "filipe@gmail.com");
    }

    #[tokio::test]
    async fn create_with_taken_email_fails_without_write() {
        let (repo, svc) = seeded().await;
        let err = svc.create_customer(request("Other", "filipe@gmail.com", "PT")).await.unwrap_err();
        assert!(matches!(err, CustomerError::EmailUnavailable(_)));
        assert_eq!(err.to_string(), "The email filipe@gmail.com is already taken.");
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn update_unknown_id_fails_without_write() {
        let (repo, svc) = seeded().await;
        let update = CustomerUpdate::default().name("Filipe").email("filipe@gmail.com").address("BE");
        let err = svc.update_customer(99, update).await.unwrap_err();
        assert!(matches!(err, CustomerError::NotFound(_)));
        assert_eq!(err.to_string(), "Customer with id 99 does not exist");
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn update_only_name() {
        let (repo, svc) = seeded().await;
        svc.update_customer(1, CustomerUpdate::default().name("Filipe Dev")).await.unwrap();
        let saved = repo.last_saved();
        assert_eq!(saved.name, "Filipe Dev");
        assert_eq!(saved.email, "filipe@gmail.com");
        assert_eq!(saved.address, "BE");
    }

    #[tokio::test]
    async fn update_only_email() {
        let (repo, svc) = seeded().await;
        svc.update_customer(1, CustomerUpdate::default().email("filipe.devs@gmail.com")).await.unwrap();
        let saved = repo.last_saved();
        assert_eq!(saved.email, "filipe.devs@gmail.com");
        assert_eq!(saved.name, "Filipe");
        assert_eq!(saved.address, "BE");
    }

    #[tokio::test]
    async fn update_only_address() {
        let (repo, svc) = seeded().await;
        svc.update_customer(1, CustomerUpdate::default().address("US")).await.unwrap();
        let saved = repo.last_saved();
        assert_eq!(saved.address, "US");
        assert_eq!(saved.name, "Filipe");
        assert_eq!(saved.email, "filipe@gmail.com");
    }

    #[tokio::test]
    async fn update_all_attributes() {
        let (repo, svc) = seeded().await;
        let update = CustomerUpdate::default().name("Filipe Dev").email("filipe.devs@gmail.com").address("US");
        let updated = svc.update_customer(1, update).await.unwrap();
        assert_eq!(updated.id, Some(1));
        let saved = repo.last_saved();
        assert_eq!(saved.name, "Filipe Dev");
        assert_eq!(saved.email, "filipe.devs@gmail.com");
        assert_eq!(saved.address, "US");
    }

    #[tokio::test]
    async fn empty_and_unchanged_fields_are_ignored() {
        let (repo, svc) = seeded().await;
        let update = CustomerUpdate::default().name("").email("filipe@gmail.com").address("");
        svc.update_customer(1, update).await.unwrap();
        let saved = repo.last_saved();
        assert_eq!(saved, Customer { id: Some(1), ..Customer::new("Filipe", "filipe@gmail.com", "BE") });
        // unchanged email must not trip the uniqueness check against itself
        assert_eq!(repo.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn update_to_email_of_other_customer_fails_without_write() {
        let (repo, svc) = seeded().await;
        repo.inner.save(Customer::new("Ana", "ana@gmail.com", "PT")).await.unwrap();

        let update = CustomerUpdate::default().name("Changed").email("ana@gmail.com");
        let err = svc.update_customer(1, update).await.unwrap_err();
        assert!(matches!(err, CustomerError::EmailUnavailable(_)));
        assert_eq!(err.to_string(), "The email ana@gmail.com is already taken.");
        assert_eq!(repo.writes(), 0);
        assert_eq!(svc.get_customer(1).await.unwrap().name, "Filipe");
    }

    #[tokio::test]
    async fn email_conflict_message_uses_conflicting_record() {
        let repo = Arc::new(RecordingRepository {
            email_hit: Some(Customer { id: Some(2), ..Customer::new("Ana", "ANA@gmail.com", "PT") }),
            ..Default::default()
        });
        repo.inner.save(Customer::new("Filipe", "filipe@gmail.com", "BE")).await.unwrap();
        let svc = CustomerService::new(repo.clone());

        let err = svc.update_customer(1, CustomerUpdate::default().email("ana@gmail.com")).await.unwrap_err();
        assert_eq!(err.to_string(), "The email ANA@gmail.com is already taken.");
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn delete_unknown_id_fails_without_delete() {
        let (repo, svc) = seeded().await;
        let err = svc.delete_customer(5).await.unwrap_err();
        assert_eq!(err.to_string(), "Customer with id 5 does not exist");
        assert_eq!(repo.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn delete_existing_then_lookup_is_not_found() {
        let (repo, svc) = seeded().await;
        svc.delete_customer(1).await.unwrap();
        assert_eq!(repo.deletes.load(Ordering::SeqCst), 1);
        assert!(matches!(svc.get_customer(1).await, Err(CustomerError::NotFound(_))));
        assert!(svc.list_customers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn works_behind_trait_object() {
        let repo: Arc<dyn CustomerRepository> = Arc::new(MemoryCustomerRepository::new());
        let svc: CustomerService<dyn CustomerRepository> = CustomerService::new(repo);

        svc.create_customer(request("Filipe", "f@x.com", "BE")).await.unwrap();
        let listed = svc.list_customers().await.unwrap();
        assert_eq!(listed.len(), 1);
        let id = listed[0].id.unwrap();

        svc.update_customer(id, CustomerUpdate::default().email("g@x.com")).await.unwrap();
        let after = svc.get_customer(id).await.unwrap();
        assert_eq!((after.name.as_str(), after.email.as_str(), after.address.as_str()), ("Filipe", "g@x.com", "BE"));

        svc.delete_customer(id).await.unwrap();
        assert!(svc.list_customers().await.unwrap().is_empty());
    }
}
