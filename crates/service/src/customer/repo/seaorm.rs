use sea_orm::{ActiveModelTrait, ActiveValue::{NotSet, Set, Unchanged}, DatabaseConnection, EntityTrait};

use models::customer;

use crate::customer::domain::Customer;
use crate::customer::errors::CustomerError;
use crate::customer::repository::CustomerRepository;

/// SeaORM-backed repository over the `customer` table.
pub struct SeaOrmCustomerRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, CustomerError> {
        let rows = customer::list(&self.db).await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, CustomerError> {
        let res = customer::Entity::find_by_id(id).one(&self.db).await?;
        Ok(res.map(Customer::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError> {
        let res = customer::find_by_email(&self.db, email).await?;
        Ok(res.map(Customer::from))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, CustomerError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn save(&self, c: Customer) -> Result<Customer, CustomerError> {
        let saved = match c.id {
            None => {
                let am = customer::ActiveModel {
                    id: NotSet,
                    name: Set(c.name),
                    email: Set(c.email),
                    address: Set(c.address),
                };
                am.insert(&self.db).await?
            }
            Some(id) => {
                let am = customer::ActiveModel {
                    id: Unchanged(id),
                    name: Set(c.name),
                    email: Set(c.email),
                    address: Set(c.address),
                };
                am.update(&self.db).await?
            }
        };
        Ok(saved.into())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), CustomerError> {
        customer::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
