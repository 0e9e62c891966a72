use serde::{Deserialize, Serialize};

/// Customer as seen by the service layer.
///
/// `id` is `None` until the store assigns one on first save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub address: String,
}

impl Customer {
    pub fn new(name: impl Into<String>, email: impl Into<String>, address: impl Into<String>) -> Self {
        Self { id: None, name: name.into(), email: email.into(), address: address.into() }
    }
}

impl From<models::customer::Model> for Customer {
    fn from(m: models::customer::Model) -> Self {
        Self { id: Some(m.id), name: m.name, email: m.email, address: m.address }
    }
}

/// Body of `POST /api/v1/customers`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    pub address: String,
}

impl From<CreateCustomerRequest> for Customer {
    fn from(r: CreateCustomerRequest) -> Self { Customer::new(r.name, r.email, r.address) }
}

/// Partial update: each field is applied independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl CustomerUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self { self.name = Some(name.into()); self }
    pub fn email(mut self, email: impl Into<String>) -> Self { self.email = Some(email.into()); self }
    pub fn address(mut self, address: impl Into<String>) -> Self { self.address = Some(address.into()); self }
}

/// Returns the new value only when it is present, non-empty and differs from `current`.
pub(crate) fn changed<'a>(candidate: Option<&'a str>, current: &str) -> Option<&'a str> {
    candidate.filter(|v| !v.is_empty() && *v != current)
}
