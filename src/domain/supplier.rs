use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Domain representation of a digital stock supplier.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Supplier {
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub is_archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new supplier for a hub.
#[derive(Debug, Clone)]
pub struct NewSupplier {
    pub hub_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl NewSupplier {
    pub fn new(hub_id: i32, name: impl Into<String>) -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            hub_id,
            name: name.into(),
            email: None,
            website: None,
            updated_at: now,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }
}

/// Patch data applied when updating an existing supplier.
#[derive(Debug, Clone)]
pub struct UpdateSupplier {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub is_archived: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateSupplier {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateSupplier {
    pub fn new() -> Self {
        let now = chrono::Local::now().naive_utc();
        Self {
            name: None,
            email: None,
            website: None,
            is_archived: None,
            updated_at: now,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: Option<impl Into<String>>) -> Self {
        self.email = Some(email.map(|value| value.into()));
        self
    }

    pub fn website(mut self, website: Option<impl Into<String>>) -> Self {
        self.website = Some(website.map(|value| value.into()));
        self
    }

    pub fn archived(mut self, is_archived: bool) -> Self {
        self.is_archived = Some(is_archived);
        self
    }
}

/// Query definition used to list suppliers for a hub.
#[derive(Debug, Clone)]
pub struct SupplierListQuery {
    pub hub_id: i32,
    pub search: Option<String>,
    pub include_archived: bool,
    pub pagination: Option<Pagination>,
}

impl SupplierListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            include_archived: false,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn include_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
