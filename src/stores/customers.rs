//! Managed and prospective apartment complexes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{load_array, save_array};
use crate::pipeline::{self, CustomerStatus};
use crate::renewal::MonthDay;
use crate::storage::{StorageBackend, CUSTOMERS_KEY};
use crate::util::{generate_unique_id, matches_query, normalize_query};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    /// Apartment complex name. Unique by convention only.
    pub name: String,
    /// Site manager (관리소장) name.
    pub manager: String,
    pub phone: String,
    pub status: CustomerStatus,
    /// Insurance expiry as year-less `MM-DD`. May be empty.
    #[serde(default)]
    pub expiry_date: String,
    /// Business registration number (사업자등록번호).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<String>,
}

impl Customer {
    /// Parsed expiry, or `None` when empty or malformed.
    pub fn expiry(&self) -> Option<MonthDay> {
        MonthDay::parse(&self.expiry_date)
    }

    /// Trimmed business registration number, if one is filled in.
    pub fn business_id(&self) -> Option<&str> {
        self.business_id
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
    }
}

/// Form payload for registering or editing a customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub name: String,
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: CustomerStatus,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub business_id: String,
}

impl CustomerDraft {
    fn validated_name(&self) -> Result<String, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("아파트명을 입력해 주세요.".to_string());
        }
        Ok(name.to_string())
    }
}

/// Seed data shown until the planner saves their own list.
pub fn demo_customers() -> Vec<Customer> {
    let rows: [(&str, &str, &str, &str, CustomerStatus, &str); 10] = [
        ("1", "은마아파트", "김소장", "02-1234-5678", CustomerStatus::Prospect, "03-15"),
        ("2", "대치자이", "이소장", "02-2345-6789", CustomerStatus::Active, "04-28"),
        ("3", "래미안대치팰리스", "박소장", "02-3456-7890", CustomerStatus::Proposal, "03-30"),
        ("4", "도곡렉슬", "최소장", "02-4567-8901", CustomerStatus::Proposal, "04-05"),
        ("5", "도곡삼성래미안", "정소장", "02-5678-9012", CustomerStatus::Negotiation, "05-10"),
        ("6", "개포우성", "강소장", "02-6789-0123", CustomerStatus::Negotiation, "06-01"),
        ("7", "역삼래미안", "조소장", "02-7890-1234", CustomerStatus::Negotiation, "05-20"),
        ("8", "역삼푸르지오", "윤소장", "02-8901-2345", CustomerStatus::Active, "07-15"),
        ("9", "테헤란한신", "장소장", "02-9012-3456", CustomerStatus::Active, "08-01"),
        ("10", "선릉삼성", "한소장", "02-0123-4567", CustomerStatus::Active, "08-20"),
    ];
    rows.iter()
        .map(|(id, name, manager, phone, status, expiry)| Customer {
            id: id.to_string(),
            name: name.to_string(),
            manager: manager.to_string(),
            phone: phone.to_string(),
            status: *status,
            expiry_date: expiry.to_string(),
            business_id: None,
        })
        .collect()
}

/// Case-insensitive search over apartment name and manager name.
pub fn search_customers(customers: &[Customer], query: &str) -> Vec<Customer> {
    match normalize_query(query) {
        None => customers.to_vec(),
        Some(q) => customers
            .iter()
            .filter(|c| matches_query(&c.name, &q) || matches_query(&c.manager, &q))
            .cloned()
            .collect(),
    }
}

pub struct CustomerStore {
    backend: Arc<dyn StorageBackend>,
}

impl CustomerStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// All customers; the demo list when nothing valid is stored.
    pub fn load(&self) -> Vec<Customer> {
        load_array(self.backend.as_ref(), CUSTOMERS_KEY).unwrap_or_else(demo_customers)
    }

    pub fn save(&self, customers: &[Customer]) {
        save_array(self.backend.as_ref(), CUSTOMERS_KEY, customers);
    }

    pub fn get(&self, id: &str) -> Option<Customer> {
        self.load().into_iter().find(|c| c.id == id)
    }

    /// Register a new complex. New customers go to the top of the list.
    pub fn add(&self, draft: CustomerDraft) -> Result<Customer, String> {
        let name = draft.validated_name()?;
        let mut customers = self.load();
        let id = generate_unique_id("cust", |candidate| {
            customers.iter().any(|c| c.id == candidate)
        });
        let business_id = draft.business_id.trim().to_string();
        let customer = Customer {
            id,
            name,
            manager: draft.manager,
            phone: draft.phone,
            status: draft.status,
            expiry_date: draft.expiry_date.trim().to_string(),
            business_id: Some(business_id),
        };
        customers.insert(0, customer.clone());
        self.save(&customers);
        log::info!("Registered customer {} ({})", customer.name, customer.id);
        Ok(customer)
    }

    /// Replace the editable fields of an existing customer.
    pub fn update(&self, id: &str, draft: CustomerDraft) -> Result<Customer, String> {
        let name = draft.validated_name()?;
        let mut customers = self.load();
        let customer = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| format!("Customer not found: {}", id))?;
        customer.name = name;
        customer.manager = draft.manager;
        customer.phone = draft.phone;
        customer.status = draft.status;
        customer.expiry_date = draft.expiry_date.trim().to_string();
        customer.business_id = Some(draft.business_id.trim().to_string());
        let updated = customer.clone();
        self.save(&customers);
        Ok(updated)
    }

    /// Pipeline drag-and-drop: change only the status.
    pub fn move_status(&self, id: &str, status: CustomerStatus) -> Result<(), String> {
        let mut customers = self.load();
        if !pipeline::move_customer(&mut customers, id, status) {
            return Err(format!("Customer not found: {}", id));
        }
        self.save(&customers);
        Ok(())
    }
}
