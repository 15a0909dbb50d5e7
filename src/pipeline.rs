//! Sales pipeline stages for apartment complexes.
//!
//! Stages are displayed as an ordered kanban, but moves are unguarded: any
//! stage can be reached from any other, and an `Active` customer can be
//! dragged back to an earlier stage. Deals do regress, so no transition
//! table exists here.

use serde::{Deserialize, Serialize};

use crate::stores::Customer;
use crate::util::{matches_query, normalize_query};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    #[default]
    Prospect,
    Proposal,
    Negotiation,
    Active,
}

/// Kanban column order.
pub const STATUS_ORDER: [CustomerStatus; 4] = [
    CustomerStatus::Prospect,
    CustomerStatus::Proposal,
    CustomerStatus::Negotiation,
    CustomerStatus::Active,
];

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Prospect => "prospect",
            CustomerStatus::Proposal => "proposal",
            CustomerStatus::Negotiation => "negotiation",
            CustomerStatus::Active => "active",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CustomerStatus::Prospect => "방문",
            CustomerStatus::Proposal => "견적 제안",
            CustomerStatus::Negotiation => "제출",
            CustomerStatus::Active => "계약 중",
        }
    }

    pub fn from_str_lossy(s: &str) -> Option<Self> {
        match s.trim() {
            "prospect" => Some(CustomerStatus::Prospect),
            "proposal" => Some(CustomerStatus::Proposal),
            "negotiation" => Some(CustomerStatus::Negotiation),
            "active" => Some(CustomerStatus::Active),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, CustomerStatus::Active)
    }
}

/// One kanban column.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineColumn {
    pub status: CustomerStatus,
    pub label: &'static str,
    pub customers: Vec<Customer>,
}

/// Bucket customers by stage, columns in display order, customers in input
/// order within each column.
pub fn bucket_by_status(customers: &[Customer]) -> Vec<PipelineColumn> {
    STATUS_ORDER
        .iter()
        .map(|&status| PipelineColumn {
            status,
            label: status.label(),
            customers: customers
                .iter()
                .filter(|c| c.status == status)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Move one customer to `status`. Returns `false` if the id is unknown.
pub fn move_customer(customers: &mut [Customer], customer_id: &str, status: CustomerStatus) -> bool {
    match customers.iter_mut().find(|c| c.id == customer_id) {
        Some(customer) => {
            customer.status = status;
            true
        }
        None => false,
    }
}

/// Highlighted cards for the pipeline search box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineMatches {
    pub ids: Vec<String>,
    /// First match in list order, used to scroll the board.
    pub first_id: Option<String>,
}

/// Match customers by apartment name (case-insensitive substring).
pub fn search_pipeline(customers: &[Customer], query: &str) -> PipelineMatches {
    let Some(q) = normalize_query(query) else {
        return PipelineMatches::default();
    };
    let ids: Vec<String> = customers
        .iter()
        .filter(|c| matches_query(&c.name, &q))
        .map(|c| c.id.clone())
        .collect();
    PipelineMatches {
        first_id: ids.first().cloned(),
        ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str, name: &str, status: CustomerStatus) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            manager: String::new(),
            phone: String::new(),
            status,
            expiry_date: "03-15".to_string(),
            business_id: None,
        }
    }

    #[test]
    fn test_default_status_is_prospect() {
        assert_eq!(CustomerStatus::default(), CustomerStatus::Prospect);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&CustomerStatus::Negotiation).unwrap(), "\"negotiation\"");
        let parsed: CustomerStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(parsed, CustomerStatus::Active);
    }

    #[test]
    fn test_from_str_lossy_round_trips_as_str() {
        for status in STATUS_ORDER {
            assert_eq!(CustomerStatus::from_str_lossy(status.as_str()), Some(status));
        }
        assert_eq!(CustomerStatus::from_str_lossy("closed"), None);
    }

    #[test]
    fn test_bucket_by_status_keeps_column_order() {
        let customers = vec![
            customer("1", "A", CustomerStatus::Active),
            customer("2", "B", CustomerStatus::Prospect),
            customer("3", "C", CustomerStatus::Active),
        ];
        let columns = bucket_by_status(&customers);
        let statuses: Vec<CustomerStatus> = columns.iter().map(|c| c.status).collect();
        assert_eq!(statuses, STATUS_ORDER.to_vec());
        assert_eq!(columns[0].customers.len(), 1);
        assert!(columns[1].customers.is_empty());
        let active: Vec<&str> = columns[3].customers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(active, vec!["1", "3"]);
        assert_eq!(columns[3].label, "계약 중");
    }

    #[test]
    fn test_move_is_unguarded_in_both_directions() {
        let mut customers = vec![customer("1", "A", CustomerStatus::Prospect)];
        assert!(move_customer(&mut customers, "1", CustomerStatus::Active));
        assert_eq!(customers[0].status, CustomerStatus::Active);
        assert!(move_customer(&mut customers, "1", CustomerStatus::Prospect));
        assert_eq!(customers[0].status, CustomerStatus::Prospect);
    }

    #[test]
    fn test_move_unknown_id() {
        let mut customers = vec![customer("1", "A", CustomerStatus::Prospect)];
        assert!(!move_customer(&mut customers, "9", CustomerStatus::Active));
        assert_eq!(customers[0].status, CustomerStatus::Prospect);
    }

    #[test]
    fn test_search_pipeline() {
        let customers = vec![
            customer("1", "은마아파트", CustomerStatus::Prospect),
            customer("2", "대치자이", CustomerStatus::Active),
            customer("3", "래미안대치팰리스", CustomerStatus::Proposal),
        ];
        let matches = search_pipeline(&customers, " 대치 ");
        assert_eq!(matches.ids, vec!["2".to_string(), "3".to_string()]);
        assert_eq!(matches.first_id.as_deref(), Some("2"));
        assert_eq!(search_pipeline(&customers, ""), PipelineMatches::default());
    }
}
