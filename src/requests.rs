//! Client request kinds and the content conventions that go with them.
//!
//! Accident reports, estimate requests and contact requests share one record
//! type. New records carry an explicit `RequestKind`; older records were
//! told apart only by fixed prefixes on their content, so that rule is kept
//! as the migration default for records stored without a kind.

use serde::{Deserialize, Serialize};

pub const ESTIMATE_PREFIX: &str = "보험 견적 접수";
pub const CONTACT_PREFIX: &str = "담당자 연락 요청";
/// Content recorded when an accident report is submitted with no text.
pub const EMPTY_CONTENT: &str = "(내용 없음)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Accident,
    Estimate,
    Contact,
}

impl RequestKind {
    /// Legacy classification by content prefix.
    pub fn classify_content(content: &str) -> Self {
        if content.starts_with(ESTIMATE_PREFIX) {
            RequestKind::Estimate
        } else if content.starts_with(CONTACT_PREFIX) {
            RequestKind::Contact
        } else {
            RequestKind::Accident
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Accident => "사고 접수",
            RequestKind::Estimate => "보험 견적",
            RequestKind::Contact => "연락 요청",
        }
    }
}

/// Insurance products offered on the estimate form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsuranceProduct {
    pub value: &'static str,
    pub label: &'static str,
}

pub const INSURANCE_PRODUCTS: [InsuranceProduct; 4] = [
    InsuranceProduct { value: "apartment-fire", label: "아파트화재보험" },
    InsuranceProduct { value: "playground-liability", label: "어린이놀이시설배상책임보험" },
    InsuranceProduct { value: "elevator-liability", label: "승강기사고배상책임보험" },
    InsuranceProduct { value: "other", label: "기타보험" },
];

/// Display label for a product value. Unknown values are shown as typed;
/// an empty value becomes "보험".
pub fn product_label(value: &str) -> String {
    INSURANCE_PRODUCTS
        .iter()
        .find(|p| p.value == value)
        .map(|p| p.label.to_string())
        .unwrap_or_else(|| {
            if value.is_empty() {
                "보험".to_string()
            } else {
                value.to_string()
            }
        })
}

/// Content line for an estimate request, e.g.
/// "보험 견적 접수 - 아파트화재보험 (만기 3/15)".
pub fn estimate_content(product_value: &str, expiry_month: &str, expiry_day: &str) -> String {
    format!(
        "{} - {} (만기 {}/{})",
        ESTIMATE_PREFIX,
        product_label(product_value),
        expiry_month,
        expiry_day
    )
}

/// Accident report content: trimmed, with a placeholder when blank.
pub fn accident_content(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        EMPTY_CONTENT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Shorten content for table cells: first 15 characters plus an ellipsis.
pub fn preview(content: &str) -> String {
    const PREVIEW_CHARS: usize = 15;
    if content.chars().count() > PREVIEW_CHARS {
        let head: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", head)
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_content_prefixes() {
        assert_eq!(
            RequestKind::classify_content("보험 견적 접수 - 아파트화재보험 (만기 3/15)"),
            RequestKind::Estimate
        );
        assert_eq!(RequestKind::classify_content("담당자 연락 요청"), RequestKind::Contact);
        assert_eq!(RequestKind::classify_content("지하주차장 누수"), RequestKind::Accident);
        // prefix must be at the start
        assert_eq!(
            RequestKind::classify_content("누수 관련 담당자 연락 요청"),
            RequestKind::Accident
        );
    }

    #[test]
    fn test_estimate_content_known_product() {
        assert_eq!(
            estimate_content("apartment-fire", "3", "15"),
            "보험 견적 접수 - 아파트화재보험 (만기 3/15)"
        );
    }

    #[test]
    fn test_estimate_content_unknown_and_empty_product() {
        assert_eq!(estimate_content("custom", "1", "2"), "보험 견적 접수 - custom (만기 1/2)");
        assert_eq!(estimate_content("", "", ""), "보험 견적 접수 - 보험 (만기 /)");
    }

    #[test]
    fn test_estimate_content_classifies_as_estimate() {
        let content = estimate_content("other", "12", "1");
        assert_eq!(RequestKind::classify_content(&content), RequestKind::Estimate);
    }

    #[test]
    fn test_accident_content_placeholder() {
        assert_eq!(accident_content("   "), "(내용 없음)");
        assert_eq!(accident_content(" 화재 발생 "), "화재 발생");
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        assert_eq!(preview("짧은 내용"), "짧은 내용");
        let long = "지하 주차장 천장에서 물이 새고 있습니다";
        let shortened = preview(long);
        assert!(shortened.ends_with('…'));
        assert_eq!(shortened.chars().count(), 16);
    }

    #[test]
    fn test_kind_serde() {
        assert_eq!(serde_json::to_string(&RequestKind::Estimate).unwrap(), "\"estimate\"");
    }
}
