//! Typed views of restlet payloads
//!
//! The gateway itself passes bytes through untouched; these types are used
//! where a caller needs to look inside (requisition history, create
//! responses, table output).

use serde::{Deserialize, Deserializer, Serialize};

/// NetSuite ids and text fields may arrive as strings, numbers or null.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Like `lenient_string`, with null or missing kept as `None`.
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Employee (requestor)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
}

/// Delivery location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

/// Item search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResult {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub sku: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

/// Vendor, optionally with its purchase price for a given item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorOption {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default)]
    pub purchase_price: Option<f64>,
}

/// One line of a requisition being submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionItem {
    pub item_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_new_vendor: bool,

    pub quantity: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Requisition as entered by the requestor, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionDraft {
    #[serde(default)]
    pub requestor_id: String,

    #[serde(default)]
    pub subsidiary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "notes")]
    pub memo: Option<String>,

    #[serde(default)]
    pub items: Vec<RequisitionItem>,
}

impl RequisitionDraft {
    /// Trim text fields and turn blank optionals into `None`.
    pub fn normalized(self) -> Self {
        let blank_to_none = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        Self {
            requestor_id: self.requestor_id.trim().to_string(),
            subsidiary: self.subsidiary.trim().to_string(),
            location: blank_to_none(self.location),
            memo: blank_to_none(self.memo),
            items: self.items,
        }
    }
}

/// Body of the `createRequisition` POST
#[derive(Debug, Clone, Serialize)]
pub struct CreateRequisitionRequest {
    pub action: &'static str,

    #[serde(flatten)]
    pub draft: RequisitionDraft,
}

/// Restlet answer to `createRequisition`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRequisition {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub tran_id: Option<String>,
}

impl CreatedRequisition {
    /// Confirmation shown to the requestor
    pub fn message(&self) -> String {
        match self.tran_id.as_deref().filter(|t| !t.is_empty()) {
            Some(tran_id) => format!("Requisition {} submitted.", tran_id),
            None => "Requisition submitted.".to_string(),
        }
    }
}

/// A single line from an employee's requisition history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionLine {
    #[serde(default, deserialize_with = "lenient_string")]
    pub tran_date: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub tran_id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub item_name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub vendor_name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub po_number: String,
}
