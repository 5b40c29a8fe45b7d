//! Display models for table and JSON output
//!
//! Display models flatten restlet payload types into CLI-friendly rows with
//! stable column names.

use serde::Serialize;
use tabled::Tabled;

use crate::client::models::{Employee, ItemResult, Location, RequisitionLine, VendorOption};

fn or_na(value: String) -> String {
    if value.trim().is_empty() {
        "N/A".to_string()
    } else {
        value
    }
}

/// Format a purchase price, or "N/A" when the vendor has none on file.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("{:.2}", p),
        None => "N/A".to_string(),
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct EmployeeDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "EMAIL")]
    pub email: String,
}

impl From<Employee> for EmployeeDisplay {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            name: e.name,
            email: or_na(e.email),
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct LocationDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,
}

impl From<Location> for LocationDisplay {
    fn from(l: Location) -> Self {
        Self {
            id: l.id,
            name: l.name,
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ItemDisplay {
    #[tabled(rename = "ITEM ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "SKU")]
    pub sku: String,

    #[tabled(rename = "DESCRIPTION")]
    pub description: String,
}

impl From<ItemResult> for ItemDisplay {
    fn from(i: ItemResult) -> Self {
        Self {
            id: i.id,
            name: i.name,
            sku: or_na(i.sku),
            description: i.description,
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct VendorDisplay {
    #[tabled(rename = "VENDOR ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    /// Purchase price for the item, when listed per item
    #[tabled(rename = "PRICE")]
    pub price: String,
}

impl From<VendorOption> for VendorDisplay {
    fn from(v: VendorOption) -> Self {
        Self {
            id: v.id,
            name: v.name,
            price: format_price(v.purchase_price),
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct RequisitionLineDisplay {
    #[tabled(rename = "DATE")]
    pub date: String,

    #[tabled(rename = "REQUISITION")]
    pub tran_id: String,

    #[tabled(rename = "ITEM")]
    pub item: String,

    #[tabled(rename = "VENDOR")]
    pub vendor: String,

    #[tabled(rename = "PO")]
    pub po_number: String,
}

impl From<RequisitionLine> for RequisitionLineDisplay {
    fn from(line: RequisitionLine) -> Self {
        Self {
            date: line.tran_date,
            tran_id: line.tran_id,
            item: line.item_name,
            vendor: or_na(line.vendor_name),
            po_number: or_na(line.po_number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(9.5)), "9.50");
        assert_eq!(format_price(Some(0.0)), "0.00");
        assert_eq!(format_price(None), "N/A");
    }

    #[test]
    fn test_vendor_display() {
        let display = VendorDisplay::from(VendorOption {
            id: "5".to_string(),
            name: "Acme".to_string(),
            purchase_price: Some(12.5),
        });
        assert_eq!(display.price, "12.50");
    }

    #[test]
    fn test_requisition_line_without_po() {
        let line: RequisitionLine = serde_json::from_str(
            r#"{"tranDate":"1/5/2026","tranId":"REQ9","itemName":"Gloves","vendorName":"","poNumber":null}"#,
        )
        .unwrap();

        let display = RequisitionLineDisplay::from(line);
        assert_eq!(display.tran_id, "REQ9");
        assert_eq!(display.vendor, "N/A");
        assert_eq!(display.po_number, "N/A");
    }

    #[test]
    fn test_employee_display_blank_email() {
        let display = EmployeeDisplay::from(Employee {
            id: "7".to_string(),
            name: "Ada".to_string(),
            email: String::new(),
        });
        assert_eq!(display.email, "N/A");
    }
}
