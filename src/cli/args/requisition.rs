//! Arguments for submitting a requisition

use clap::Args;

use crate::client::models::{RequisitionDraft, RequisitionItem};
use crate::error::{ApiError, Result};

/// Requisition fields for `reqgate create`.
///
/// Line items are given either as repeated `--item` flags or as one JSON
/// array with `--items-json`.
#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Employee id of the requestor
    #[arg(long)]
    pub requestor: String,

    /// Subsidiary id
    #[arg(long)]
    pub subsidiary: String,

    /// Delivery location id
    #[arg(long)]
    pub location: Option<String>,

    /// Free-text memo
    #[arg(long)]
    pub memo: Option<String>,

    /// Line item (repeatable)
    #[arg(
        long = "item",
        value_name = "ID:QTY[:VENDOR]",
        value_parser = parse_item_spec,
        conflicts_with = "items_json"
    )]
    pub items: Vec<RequisitionItem>,

    /// Line items as a JSON array of {itemId, quantity, vendorId, ...}
    #[arg(long, value_name = "JSON")]
    pub items_json: Option<String>,
}

impl CreateArgs {
    pub fn into_draft(self) -> Result<RequisitionDraft> {
        let items = match self.items_json {
            Some(raw) => serde_json::from_str::<Vec<RequisitionItem>>(&raw).map_err(|e| {
                ApiError::InvalidArgument(format!("invalid --items-json: {}", e))
            })?,
            None => self.items,
        };

        Ok(RequisitionDraft {
            requestor_id: self.requestor,
            subsidiary: self.subsidiary,
            location: self.location,
            memo: self.memo,
            items,
        })
    }
}

/// Parse `ID:QTY[:VENDOR]` into a line item.
pub fn parse_item_spec(spec: &str) -> std::result::Result<RequisitionItem, String> {
    let mut parts = spec.splitn(3, ':').map(str::trim);

    let item_id = parts.next().unwrap_or_default();
    if item_id.is_empty() {
        return Err(format!("missing item id in '{}'", spec));
    }

    let quantity = match parts.next() {
        Some(q) => q
            .parse::<f64>()
            .map_err(|_| format!("invalid quantity '{}' in '{}'", q, spec))?,
        None => return Err(format!("expected ID:QTY[:VENDOR], got '{}'", spec)),
    };
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(format!("quantity must be greater than zero in '{}'", spec));
    }

    let vendor_id = parts.next().filter(|v| !v.is_empty()).map(str::to_string);

    Ok(RequisitionItem {
        item_id: item_id.to_string(),
        vendor_id,
        is_new_vendor: false,
        quantity,
        estimated_price: None,
        description: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_spec() {
        let item = parse_item_spec("100:2").unwrap();
        assert_eq!(item.item_id, "100");
        assert_eq!(item.quantity, 2.0);
        assert_eq!(item.vendor_id, None);

        let item = parse_item_spec("100:1.5:42").unwrap();
        assert_eq!(item.quantity, 1.5);
        assert_eq!(item.vendor_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_parse_item_spec_errors() {
        assert!(parse_item_spec("100").is_err());
        assert!(parse_item_spec(":2").is_err());
        assert!(parse_item_spec("100:abc").is_err());
        assert!(parse_item_spec("100:0").is_err());
        assert!(parse_item_spec("100:-1").is_err());
    }

    fn args(items: Vec<RequisitionItem>, items_json: Option<&str>) -> CreateArgs {
        CreateArgs {
            requestor: "7".to_string(),
            subsidiary: "1".to_string(),
            location: None,
            memo: None,
            items,
            items_json: items_json.map(str::to_string),
        }
    }

    #[test]
    fn test_into_draft_from_flags() {
        let draft = args(vec![parse_item_spec("100:2").unwrap()], None)
            .into_draft()
            .unwrap();
        assert_eq!(draft.requestor_id, "7");
        assert_eq!(draft.items.len(), 1);
    }

    #[test]
    fn test_into_draft_from_json() {
        let draft = args(
            vec![],
            Some(r#"[{"itemId":"100","quantity":3,"vendorId":"5","isNewVendor":true}]"#),
        )
        .into_draft()
        .unwrap();
        assert_eq!(draft.items[0].vendor_id.as_deref(), Some("5"));
        assert!(draft.items[0].is_new_vendor);

        assert!(args(vec![], Some("not json")).into_draft().is_err());
    }
}
