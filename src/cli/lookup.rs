//! Lookup commands: reference data, searches and requisition history
//!
//! Each command follows the same flow: build the context, fetch the raw
//! payload, convert to display rows, print.

use bytes::Bytes;
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tabled::Tabled;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::models::{Employee, ItemResult, Location, VendorOption};
use crate::error::Result;
use crate::output::display::{
    EmployeeDisplay, ItemDisplay, LocationDisplay, RequisitionLineDisplay, VendorDisplay,
};
use crate::output::{self, json};

pub async fn employees(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    let payload = ctx.service.employees(&ctx.call()).await?;
    print_payload::<Employee, EmployeeDisplay>(&payload, ctx.format, "employees")
}

pub async fn locations(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    let payload = ctx.service.locations(&ctx.call()).await?;
    print_payload::<Location, LocationDisplay>(&payload, ctx.format, "locations")
}

pub async fn items(opts: &GlobalOptions, query: &str) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    let payload = ctx.service.search_items(&ctx.call(), query).await?;
    print_payload::<ItemResult, ItemDisplay>(&payload, ctx.format, "items")
}

pub async fn vendors(opts: &GlobalOptions, query: &str) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    let payload = ctx.service.search_vendors(&ctx.call(), query).await?;
    print_payload::<VendorOption, VendorDisplay>(&payload, ctx.format, "vendors")
}

pub async fn item_vendors(opts: &GlobalOptions, item_id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    let payload = ctx.service.item_vendors(&ctx.call(), item_id).await?;
    print_payload::<VendorOption, VendorDisplay>(&payload, ctx.format, "item vendors")
}

pub async fn requests(opts: &GlobalOptions, employee_id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    let lines = ctx
        .service
        .requisition_history(&ctx.call(), employee_id)
        .await?;

    debug!("Fetched {} requisition lines", lines.len());
    let rows: Vec<RequisitionLineDisplay> = lines.into_iter().map(Into::into).collect();
    output::print(&rows, ctx.format)
}

/// Print a list payload as display rows.
///
/// Payloads that don't match the expected shape are still shown, as
/// pretty JSON, so nothing the restlet returns is hidden.
fn print_payload<T, D>(payload: &Bytes, format: OutputFormat, resource: &str) -> Result<()>
where
    T: DeserializeOwned,
    D: From<T> + Tabled + Serialize,
{
    println!("{}", render_payload::<T, D>(payload, format, resource)?);
    Ok(())
}

fn render_payload<T, D>(payload: &Bytes, format: OutputFormat, resource: &str) -> Result<String>
where
    T: DeserializeOwned,
    D: From<T> + Tabled + Serialize,
{
    match serde_json::from_slice::<Vec<T>>(payload) {
        Ok(records) => {
            debug!("Fetched {} {}", records.len(), resource);
            let rows: Vec<D> = records.into_iter().map(D::from).collect();
            output::Formattable::format(&rows, format)
        }
        Err(e) => {
            debug!("Untyped {} payload ({}), printing as JSON", resource, e);
            match json::format_payload(payload) {
                Ok(pretty) => Ok(pretty),
                Err(_) => Ok(String::from_utf8_lossy(payload).into_owned()),
            }
        }
    }
}
