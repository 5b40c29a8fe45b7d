//! Create command implementation

use colored::Colorize;
use log::debug;
use serde_json::json;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, CreateArgs, OutputFormat};
use crate::client::models::CreatedRequisition;
use crate::error::Result;
use crate::output::json::format_json;
use crate::output::table;

/// Submit a requisition and print the confirmation
pub async fn run(opts: &GlobalOptions, args: CreateArgs) -> Result<()> {
    let draft = args.into_draft()?;
    let ctx = CommandContext::new(opts).await?;

    debug!(
        "Submitting requisition for {} with {} items",
        draft.requestor_id,
        draft.items.len()
    );
    let created = ctx.service.create_requisition(&ctx.call(), draft).await?;

    println!("{}", render(&created, ctx.format)?);
    Ok(())
}

fn render(created: &CreatedRequisition, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format_json(&json!({
            "id": created.id,
            "tranId": created.tran_id,
            "message": created.message(),
        }))?),
        OutputFormat::Table => {
            let mut fields = vec![("Internal ID", created.id.clone())];
            if let Some(tran_id) = &created.tran_id {
                fields.push(("Requisition", tran_id.clone()));
            }
            Ok(format!(
                "{} {}\n{}",
                "✓".green(),
                created.message(),
                table::format_fields(&fields)
            ))
        }
    }
}
