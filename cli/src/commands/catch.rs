use clap::Subcommand;
use seablock_client::capabilities::Page;
use seablock_client::models::CatchRecord;
use seablock_client::services::catch_service::{CatchForm, CatchService};
use seablock_client::services::RecordPage;

use super::{print_outcome, Context, ReadingArgs};
use crate::error::CliError;

#[derive(Subcommand)]
pub enum CatchCommand {
    /// List the catch records your role can see
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Verify a new catch on chain and record it
    Add {
        #[arg(long)]
        name: String,
        /// Kilograms (1-100)
        #[arg(long)]
        quantity: f64,
        #[command(flatten)]
        readings: ReadingArgs,
    },
    /// Rewrite a record; the stored freshness result is kept
    Edit {
        product_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        quantity: Option<f64>,
        #[command(flatten)]
        readings: ReadingArgs,
    },
    Delete {
        product_id: String,
    },
}

pub async fn execute(ctx: &Context, command: CatchCommand) -> Result<(), CliError> {
    match command {
        CatchCommand::List { search } => {
            let page = ctx
                .load_page::<CatchRecord>(Page::CatchRecords, &search)
                .await?;
            ctx.print_records(&page);
        }
        CatchCommand::Add {
            name,
            quantity,
            readings,
        } => {
            let page: RecordPage<CatchRecord> = ctx.open_page(Page::CatchRecords)?;
            page.ensure_can_create()?;
            let form = CatchForm {
                product_name: name,
                quantity,
                readings: readings.resolve(None)?,
            };
            let outcome = CatchService::new(&ctx.clients, page.session())
                .create(&form, &ctx.prompt())
                .await?;
            print_outcome(&outcome);
        }
        CatchCommand::Edit {
            product_id,
            name,
            quantity,
            readings,
        } => {
            let page = ctx
                .load_page::<CatchRecord>(Page::CatchRecords, "")
                .await?;
            page.ensure_can_edit()?;
            let existing = page
                .find(&product_id)
                .ok_or_else(|| CliError::Input(format!("No catch record {}", product_id)))?;

            let mut form = CatchForm::from_record(existing);
            if let Some(name) = name {
                form.product_name = name;
            }
            if let Some(quantity) = quantity {
                form.quantity = quantity;
            }
            form.readings = readings.resolve(Some(form.readings))?;

            let outcome = CatchService::new(&ctx.clients, page.session())
                .edit(existing, &form, &ctx.prompt())
                .await?;
            print_outcome(&outcome);
        }
        CatchCommand::Delete { product_id } => {
            let mut page = ctx
                .load_page::<CatchRecord>(Page::CatchRecords, "")
                .await?;
            if page.delete(&product_id, &ctx.prompt()).await? {
                println!("Deleted {}.", product_id);
            }
        }
    }
    Ok(())
}
