use clap::Subcommand;
use seablock_client::capabilities::Page;
use seablock_client::models::{ProcessMethod, ProcessRecord};
use seablock_client::services::process_service::{ProcessForm, ProcessService};
use seablock_client::services::RecordPage;

use super::{print_outcome, Context, ReadingArgs};
use crate::error::CliError;

#[derive(Subcommand)]
pub enum ProcessCommand {
    /// List the process records your role can see
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Verify a processed batch on chain and record it
    Add {
        #[arg(long)]
        name: String,
        /// Kilograms (1-100)
        #[arg(long)]
        quantity: f64,
        /// e.g. Freezing, "Boiling / Blanching", "Vacuum Packaging"
        #[arg(long)]
        method: String,
        #[command(flatten)]
        readings: ReadingArgs,
    },
    /// Re-verify and rewrite a record under its product id
    Edit {
        product_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        quantity: Option<f64>,
        #[arg(long)]
        method: Option<String>,
        #[command(flatten)]
        readings: ReadingArgs,
    },
    Delete {
        product_id: String,
    },
    /// Print the accepted process methods
    Methods,
}

pub async fn execute(ctx: &Context, command: ProcessCommand) -> Result<(), CliError> {
    match command {
        ProcessCommand::List { search } => {
            let page = ctx
                .load_page::<ProcessRecord>(Page::ProcessRecords, &search)
                .await?;
            ctx.print_records(&page);
        }
        ProcessCommand::Add {
            name,
            quantity,
            method,
            readings,
        } => {
            let page: RecordPage<ProcessRecord> = ctx.open_page(Page::ProcessRecords)?;
            page.ensure_can_create()?;
            let form = ProcessForm {
                product_name: name,
                quantity,
                process_method: method.parse()?,
                readings: readings.resolve(None)?,
            };
            let outcome = ProcessService::new(&ctx.clients, page.session())
                .create(&form, &ctx.prompt())
                .await?;
            print_outcome(&outcome);
        }
        ProcessCommand::Edit {
            product_id,
            name,
            quantity,
            method,
            readings,
        } => {
            let page = ctx
                .load_page::<ProcessRecord>(Page::ProcessRecords, "")
                .await?;
            page.ensure_can_edit()?;
            let existing = page
                .find(&product_id)
                .ok_or_else(|| CliError::Input(format!("No process record {}", product_id)))?;

            let mut form = ProcessForm::from_record(existing)?;
            if let Some(name) = name {
                form.product_name = name;
            }
            if let Some(quantity) = quantity {
                form.quantity = quantity;
            }
            if let Some(method) = method {
                form.process_method = method.parse()?;
            }
            form.readings = readings.resolve(Some(form.readings))?;

            let outcome = ProcessService::new(&ctx.clients, page.session())
                .edit(existing, &form, &ctx.prompt())
                .await?;
            print_outcome(&outcome);
        }
        ProcessCommand::Delete { product_id } => {
            let mut page = ctx
                .load_page::<ProcessRecord>(Page::ProcessRecords, "")
                .await?;
            if page.delete(&product_id, &ctx.prompt()).await? {
                println!("Deleted {}.", product_id);
            }
        }
        ProcessCommand::Methods => {
            for method in ProcessMethod::ALL {
                println!("{}", method);
            }
        }
    }
    Ok(())
}
