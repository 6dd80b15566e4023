use clap::Subcommand;
use seablock_client::capabilities::Page;
use seablock_client::models::Transaction;
use seablock_client::services::transaction_service::{
    TransactionForm, TransactionOptions, TransactionService,
};
use seablock_client::services::RecordPage;

use super::{print_outcome, Context};
use crate::error::CliError;

#[derive(Subcommand)]
pub enum TxCommand {
    /// List transactions
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show the products and receiving companies the form offers
    Options,
    /// Record a product hand-over on chain
    Add {
        /// One of your catch record product ids
        #[arg(long)]
        product: String,
        /// Receiving company username
        #[arg(long)]
        company: String,
        #[arg(long)]
        amount: f64,
        /// YYYY-MM-DD
        #[arg(long)]
        expiry: String,
    },
    /// Rewrite the stored row; nothing is sent on chain
    Edit {
        id: String,
        #[arg(long)]
        product: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        expiry: Option<String>,
    },
    Delete {
        id: String,
    },
}

pub async fn execute(ctx: &Context, command: TxCommand) -> Result<(), CliError> {
    match command {
        TxCommand::List { search } => {
            let page = ctx
                .load_page::<Transaction>(Page::Transactions, &search)
                .await?;
            ctx.print_records(&page);
        }
        TxCommand::Options => {
            let page: RecordPage<Transaction> = ctx.open_page(Page::Transactions)?;
            page.ensure_can_create()?;
            let options = TransactionOptions::load(page.backend(), page.session()).await?;
            println!("Products:");
            for p in &options.products {
                println!("  {}  {}  {}", p.product_id, p.product_name, p.freshness_label);
            }
            println!("Companies:");
            for c in &options.companies {
                println!("  {}", c.username);
            }
        }
        TxCommand::Add {
            product,
            company,
            amount,
            expiry,
        } => {
            let page: RecordPage<Transaction> = ctx.open_page(Page::Transactions)?;
            page.ensure_can_create()?;
            let options = TransactionOptions::load(page.backend(), page.session()).await?;

            let mut form = TransactionForm {
                amount,
                expiry_date: expiry,
                ..Default::default()
            };
            form.select_product(&options, &product);
            form.select_company(&options, &company);
            if form.end_user_wallet.is_empty() {
                return Err(CliError::Input(format!(
                    "Company {} has no wallet address on record",
                    company
                )));
            }

            let outcome = TransactionService::new(&ctx.clients, page.session())
                .create(&form, &ctx.prompt())
                .await?;
            print_outcome(&outcome);
        }
        TxCommand::Edit {
            id,
            product,
            company,
            amount,
            expiry,
        } => {
            let page = ctx
                .load_page::<Transaction>(Page::Transactions, "")
                .await?;
            page.ensure_can_edit()?;
            let existing = page
                .find(&id)
                .ok_or_else(|| CliError::Input(format!("No transaction {}", id)))?;

            let mut form = TransactionForm::from_transaction(existing);
            if product.is_some() || company.is_some() {
                let options = TransactionOptions::load(page.backend(), page.session()).await?;
                if let Some(product) = product {
                    form.select_product(&options, &product);
                }
                if let Some(company) = company {
                    form.select_company(&options, &company);
                }
            }
            if let Some(amount) = amount {
                form.amount = amount;
            }
            if let Some(expiry) = expiry {
                form.expiry_date = expiry;
            }

            let outcome = TransactionService::new(&ctx.clients, page.session())
                .edit(existing, &form, &ctx.prompt())
                .await?;
            print_outcome(&outcome);
        }
        TxCommand::Delete { id } => {
            let mut page = ctx.load_page::<Transaction>(Page::Transactions, "").await?;
            if page.delete(&id, &ctx.prompt()).await? {
                println!("Deleted transaction {}.", id);
            }
        }
    }
    Ok(())
}
