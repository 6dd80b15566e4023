use clap::Subcommand;
use seablock_client::capabilities::Page;
use seablock_client::models::Feedback;
use seablock_client::services::track_recall::{Perspective, TrackRecall};

use super::Context;
use crate::error::CliError;

const TRANSACTION_COLUMNS: &[&str] = &[
    "transaction_id",
    "product_id",
    "sender",
    "end_user",
    "amount",
    "freshness",
    "expiry_date",
];

#[derive(Subcommand)]
pub enum RecallCommand {
    /// Transactions with a freshness summary and feedback overview
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        /// Companies: show transactions received rather than sent
        #[arg(long)]
        received: bool,
    },
    /// Print the feedback thread of one transaction
    Thread { transaction_id: String },
    /// Comment on a transaction and notify the counterparty
    Feedback {
        transaction_id: String,
        comment: String,
        #[arg(long)]
        received: bool,
    },
    /// Edit one of your own comments
    EditFeedback {
        transaction_id: String,
        feedback_id: String,
        comment: String,
    },
}

async fn open(ctx: &Context, received: bool) -> Result<TrackRecall, CliError> {
    let session = ctx.open_view(Page::TrackRecall)?;
    let mut recall = TrackRecall::open(ctx.clients.backend.clone(), session)?;
    if received {
        recall.switch_perspective(Perspective::Receiver).await?;
    } else {
        recall.refresh().await;
    }
    Ok(recall)
}

fn print_thread(thread: &[Feedback]) {
    if thread.is_empty() {
        println!("No feedback yet.");
    }
    for f in thread {
        println!(
            "[{}] {} ({}): {}",
            f.id,
            f.username,
            f.created_at.as_deref().unwrap_or("-"),
            f.comment
        );
    }
}

pub async fn execute(ctx: &Context, command: RecallCommand) -> Result<(), CliError> {
    match command {
        RecallCommand::List { search, received } => {
            let mut recall = open(ctx, received).await?;
            recall.set_search(search);
            let rows: Vec<_> = recall.filtered().into_iter().cloned().collect();
            ctx.table(TRANSACTION_COLUMNS, &rows);

            println!("\nFreshness:");
            for (label, count) in recall.freshness_distribution() {
                println!("  {:<12} {}", label, count);
            }

            let split = recall.feedback_split();
            println!(
                "\nFeedback from {}: {} ({})",
                split.counterparty_label,
                split.counterparty.len(),
                split.counterparties.join(", ")
            );
            println!("Other feedback: {}", split.others.len());
        }
        RecallCommand::Thread { transaction_id } => {
            let recall = open(ctx, false).await?;
            print_thread(&recall.feedback_for(&transaction_id).await?);
        }
        RecallCommand::Feedback {
            transaction_id,
            comment,
            received,
        } => {
            let mut recall = open(ctx, received).await?;
            let thread = recall.submit_feedback(&transaction_id, &comment).await?;
            println!("Feedback sent.");
            print_thread(&thread);
        }
        RecallCommand::EditFeedback {
            transaction_id,
            feedback_id,
            comment,
        } => {
            let mut recall = open(ctx, false).await?;
            let thread = recall.feedback_for(&transaction_id).await?;
            let feedback = thread
                .into_iter()
                .find(|f| f.id == feedback_id)
                .ok_or_else(|| CliError::Input(format!("No feedback {}", feedback_id)))?;
            let thread = recall.update_feedback(&feedback, &comment).await?;
            println!("Feedback updated.");
            print_thread(&thread);
        }
    }
    Ok(())
}
