use clap::Args;
use seablock_client::services::notifications::NotificationCenter;

use super::Context;
use crate::error::CliError;

#[derive(Args)]
pub struct NotificationArgs {
    /// Mark this notification as read
    #[arg(long)]
    read: Option<String>,
}

pub async fn execute(ctx: &Context, args: NotificationArgs) -> Result<(), CliError> {
    let session = ctx.session()?;
    let mut center = NotificationCenter::new(ctx.clients.backend.clone(), session.user_id);
    center.refresh().await;

    if let Some(id) = args.read {
        center.mark_as_read(&id).await?;
    }

    println!("{} unread", center.unread_count());
    for n in center.notifications() {
        let marker = if n.is_read { " " } else { "*" };
        println!(
            "{} [{}] {} {}",
            marker,
            n.id,
            n.created_at.as_deref().unwrap_or(""),
            n.message
        );
    }
    Ok(())
}
