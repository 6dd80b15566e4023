use clap::{Args, ValueEnum};
use seablock_client::capabilities::Page;
use seablock_client::filter::parse_date;
use seablock_client::services::ledger::{LedgerKind, LedgerProfile, LedgerSource, LedgerView};

use super::Context;
use crate::error::CliError;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Freshness,
    Transaction,
}

impl From<KindArg> for LedgerKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Freshness => LedgerKind::Freshness,
            KindArg::Transaction => LedgerKind::Transaction,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SourceArg {
    All,
    Company,
    Supplier,
}

impl From<SourceArg> for LedgerSource {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::All => LedgerSource::All,
            SourceArg::Company => LedgerSource::Company,
            SourceArg::Supplier => LedgerSource::Supplier,
        }
    }
}

#[derive(Args)]
pub struct LedgerArgs {
    /// Open the distributed database instead of the shared ledger
    #[arg(long)]
    database: bool,
    #[arg(short, long, value_enum, default_value = "freshness")]
    kind: KindArg,
    /// Record source (customer and regulatory views)
    #[arg(long, value_enum)]
    source: Option<SourceArg>,
    #[arg(short, long, default_value = "")]
    search: String,
    /// First day, YYYY-MM-DD (database views)
    #[arg(long)]
    start: Option<String>,
    /// Last day, YYYY-MM-DD (database views)
    #[arg(long)]
    end: Option<String>,
    /// Write the filtered rows to a CSV file in the export directory
    #[arg(long)]
    export: bool,
}

pub async fn execute(ctx: &Context, args: LedgerArgs) -> Result<(), CliError> {
    let page = if args.database {
        Page::DistributedDatabase
    } else {
        Page::SharedLedger
    };
    let session = ctx.open_view(page)?;
    let profile = LedgerProfile::for_page(session.role, page).ok_or_else(|| {
        CliError::Input(format!("{} users have no {:?} view", session.role, page))
    })?;

    let wants_dates = args.start.is_some() || args.end.is_some() || args.export;
    if wants_dates && !profile.is_database() {
        return Err(CliError::Input(
            "Date filters and export are only available on the distributed database".to_string(),
        ));
    }

    let mut view = LedgerView::load(&ctx.clients.backend, profile, &session).await?;
    view.set_kind(args.kind.into());
    if let Some(source) = args.source {
        view.set_source(source.into())?;
    }
    view.set_search(args.search);

    let parse_day = |raw: &str| {
        parse_date(raw).ok_or_else(|| CliError::Input(format!("Invalid date: {}", raw)))
    };
    let start = args.start.as_deref().map(parse_day).transpose()?;
    let end = args.end.as_deref().map(parse_day).transpose()?;
    view.set_dates(start, end);

    let rows = view.filtered();
    let columns: Vec<&str> = rows
        .first()
        .map(|row| row.keys().map(String::as_str).collect())
        .unwrap_or_default();
    ctx.table(&columns, &rows);
    println!("{} {} records", rows.len(), view.kind().as_str());

    if args.export {
        let path = view.export_csv(&ctx.config.client.export_dir)?;
        println!("Exported to {}", path.display());
    }
    Ok(())
}
