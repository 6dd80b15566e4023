// Shared plumbing for the page commands: session, prompts and rendering

pub mod auth;
pub mod catch;
pub mod certificates;
pub mod ledger;
pub mod notifications;
pub mod process;
pub mod recall;
pub mod transactions;
pub mod users;

use std::io::{self, BufRead, Write};

use clap::Args;
use seablock_client::capabilities::Page;
use seablock_client::models::{display_value, Record, Row, SensorReadings};
use seablock_client::services::{Clients, Confirm, RecordPage, SubmissionOutcome};
use seablock_client::{Session, SessionStore};

use crate::config::ShellConfig;
use crate::error::CliError;

/// Everything a command needs: configuration, the session store and the HTTP clients
pub struct Context {
    pub config: ShellConfig,
    pub store: SessionStore,
    pub clients: Clients,
}

impl Context {
    pub fn new(config: ShellConfig) -> Result<Self, CliError> {
        let store = SessionStore::new(config.client.session_file.clone());
        let clients = Clients::new(&config.client)?;
        Ok(Self {
            config,
            store,
            clients,
        })
    }

    /// The stored session; fails when nobody is logged in
    pub fn session(&self) -> Result<Session, CliError> {
        Ok(self.store.require()?)
    }

    /// A record page for the session's role, refused when the role has no access
    pub fn open_page<T: Record>(&self, page: Page) -> Result<RecordPage<T>, CliError> {
        Ok(RecordPage::open(
            self.clients.backend.clone(),
            self.session()?,
            page,
        )?)
    }

    /// `open_page` followed by a fetch and the search term
    pub async fn load_page<T: Record>(
        &self,
        page: Page,
        search: &str,
    ) -> Result<RecordPage<T>, CliError> {
        let mut records = self.open_page(page)?;
        records.refresh().await;
        records.set_search(search);
        Ok(records)
    }

    /// Session check for pages without a record table
    pub fn open_view(&self, page: Page) -> Result<Session, CliError> {
        let session = self.session()?;
        if !page.is_open_to(session.role) {
            return Err(CliError::Input(format!(
                "{} users cannot open {:?}",
                session.role, page
            )));
        }
        Ok(session)
    }

    pub fn prompt(&self) -> Prompt {
        Prompt {
            assume_yes: self.config.assume_yes,
        }
    }

    pub fn table(&self, columns: &[&str], rows: &[Row]) {
        print!("{}", render_table(columns, rows, self.config.max_column_width));
    }

    /// The page's visible columns for the records matching its search
    pub fn print_records<T: Record>(&self, page: &RecordPage<T>) {
        let rows: Vec<Row> = page.visible().into_iter().map(|r| r.row()).collect();
        self.table(page.capabilities().visible_columns, &rows);
    }
}

/// y/N confirmation on the terminal
pub struct Prompt {
    assume_yes: bool,
}

impl Confirm for Prompt {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Reads one line from stdin after printing `label`
pub fn read_line(label: &str) -> Result<String, CliError> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

/// Reads a password from the terminal with echo turned off
pub fn read_secret(label: &str) -> Result<String, CliError> {
    Ok(rpassword::prompt_password(label)?)
}

/// Prints a submission result. A completed chain write gets the balance banner.
pub fn print_outcome(outcome: &SubmissionOutcome) {
    match outcome {
        SubmissionOutcome::Completed { .. } => {
            let title = format!("*** {} ***", outcome.title());
            let rule = "*".repeat(title.len());
            println!("{}\n{}\n{}", rule, title, rule);
            println!("{}", outcome.message());
        }
        SubmissionOutcome::SavedWithoutBalance { record_id, .. } => {
            println!("{}: {} was saved.", outcome.title(), record_id);
            println!("{}", outcome.message());
        }
        _ => println!("{}: {}", outcome.title(), outcome.message()),
    }
}

/// Fixed-width text table. Cells longer than `max_width` are cut with `...`.
pub fn render_table(columns: &[&str], rows: &[Row], max_width: usize) -> String {
    if rows.is_empty() {
        return "No records found.\n".to_string();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| clip(&row.get(*c).map(display_value).unwrap_or_default(), max_width))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(columns.to_vec()));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&line(rule.iter().map(String::as_str).collect()));
    out.push('\n');
    for row in &cells {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

fn clip(value: &str, max_width: usize) -> String {
    if value.chars().count() <= max_width {
        return value.to_string();
    }
    let kept: String = value.chars().take(max_width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Sensor readings as command options. Creating needs all six; editing
/// overrides only the ones given.
#[derive(Args, Debug, Clone, Default)]
pub struct ReadingArgs {
    /// Dissolved oxygen, mg/L (0-20)
    #[arg(long)]
    pub oxygen: Option<f64>,
    /// Temperature, °C (-20-30)
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: Option<f64>,
    /// pH level (5-10)
    #[arg(long)]
    pub ph: Option<f64>,
    /// Ammonia, mg/L (0-10)
    #[arg(long)]
    pub ammonia: Option<f64>,
    /// Heavy metals, mg/kg (0-10)
    #[arg(long)]
    pub metals: Option<f64>,
    /// Bacteria, CFU/g (0-100)
    #[arg(long)]
    pub bacteria: Option<f64>,
}

impl ReadingArgs {
    /// Applies the given values over `base`; without a base every value is required
    pub fn resolve(&self, base: Option<SensorReadings>) -> Result<SensorReadings, CliError> {
        let pick = |given: Option<f64>, existing: Option<f64>| {
            given.or(existing).ok_or_else(|| {
                CliError::Input("Please fill in all required fields".to_string())
            })
        };
        Ok(SensorReadings {
            dissolved_oxygen: pick(self.oxygen, base.map(|b| b.dissolved_oxygen))?,
            temperature: pick(self.temperature, base.map(|b| b.temperature))?,
            ph_level: pick(self.ph, base.map(|b| b.ph_level))?,
            ammonia: pick(self.ammonia, base.map(|b| b.ammonia))?,
            metals: pick(self.metals, base.map(|b| b.metals))?,
            bacteria: pick(self.bacteria, base.map(|b| b.bacteria))?,
        })
    }
}
