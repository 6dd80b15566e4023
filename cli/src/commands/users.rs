use std::path::PathBuf;

use clap::{Args, Subcommand};
use seablock_client::models::{Record, Role, Row};
use seablock_client::services::users::{LicenseFile, UserDirectory, UserForm};

use super::Context;
use crate::error::CliError;

const USER_COLUMNS: &[&str] = &[
    "id",
    "username",
    "email",
    "wallet_address",
    "phone_no",
    "role",
    "license",
];

#[derive(Args)]
pub struct UserFields {
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    wallet: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    role: Option<String>,
    /// 25-word wallet mnemonic (required when adding)
    #[arg(long)]
    mnemonic: Option<String>,
    /// License document to attach
    #[arg(long)]
    license: Option<PathBuf>,
}

impl UserFields {
    async fn apply(self, form: &mut UserForm) -> Result<(), CliError> {
        if let Some(username) = self.username {
            form.username = username;
        }
        if let Some(email) = self.email {
            form.email = email;
        }
        if let Some(wallet) = self.wallet {
            form.wallet_address = wallet;
        }
        if let Some(phone) = self.phone {
            form.phone_no = phone;
        }
        if let Some(role) = self.role {
            form.role = Some(role.parse::<Role>()?);
        }
        if let Some(mnemonic) = self.mnemonic {
            form.mnemonic = mnemonic;
        }
        if let Some(path) = self.license {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            form.license = Some(LicenseFile {
                file_name,
                contents: tokio::fs::read(&path).await?,
            });
        }
        Ok(())
    }
}

#[derive(Subcommand)]
pub enum UserCommand {
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long)]
        role: Option<String>,
    },
    Add {
        #[command(flatten)]
        fields: UserFields,
    },
    Edit {
        id: String,
        #[command(flatten)]
        fields: UserFields,
    },
    Delete {
        id: String,
    },
}

async fn open(ctx: &Context) -> Result<UserDirectory, CliError> {
    let mut directory = UserDirectory::open(ctx.clients.backend.clone(), ctx.session()?)?;
    directory.refresh().await;
    Ok(directory)
}

pub async fn execute(ctx: &Context, command: UserCommand) -> Result<(), CliError> {
    match command {
        UserCommand::List { search, role } => {
            let mut directory = open(ctx).await?;
            directory.set_search(search);
            directory.set_role_filter(role.map(|r| r.parse::<Role>()).transpose()?);

            let rows: Vec<Row> = directory
                .visible()
                .into_iter()
                .map(|user| {
                    let mut row = user.row();
                    if let Some(url) = directory.license_url(user) {
                        row.insert("license".to_string(), url.into());
                    }
                    row
                })
                .collect();
            ctx.table(USER_COLUMNS, &rows);
        }
        UserCommand::Add { fields } => {
            let mut directory = open(ctx).await?;
            let mut form = UserForm::add();
            fields.apply(&mut form).await?;
            let id = directory.save(form).await?;
            println!("User {} added.", id);
        }
        UserCommand::Edit { id, fields } => {
            let mut directory = open(ctx).await?;
            let user = directory
                .find(&id)
                .ok_or_else(|| CliError::Input(format!("No user {}", id)))?;
            let mut form = UserForm::edit(user);
            fields.apply(&mut form).await?;
            let id = directory.save(form).await?;
            println!("User {} updated.", id);
        }
        UserCommand::Delete { id } => {
            let mut directory = open(ctx).await?;
            if directory.delete(&id, &ctx.prompt()).await? {
                println!("Deleted user {}.", id);
            }
        }
    }
    Ok(())
}
