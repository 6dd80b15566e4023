use std::path::PathBuf;

use clap::Subcommand;
use seablock_client::services::certificates::{certificate_register, CertificateCenter};

use super::Context;
use crate::error::CliError;

#[derive(Subcommand)]
pub enum CertificateCommand {
    /// Companies: upload a trade certificate (.pdf, .jpg or .png)
    Upload { path: PathBuf },
    /// Companies: show the certificate on file
    Show,
    /// Regulators: list every company's certificate
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
}

pub async fn execute(ctx: &Context, command: CertificateCommand) -> Result<(), CliError> {
    match command {
        CertificateCommand::Upload { path } => {
            let session = ctx.session()?;
            let center = CertificateCenter::new(&ctx.clients.backend, &session)?;
            center.upload_file(&path).await?;
            println!("Certificate uploaded.");
        }
        CertificateCommand::Show => {
            let session = ctx.session()?;
            let center = CertificateCenter::new(&ctx.clients.backend, &session)?;
            match center.current_license().await? {
                Some(link) => {
                    let kind = if link.is_image { "image" } else { "document" };
                    println!("{} ({}): {}", link.file_name, kind, link.url);
                }
                None => println!("No certificate uploaded yet."),
            }
        }
        CertificateCommand::List { search } => {
            let mut register = certificate_register(ctx.clients.backend.clone(), ctx.session()?)?;
            register.refresh().await;
            register.set_search(search);
            ctx.print_records(&register);
        }
    }
    Ok(())
}
