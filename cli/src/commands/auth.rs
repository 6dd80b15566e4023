use seablock_client::routes::Route;
use seablock_client::services::auth::{self, LoginFlow};
use tracing::debug;

use super::{read_line, read_secret, Context};
use crate::error::CliError;

/// Execute the login command
pub async fn login(
    ctx: &Context,
    role: &str,
    username: Option<String>,
    password: Option<String>,
) -> Result<(), CliError> {
    let mut flow = LoginFlow::new(ctx.clients.backend.clone(), ctx.store.clone());
    let role = flow.select_role(role)?;

    let (username, password) = if flow.needs_credentials() {
        let username = match username {
            Some(u) => u,
            None => read_line("Username: ")?,
        };
        let password = match password {
            Some(p) => p,
            None => read_secret("Password (hidden): ")?,
        };
        (username, password)
    } else {
        (String::new(), String::new())
    };

    let route = flow.submit(&username, &password).await?;
    debug!("Login landed on {}", route.path());
    println!("Logged in as {}. Home: {}", role, route.path());
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<(), CliError> {
    let route = auth::logout(&ctx.store)?;
    debug!("Logout landed on {}", route.path());
    println!("Logged out.");
    Ok(())
}

/// Prints who is logged in and where they can go
pub fn whoami(ctx: &Context) -> Result<(), CliError> {
    let Some(session) = ctx.store.load()? else {
        println!("Not logged in. Home: {}", Route::Login.path());
        return Ok(());
    };

    println!("Role:     {}", session.role);
    if let Some(username) = &session.username {
        println!("User:     {}", username);
    }
    if let Some(id) = &session.user_id {
        println!("Id:       {}", id);
    }
    if let Some(wallet) = &session.wallet_address {
        println!("Wallet:   {}", wallet);
    }
    println!("Home:     {}", session.role.home_route().path());
    println!("Pages:");
    for page in session.role.navigation() {
        let route = Route::Page {
            role: session.role,
            page: *page,
        };
        println!("  {:<20} {}", format!("{:?}", page), route.path());
    }
    Ok(())
}
