//! User account commands

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::AppServices;
use crate::storage::Role;
use crate::utils::password::check_password_strength;

/// 交互读取密码（两次输入需一致）
fn prompt_password() -> Result<String, CliError> {
    let password = rpassword::prompt_password("Password: ")
        .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))?;
    let confirm = rpassword::prompt_password("Confirm password: ")
        .map_err(|e| CliError::CommandError(format!("Failed to read password: {}", e)))?;

    if password != confirm {
        return Err(CliError::CommandError("Passwords do not match".to_string()));
    }
    check_password_strength(&password).map_err(CliError::CommandError)?;
    Ok(password)
}

fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

pub async fn add_user(
    services: &AppServices,
    email: String,
    name: Option<String>,
    password: Option<String>,
    admin: bool,
) -> Result<(), CliError> {
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };
    let name = name.unwrap_or_else(|| default_name(&email));
    let role = if admin { Role::Admin } else { Role::User };

    let user = services
        .users
        .create_user(&name, &email, &password, role)
        .await?;
    println!(
        "{} Created {} {} ({})",
        "✓".bold().green(),
        user.role.to_string().magenta(),
        user.email.cyan(),
        user.name
    );
    Ok(())
}

pub async fn list_users(services: &AppServices) -> Result<(), CliError> {
    let users = services.users.list().await?;

    if users.is_empty() {
        println!("{} No users found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Users:".bold().green());
    for user in &users {
        let role = match user.role {
            Role::Admin => user.role.to_string().magenta().bold(),
            Role::User => user.role.to_string().normal(),
        };
        println!(
            "  {} {} {} {}",
            user.email.cyan(),
            user.name,
            role,
            user.created_at.format("%Y-%m-%d").to_string().dimmed()
        );
    }
    println!();
    println!(
        "{} Total {} users",
        "ℹ".bold().blue(),
        users.len().to_string().green()
    );
    Ok(())
}

pub async fn set_user_role(
    services: &AppServices,
    email: String,
    role: Role,
) -> Result<(), CliError> {
    let user = services.users.set_role(&email, role).await?;
    println!(
        "{} {} is now {}",
        "✓".bold().green(),
        user.email.cyan(),
        user.role.to_string().magenta()
    );
    Ok(())
}

pub async fn remove_user(services: &AppServices, email: String) -> Result<(), CliError> {
    services.users.remove(&email).await?;
    println!("{} Removed {}", "✓".bold().green(), email.cyan());
    Ok(())
}
