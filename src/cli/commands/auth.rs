use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and print a bearer token")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, env = "POS_PASSWORD", hide_env_values = true, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Show the identity behind the current token")]
    Whoami,

    #[command(about = "Register a new business with its admin user")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Business name")]
        business_name: String,
        #[arg(long, env = "POS_PASSWORD", hide_env_values = true, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Contact phone")]
        phone: Option<String>,
        #[arg(long, help = "POS terminal PIN")]
        pin: Option<String>,
    },
}

pub async fn handle(cmd: AuthCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = resolve_password(password)?;
            let body = client
                .post("/auth/login", &json!({ "email": email, "password": password }))
                .await?;
            let data = &body["data"];
            if let OutputFormat::Text = output_format {
                // Bare token on stdout so `export POS_API_TOKEN=$(pos auth login ...)` works.
                println!("{}", data["token"].as_str().unwrap_or_default());
                eprintln!("expires at {}", data["expires_at"].as_str().unwrap_or("-"));
                return Ok(());
            }
            output_success(&output_format, "Logged in", Some(data.clone()))
        }
        AuthCommands::Whoami => {
            let body = client.get("/api/auth/whoami", &[]).await?;
            output_success(&output_format, "Current principal", Some(body["data"].clone()))
        }
        AuthCommands::Register { username, email, business_name, password, phone, pin } => {
            let password = resolve_password(password)?;
            let payload = json!({
                "username": username,
                "email": email,
                "password": password,
                "business_name": business_name,
                "phone": phone,
                "pos_pin": pin,
            });
            let body = client.post("/auth/register", &payload).await?;
            output_success(&output_format, &format!("Registered {}", username), Some(body["data"].clone()))
        }
    }
}

fn resolve_password(provided: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
