//! Chainproof - command-line front end for the supply-chain registry.
//!
//! Every command goes through one `SessionClient`; the command only picks
//! which client operation to run and prints the result as JSON.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chainproof_core::auth::{KeyringAuthenticatorFactory, Session};
use chainproof_core::models::{ProductRegistration, ProductSearchQuery, UserRegistration, UserRole};
use chainproof_core::{Config, NetworkConfig, SessionClient};

/// Overrides `identity_pem` from the config file
const ENV_IDENTITY_PEM: &str = "CHAINPROOF_IDENTITY_PEM";

const USAGE: &str = "\
Usage: chainproof <command> [args]

Commands:
  login                          Sign in with the configured identity
  logout                         Sign out and forget the identity
  status                         Session state, canister status and analytics
  whoami                         Print the current principal
  ping                           Test the canister connection
  user                           Show the registered user
  register-user <email> <first> <last> <company> <role>
  register-product <file.json>   Register a product from a JSON file
  product <id>                   Show a product with its supply-chain history
  products [--mine]              List all products, or only yours
  search <name>                  Search products by name
  analytics                      Show registry analytics
  balance                        Show ICP balance (simulated)
  transfer <to> <amount>         Transfer ICP (simulated)";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .with_context(|| format!("Missing argument <{}>\n\n{}", name, USAGE))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1).cloned() else {
        eprintln!("{}", USAGE);
        return Ok(());
    };
    if command == "--help" || command == "-h" || command == "help" {
        println!("{}", USAGE);
        return Ok(());
    }

    let network = NetworkConfig::from_env()?;
    network.log_summary();

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    let pem_path = std::env::var(ENV_IDENTITY_PEM)
        .ok()
        .map(PathBuf::from)
        .or_else(|| config.identity_pem.clone());
    let cache_dir = config
        .cache_dir(network.mode)
        .unwrap_or_else(|_| PathBuf::from("./cache"));

    let factory = Arc::new(KeyringAuthenticatorFactory {
        cache_dir: cache_dir.clone(),
        pem_path,
        account: network.mode.to_string(),
    });
    let client = SessionClient::builder(network, factory).build()?;

    run(&client, &mut config, cache_dir, &command, &args[2..]).await
}

/// Print who the stored session belongs to and how long it has left
fn print_session_record(cache_dir: PathBuf) {
    let mut session = Session::new(cache_dir);
    match session.load() {
        Ok(true) => {
            let hours = session.data.as_ref().map(|d| d.hours_until_expiry()).unwrap_or(0);
            println!(
                "Principal: {} (expires in {}h)",
                session.principal().unwrap_or("unknown"),
                hours
            );
        }
        Ok(false) => println!("Principal: none"),
        Err(e) => warn!(error = %e, "Failed to read session record"),
    }
}

async fn run(
    client: &SessionClient,
    config: &mut Config,
    cache_dir: PathBuf,
    command: &str,
    args: &[String],
) -> Result<()> {
    match command {
        "login" => {
            client.initialize().await?;
            if !client.login().await {
                bail!("Login failed - run with RUST_LOG=info for details");
            }
            let principal = client.principal().await.map(|p| p.to_text());
            config.last_principal = principal.clone();
            if let Err(e) = config.save() {
                warn!(error = %e, "Failed to save config");
            }
            info!(?principal, "Signed in");
            println!("Signed in as {}", principal.unwrap_or_else(|| "unknown".to_string()));
        }
        "logout" => {
            client.initialize().await?;
            client.logout().await;
            println!("Signed out");
        }
        "status" => {
            client.initialize().await?;
            let state = client.state().await;
            println!("Session: {}", state);
            println!("Network: {} ({})", client.network().mode, client.network().host);
            print_session_record(cache_dir);
            let (status, analytics) = futures::future::join(
                client.get_canister_status(),
                client.get_analytics(),
            )
            .await;
            match status {
                Ok(status) => print_json(&status)?,
                Err(e) => eprintln!("Canister status unavailable: {}", e),
            }
            match analytics {
                Ok(analytics) => {
                    eprintln!("Delivery rate: {:.0}%", analytics.delivery_rate() * 100.0);
                    print_json(&analytics)?;
                }
                Err(e) => eprintln!("Analytics unavailable: {}", e),
            }
        }
        "whoami" => match client.principal().await {
            Some(principal) => println!("{}", principal),
            None => match &config.last_principal {
                Some(last) => println!("Not signed in (last signed in as {})", last),
                None => println!("Not signed in"),
            },
        },
        "ping" => {
            client.initialize().await?;
            if client.test_connection().await {
                println!("Canister reachable");
            } else {
                bail!("Canister connection test failed");
            }
        }
        "user" => {
            client.initialize().await?;
            let user = client.get_user().await?;
            eprintln!("{} - {}, member since {}", user.full_name(), user.role, user.member_since());
            print_json(&user)?;
        }
        "register-user" => {
            let role_name = arg(args, 4, "role")?;
            let role = UserRole::parse(role_name)
                .with_context(|| format!("Unknown role: {}", role_name))?;
            let registration = UserRegistration {
                email: arg(args, 0, "email")?.to_string(),
                first_name: arg(args, 1, "first")?.to_string(),
                last_name: arg(args, 2, "last")?.to_string(),
                company: arg(args, 3, "company")?.to_string(),
                role,
            };
            client.initialize().await?;
            print_json(&client.register_user(&registration).await?)?;
        }
        "register-product" => {
            let path = arg(args, 0, "file.json")?;
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path))?;
            let registration: ProductRegistration = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse product registration {}", path))?;
            client.initialize().await?;
            let id = client.register_product(&registration).await?;
            println!("{}", id);
        }
        "product" => {
            let id = arg(args, 0, "id")?;
            client.initialize().await?;
            let history = client.get_product(id).await?;
            let product = &history.product;
            eprintln!(
                "{} [{}] produced {}, sustainability {}",
                product.name,
                product.current_status,
                product.produced_on(),
                product.sustainability_display()
            );
            if let Some(event) = history.latest_event() {
                eprintln!("Latest: {} at {} ({})", event.stage, event.location, event.status);
            }
            print_json(&history)?;
        }
        "products" => {
            client.initialize().await?;
            let products = if args.iter().any(|a| a == "--mine") {
                client.get_user_products().await?
            } else {
                client.get_all_products().await?
            };
            print_json(&products)?;
        }
        "search" => {
            let name = arg(args, 0, "name")?;
            client.initialize().await?;
            print_json(&client.search_products(&ProductSearchQuery::by_name(name)).await?)?;
        }
        "analytics" => {
            client.initialize().await?;
            print_json(&client.get_analytics().await?)?;
        }
        "balance" => {
            println!("{:.2} ICP (simulated)", client.icp_balance().await);
        }
        "transfer" => {
            let to = arg(args, 0, "to")?;
            let amount: f64 = arg(args, 1, "amount")?
                .parse()
                .context("Amount must be a number")?;
            if client.transfer_icp(to, amount).await {
                println!("Transferred {} ICP to {} (simulated)", amount, to);
            } else {
                bail!("Transfer failed");
            }
        }
        other => bail!("Unknown command: {}\n\n{}", other, USAGE),
    }
    Ok(())
}
