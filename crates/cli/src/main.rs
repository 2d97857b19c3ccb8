use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use dialoguer::{theme::ColorfulTheme, Password};
use forms_client::{ApiClient, ListUsersQuery, Session};
use forms_protocol::{Role, UserProfile};
use std::time::Duration;

use crate::config::Config;
use crate::session_file::StoredSession;

mod backend;
mod config;
mod session_file;
mod wizard;

#[derive(Parser)]
#[command(name = "forms")]
#[command(about = "Terminal client for security maturity assessments", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login(LoginArgs),

    /// Drop the stored session
    Logout,

    /// Show the signed-in profile
    Me,

    /// List available frameworks
    Frameworks,

    /// List a customer's submissions
    Submissions(SubmissionsArgs),

    /// Fill a questionnaire interactively
    Form(FormArgs),

    /// List platform users (managers only)
    Users(UsersArgs),
}

#[derive(Args)]
struct LoginArgs {
    /// Account email
    email: String,
}

#[derive(Args)]
struct SubmissionsArgs {
    /// Customer id (defaults to the signed-in customer)
    #[arg(long)]
    customer: Option<i64>,
}

#[derive(Args)]
struct FormArgs {
    /// Template slug, e.g. "csf-2"
    template: String,

    /// Act for a specific customer id
    #[arg(long)]
    client: Option<i64>,
}

#[derive(Args)]
struct UsersArgs {
    /// Show a single user by id
    #[arg(long)]
    id: Option<i64>,

    /// Filter by name or email
    #[arg(long)]
    search: Option<String>,

    /// Include deactivated accounts
    #[arg(long)]
    inactive: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let api = ApiClient::new(&config.api_url(cli.api_url.as_deref()))?;

    match cli.command {
        Commands::Login(args) => login(&api, &args.email).await,
        Commands::Logout => logout(&api),
        Commands::Me => {
            let profile = authed(&api, &config).await?;
            print_profile(&profile);
            Ok(())
        }
        Commands::Frameworks => frameworks(&api, &config).await,
        Commands::Submissions(args) => submissions(&api, &config, args).await,
        Commands::Form(args) => form(api, &config, args).await,
        Commands::Users(args) => users(&api, &config, args).await,
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn login(api: &ApiClient, email: &str) -> Result<()> {
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .interact()?;
    let profile = api.login(email, &password).await.context("sign-in failed")?;

    let pair = api.tokens().get().context("backend returned no tokens")?;
    session_file::save(&session_file::default_path()?, &StoredSession::new(pair))?;

    let display = if profile.name.is_empty() { &profile.email } else { &profile.name };
    println!("Signed in as {} ({})", style(display).bold(), profile.role);
    Ok(())
}

fn logout(api: &ApiClient) -> Result<()> {
    api.logout();
    session_file::delete(&session_file::default_path()?)?;
    println!("Signed out.");
    Ok(())
}

/// Restore the stored session, enforcing the idle timeout, and verify it
/// against the backend. Saves the (possibly refreshed) tokens back.
async fn authed(api: &ApiClient, config: &Config) -> Result<UserProfile> {
    let path = session_file::default_path()?;
    let Some(mut stored) = session_file::load(&path)? else {
        bail!("not signed in; run `forms login <email>`");
    };
    if stored.idle_expired(config.idle_timeout_secs) {
        session_file::delete(&path)?;
        bail!("session expired after inactivity; sign in again");
    }

    api.tokens().set(stored.tokens.clone());
    let profile = api
        .me()
        .await
        .context("stored session rejected; sign in again")?;
    log::debug!("restored session for {}", profile.email);

    if let Some(pair) = api.tokens().get() {
        stored.tokens = pair;
    }
    stored.touch();
    session_file::save(&path, &stored)?;
    Ok(profile)
}

fn print_profile(profile: &UserProfile) {
    println!("{:<12} {}", "id", profile.id);
    println!("{:<12} {}", "email", profile.email);
    println!("{:<12} {}", "name", profile.name);
    println!("{:<12} {}", "role", profile.role);
    if let Some(client) = profile.client {
        println!("{:<12} {client}", "customer");
    }
    if !profile.permissions.is_empty() {
        println!("{:<12} {}", "permissions", profile.permissions.join(", "));
    }
}

async fn frameworks(api: &ApiClient, config: &Config) -> Result<()> {
    authed(api, config).await?;
    let listed = api.list_frameworks().await?;
    if listed.is_empty() {
        println!("No frameworks available.");
        return Ok(());
    }
    for framework in listed {
        let marker = if framework.active {
            style("●").green()
        } else {
            style("○").dim()
        };
        println!(
            "{marker} {} {}  ({})",
            style(&framework.name).bold(),
            framework.version,
            framework.slug
        );
    }
    Ok(())
}

async fn submissions(api: &ApiClient, config: &Config, args: SubmissionsArgs) -> Result<()> {
    let profile = authed(api, config).await?;
    let customer = args.customer.unwrap_or_else(|| profile.acting_client_id());

    let items = api.list_submissions(customer).await?;
    if items.is_empty() {
        println!("No submissions for customer {customer}.");
        return Ok(());
    }
    for item in items {
        println!(
            "#{:<5} {:<32} {:<10} {:>3.0}%  {}",
            item.id,
            item.template.name,
            item.status.as_str(),
            item.progress.as_f64(),
            item.updated_at
        );
    }
    Ok(())
}

async fn form(api: ApiClient, config: &Config, args: FormArgs) -> Result<()> {
    let profile = authed(&api, config).await?;
    let client_id = args.client.unwrap_or_else(|| profile.acting_client_id());

    let mut session = Session::new(Duration::from_secs(config.idle_timeout_secs));
    session.complete_login(profile);
    wizard::run(api, &mut session, client_id, &args.template).await?;

    // Keep the on-disk idle clock in step with the interactive session.
    let path = session_file::default_path()?;
    if let Some(mut stored) = session_file::load(&path)? {
        if session.is_expired() {
            session_file::delete(&path)?;
        } else {
            stored.touch();
            session_file::save(&path, &stored)?;
        }
    }
    Ok(())
}

async fn users(api: &ApiClient, config: &Config, args: UsersArgs) -> Result<()> {
    let profile = authed(api, config).await?;
    if profile.role != Role::Manager {
        bail!("user management requires a manager account");
    }

    if let Some(id) = args.id {
        let user = api.get_user(id).await?;
        println!("{:<12} {}", "id", user.id);
        println!("{:<12} {}", "name", user.name);
        println!("{:<12} {}", "email", user.email);
        println!("{:<12} {}", "role", user.role());
        println!("{:<12} {}", "active", user.is_active);
        if let Some(companies) = user.companies {
            println!("{:<12} {companies}", "companies");
        }
        return Ok(());
    }

    let query = ListUsersQuery {
        search: args.search,
        is_active: if args.inactive { None } else { Some(true) },
        ..ListUsersQuery::default()
    };
    let listed = api.list_users(&query).await?;
    if listed.is_empty() {
        println!("No matching users.");
        return Ok(());
    }
    for user in listed {
        let marker = if user.is_active {
            style("●").green()
        } else {
            style("○").red()
        };
        println!(
            "{marker} #{:<5} {:<24} {:<30} {:<10} {}",
            user.id,
            user.name,
            user.email,
            user.role(),
            user.companies.unwrap_or_default()
        );
    }
    Ok(())
}
