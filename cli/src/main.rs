use std::path::PathBuf;
use std::sync::Arc;

use canteen::config::{ClientConfig, normalize_base_url};
use canteen::pages::account::{self, AccountSummary};
use canteen::pages::activity::{self, ActivityFeed};
use canteen::pages::menu::{self, MealType, MenuView};
use canteen::storage::FileStorage;
use canteen::transport::ReqwestTransport;
use canteen::{ApiError, ConfigError, Dispatcher, Navigator, SessionManager, SessionStore, TransportError};
use clap::{Parser, Subcommand};
use time::Date;
use time::macros::format_description;
use tracing_subscriber::EnvFilter;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error("token refresh failed; session cleared")]
    RefreshFailed,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "canteen", about = "School canteen client")]
struct Cli {
    /// Backend origin. Overrides `CANTEEN_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Where the session is kept between runs. Overrides `CANTEEN_SESSION_FILE`.
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CANTEEN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Notify the server and clear the stored session.
    Logout,
    /// Fetch the signed-in profile from the server.
    Whoami,
    /// Subscription, balance and recent meals.
    Dashboard,
    /// Menu for a day (today in UTC by default).
    Menu {
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        #[arg(long)]
        meal_type: Option<MealType>,
    },
    /// Trade the refresh token for a new access token.
    Refresh,
}

/// Stands in for the browser redirect: tell the user to sign in again.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn go_to_login(&self) {
        eprintln!("session ended; run `canteen login --email <email>` to sign in");
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config.base_url = normalize_base_url(base_url)?;
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }
    tracing::debug!(base_url = %config.base_url, session_file = %config.session_file.display(), "starting");

    let session = SessionManager::new(
        SessionStore::new(Arc::new(FileStorage::new(config.session_file))),
        Arc::new(ReqwestTransport::new(config.timeouts)?),
        Arc::new(TerminalNavigator),
        config.base_url,
    );
    let dispatcher = Dispatcher::new(session);

    match cli.command {
        Command::Login { email, password } => run_login(&dispatcher, &email, &password).await,
        Command::Logout => {
            dispatcher.session().logout().await;
            Ok(())
        }
        Command::Whoami => run_whoami(&dispatcher).await,
        Command::Dashboard => run_dashboard(&dispatcher).await,
        Command::Menu { date, meal_type } => run_menu(&dispatcher, date, meal_type).await,
        Command::Refresh => run_refresh(&dispatcher).await,
    }
}

async fn run_login(dispatcher: &Dispatcher, email: &str, password: &str) -> Result<(), CliError> {
    let user = dispatcher.session().login(email, password).await?;
    println!("signed in as {} ({})", user.full_name, user.role);
    if let Some(path) = dispatcher.session().landing_path() {
        println!("home page: {path}");
    }
    Ok(())
}

async fn run_whoami(dispatcher: &Dispatcher) -> Result<(), CliError> {
    ensure_signed_in(dispatcher)?;
    let user = dispatcher.current_user().await?;
    print_json(&serde_json::to_value(user)?)
}

async fn run_dashboard(dispatcher: &Dispatcher) -> Result<(), CliError> {
    ensure_signed_in(dispatcher)?;
    if let Some(name) = dispatcher.session().display_name() {
        println!("{name}");
    }
    let summary = account::load_account_summary(dispatcher).await;
    let feed = activity::load_recent_activity(dispatcher).await;
    print!("{}", summary_text(&summary));
    print!("{}", activity_text(&feed));
    Ok(())
}

async fn run_menu(dispatcher: &Dispatcher, date: Option<Date>, meal_type: Option<MealType>) -> Result<(), CliError> {
    ensure_signed_in(dispatcher)?;
    let date = date.unwrap_or_else(menu::today_utc);
    let view = menu::load_menu(dispatcher, date, meal_type).await;
    print!("{}", menu_text(date, &view));
    Ok(())
}

async fn run_refresh(dispatcher: &Dispatcher) -> Result<(), CliError> {
    match dispatcher.session().refresh_token().await {
        Some(_) => {
            println!("access token refreshed");
            Ok(())
        }
        None => Err(CliError::RefreshFailed),
    }
}

fn ensure_signed_in(dispatcher: &Dispatcher) -> Result<(), CliError> {
    Ok(dispatcher.session().ensure_authenticated()?)
}

fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

// =============================================================================
// TEXT OUTPUT
// =============================================================================

fn summary_text(summary: &AccountSummary) -> String {
    format!(
        "Subscription:    {}\nMeals remaining: {}\nBalance:         {}\n",
        summary.subscription.label(),
        summary.subscription.meals_remaining_text(),
        account::format_balance(summary.balance),
    )
}

fn activity_text(feed: &ActivityFeed) -> String {
    match feed {
        ActivityFeed::Items(entries) => {
            let mut out = String::from("Recent activity:\n");
            for entry in entries {
                out.push_str(&format!(
                    "  {}  {:<9} {}\n",
                    entry.received_at,
                    entry.status_label(),
                    entry.dish_name
                ));
            }
            out
        }
        ActivityFeed::Empty => "Recent activity: none\n".to_owned(),
        ActivityFeed::Unavailable => "Recent activity: unavailable\n".to_owned(),
    }
}

fn menu_text(date: Date, view: &MenuView) -> String {
    let mut out = format!("Menu for {date}: {}\n", view.headline());
    if let MenuView::Items(entries) = view {
        for entry in entries {
            out.push_str(&format!("  {:<28} {:<10} {:>8.2}\n", entry.name, entry.category, entry.price));
        }
    } else if *view == MenuView::Unavailable {
        out.push_str("  menu could not be loaded\n");
    }
    out
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
