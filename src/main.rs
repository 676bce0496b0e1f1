//! Elevate - personal productivity and habit tracking with an AI coach
//!
//! Main entry point for the Elevate application.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use elevate::app::App;
use elevate::cli::{Cli, Commands};
use elevate::config::Config;
use elevate::day_cycle;
use elevate::providers;
use elevate::store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse_args();

    // Mirror a CLI store override into ELEVATE_STORE so Store::open_default
    // picks it up without threading the path through every caller.
    if let Some(store_path) = &cli.store {
        std::env::set_var("ELEVATE_STORE", store_path);
        tracing::info!("Using store override from CLI: {}", store_path);
    }

    let config = Config::load(&cli.config)?;
    config.validate()?;

    match cli.command {
        Commands::Session => {
            tracing::info!("Starting interactive session");
            let app = build_app(&config)?;
            elevate::session::run(app).await?;
        }
        Commands::Status => {
            let app = build_app(&config)?;
            print_status(&app);
        }
        Commands::History => {
            let app = build_app(&config)?;
            if app.history().is_empty() {
                println!("No history available yet.");
            }
            for log in app.history() {
                println!(
                    "{}  {:>3}%  {} goals tracked",
                    log.date,
                    log.completion_rate,
                    log.tasks.len()
                );
            }
        }
        Commands::Reset { yes } => {
            if !yes && !confirm("Clear all persisted state?") {
                println!("Aborted.");
                return Ok(());
            }
            let store = Store::open_default()?;
            store.clear()?;
            println!("All state cleared.");
        }
    }

    Ok(())
}

/// Wire the store and collaborators into the application controller
fn build_app(config: &Config) -> Result<App> {
    let store = Store::open_default()?;
    let coach = providers::create_coach(config)?;
    let voice = providers::create_voice(config)?;
    Ok(App::new(store, coach, voice))
}

fn print_status(app: &App) {
    match app.user() {
        Some(user) => println!("Logged in as {}", user.name),
        None => {
            println!("Not logged in. Run `elevate session` to get started.");
            return;
        }
    }
    if app.tasks().is_empty() {
        println!("No tasks yet.");
        return;
    }
    for task in app.tasks() {
        println!("- {}: {}/{} {}", task.title, task.completed, task.goal, task.unit);
    }
    println!(
        "Today so far: {}%",
        day_cycle::completion_rate(app.tasks())
    );
}

fn confirm(prompt: &str) -> bool {
    use std::io::Write;
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush().ok();
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("elevate=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
