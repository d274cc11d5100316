use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

pub mod checker;
pub mod config;
pub mod display;
pub mod history;
pub mod http_probe;
pub mod menu;
pub mod monitor;

use checker::Checker;
use config::app_config::load_config;
use menu::Console;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("This is a site connectivity checker program");

    let settings = load_config();
    let mut checker = Checker::from_settings(settings)?;
    log::info!(
        "{} previous checks loaded from {}",
        checker.history().len(),
        checker.history().path().display()
    );

    let mut console = Console::new(BufReader::new(tokio::io::stdin()));
    menu::run(&mut checker, &mut console).await?;

    println!("Goodbye!");
    Ok(())
}
