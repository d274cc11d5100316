use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::checker::{Checker, read_url_file};
use crate::display;
use crate::history::report::per_url_stats;
use crate::monitor::{EmailNotifier, MonitorOptions, monitor_site};

/// The operations offered by the menu, numbered 1 to 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CheckSite,
    CheckSites,
    CheckFile,
    Monitor,
    Report,
    Recent,
    Exit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Command::CheckSite),
            "2" => Some(Command::CheckSites),
            "3" => Some(Command::CheckFile),
            "4" => Some(Command::Monitor),
            "5" => Some(Command::Report),
            "6" => Some(Command::Recent),
            "7" => Some(Command::Exit),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Line-based prompts over any buffered reader; stdin in production.
pub struct Console<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Console<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Print `message` and read one trimmed line. `None` means the input is exhausted.
    pub async fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        print!("{message}");
        io::stdout().flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }
}

fn non_empty(input: String) -> Option<String> {
    if input.is_empty() { None } else { Some(input) }
}

/// Parse a number of seconds, keeping `default` for blank or invalid input.
fn seconds_or(input: &str, default: u64) -> u64 {
    if input.is_empty() {
        return default;
    }
    match input.parse() {
        Ok(seconds) => seconds,
        Err(_) => {
            println!("'{input}' is not a number of seconds, using {default}");
            default
        }
    }
}

fn print_menu() {
    println!();
    println!("===== Site Connectivity Checker =====");
    println!("1. Check a single site");
    println!("2. Check multiple sites");
    println!("3. Check sites from a file");
    println!("4. Monitor a site");
    println!("5. View historical report");
    println!("6. View recent checks");
    println!("7. Exit");
}

/// Show the menu and run commands until the operator exits or input ends.
pub async fn run<R: AsyncBufRead + Unpin>(
    checker: &mut Checker,
    console: &mut Console<R>,
) -> io::Result<()> {
    loop {
        print_menu();
        let Some(choice) = console.prompt("Select an option (1-7): ").await? else {
            return Ok(());
        };

        let flow = match Command::parse(&choice) {
            Some(Command::Exit) => Flow::Quit,
            Some(command) => dispatch(command, checker, console).await?,
            None => {
                println!("Invalid choice '{choice}', please enter a number from 1 to 7");
                Flow::Continue
            }
        };

        if let Flow::Quit = flow {
            return Ok(());
        }
    }
}

async fn dispatch<R: AsyncBufRead + Unpin>(
    command: Command,
    checker: &mut Checker,
    console: &mut Console<R>,
) -> io::Result<Flow> {
    match command {
        Command::CheckSite => {
            let Some(url) = console.prompt("URL to check: ").await? else {
                return Ok(Flow::Quit);
            };
            let Some(search) = console.prompt("Text to search for (blank to skip): ").await? else {
                return Ok(Flow::Quit);
            };
            let default_timeout = checker.settings().timeout_seconds;
            let Some(timeout) = console
                .prompt(&format!("Timeout in seconds [{default_timeout}]: "))
                .await?
            else {
                return Ok(Flow::Quit);
            };

            let timeout = Duration::from_secs(seconds_or(&timeout, default_timeout));
            checker
                .check_site(&url, non_empty(search).as_deref(), Some(timeout))
                .await;
        }
        Command::CheckSites => {
            let Some(urls) = console.prompt("URLs to check (comma separated): ").await? else {
                return Ok(Flow::Quit);
            };
            let Some(search) = console.prompt("Text to search for (blank to skip): ").await? else {
                return Ok(Flow::Quit);
            };

            let urls: Vec<String> = urls
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect();
            if urls.is_empty() {
                println!("No URLs entered");
            } else {
                checker.check_sites(&urls, non_empty(search).as_deref()).await;
            }
        }
        Command::CheckFile => {
            let Some(path) = console.prompt("File with one URL per line: ").await? else {
                return Ok(Flow::Quit);
            };
            let Some(search) = console.prompt("Text to search for (blank to skip): ").await? else {
                return Ok(Flow::Quit);
            };

            match read_url_file(Path::new(&path)) {
                Ok(urls) if urls.is_empty() => println!("{path} contains no URLs"),
                Ok(urls) => {
                    println!("Loaded {} URLs from {}", urls.len(), path);
                    checker.check_sites(&urls, non_empty(search).as_deref()).await;
                }
                Err(e) => println!("❌ Could not read {path}: {e}"),
            }
        }
        Command::Monitor => {
            let monitor_defaults = checker.settings().monitor.clone();
            let Some(url) = console.prompt("URL to monitor: ").await? else {
                return Ok(Flow::Quit);
            };
            let Some(interval) = console
                .prompt(&format!(
                    "Interval in seconds [{}]: ",
                    monitor_defaults.interval_seconds
                ))
                .await?
            else {
                return Ok(Flow::Quit);
            };
            let Some(duration) = console
                .prompt(&format!(
                    "Duration in seconds [{}]: ",
                    monitor_defaults.duration_seconds
                ))
                .await?
            else {
                return Ok(Flow::Quit);
            };
            let Some(recipient) = console.prompt("Alert e-mail (blank for none): ").await? else {
                return Ok(Flow::Quit);
            };

            let options = MonitorOptions {
                interval: Duration::from_secs(seconds_or(
                    &interval,
                    monitor_defaults.interval_seconds,
                )),
                duration: Duration::from_secs(seconds_or(
                    &duration,
                    monitor_defaults.duration_seconds,
                )),
                alert_recipient: non_empty(recipient),
            };
            monitor_site(checker, &url, &options, &EmailNotifier).await;
        }
        Command::Report => {
            display::print_history_report(&per_url_stats(checker.history().records()));
        }
        Command::Recent => {
            let count = checker.settings().recent_count;
            display::print_recent(checker.history().recent(count));
        }
        Command::Exit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}
