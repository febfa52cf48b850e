//! devsense - Pointing-Input Capability Detection
//!
//! Prints the device classification once, or watches it live in a terminal.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use devsense::app::{AppOptions, Application};
use devsense::environment::profile::PRESET_NAMES;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=devsense=debug for classification traces)
    env_logger::init();

    let matches = Command::new("devsense")
        .version(devsense::VERSION)
        .about("Classify pointing input as mouse-only, touch-only or hybrid")
        .long_about(
            "devsense evaluates the pointer and hover media features of a device profile \
             and prints the resulting classification. With --watch it keeps a reactive \
             session on the terminal and reprints on every resize or orientation change.",
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .short('p')
                .value_name("PRESET|PATH")
                .help(format!(
                    "Device profile: one of [{}] or a TOML file",
                    PRESET_NAMES.join(", ")
                )),
        )
        .arg(
            Arg::new("headless")
                .long("headless")
                .action(ArgAction::SetTrue)
                .help("Classify as a non-interactive context (defaults only)"),
        )
        .arg(
            Arg::new("watch")
                .long("watch")
                .short('w')
                .action(ArgAction::SetTrue)
                .help("Keep watching terminal resizes until Ctrl-C"),
        )
        .arg(
            Arg::new("reactive")
                .long("reactive")
                .action(ArgAction::SetTrue)
                .help("Start the session in reactive mode"),
        )
        .get_matches();

    let options = AppOptions {
        profile: matches.get_one::<String>("profile").cloned(),
        headless: matches.get_flag("headless"),
        watch: matches.get_flag("watch"),
        reactive: matches.get_flag("reactive"),
    };

    log::info!("devsense v{} starting", devsense::VERSION);

    let app = Application::new(options);
    let mut stdout = std::io::stdout();
    app.run(&mut stdout)
        .await
        .context("device detection failed")?;

    Ok(())
}
