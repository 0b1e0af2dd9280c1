// UI layer: one handler per subcommand. Each handler receives the API
// client (and the session store where it needs one) from `main`, talks to
// the user with `dialoguer`, and prints results as pretty JSON.

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

use crate::api::{ApiClient, DeviceSweep};
use crate::session::{Credential, SessionStore};

/// Run `f` behind a spinner with `msg`.
fn with_spinner<T>(msg: &'static str, f: impl FnOnce() -> T) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = f();
    spinner.finish_and_clear();
    Ok(out)
}

fn pretty_print<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", s);
    Ok(())
}

/// Print the "run auth first" hint shown when no session is stored.
pub fn warn_missing_session(location: &str) {
    eprintln!(
        "{}   {} does not exist. Cannot load eero session token.",
        "WARNING:".yellow(),
        location
    );
    eprintln!("{}   Use `eero auth` to generate a new file.\n", "WARNING:".yellow());
}

/// Lowercase and trim the login id the way the server expects it.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Interactive login: request a code, verify it, persist the session.
pub fn authenticate(api: &mut ApiClient, store: &dyn SessionStore) -> Result<Credential> {
    let raw: String = Input::new()
        .with_prompt("Step 1: Enter Eero login ID (phone or email address)")
        .interact_text()?;
    let identifier = normalize_identifier(&raw);

    let attempt = with_spinner("Sending one-time code...", || api.login(&identifier))?
        .context("Could not send OTP")?;

    let code: String = Input::new()
        .with_prompt("Step 2: Enter OTP from Email or SMS")
        .interact_text()?;

    let credential = with_spinner("Verifying...", || api.verify(attempt, code.trim()))?
        .context("Could not verify")?;

    store
        .save(&credential)
        .context("Could not save session")?;

    println!("{}", "Authentication successful.".green());
    Ok(credential)
}

pub fn show_account(api: &ApiClient) -> Result<()> {
    let account = with_spinner("Fetching account...", || api.account())?
        .context("Could not get account data")?;
    pretty_print(&account)
}

pub fn show_networks(api: &ApiClient) -> Result<()> {
    let networks = with_spinner("Fetching networks...", || api.networks())?
        .context("Could not get network data")?;
    pretty_print(&networks)
}

/// Print all devices. With `keep_going` failing networks are reported on
/// stderr and the command still fails afterwards.
pub fn show_devices(api: &ApiClient, keep_going: bool) -> Result<()> {
    if !keep_going {
        let devices = with_spinner("Fetching devices...", || api.devices())?
            .context("Could not get device data")?;
        return pretty_print(&devices);
    }

    let sweep: DeviceSweep = with_spinner("Fetching devices...", || api.devices_per_network())?
        .context("Could not get device data")?;
    pretty_print(&sweep.devices)?;
    for failure in &sweep.failures {
        warn!(url = %failure.network.url, "network failed");
        eprintln!(
            "{} {}: {}",
            "ERROR:".red(),
            failure.network.name.as_deref().unwrap_or(&failure.network.url),
            failure.error
        );
    }
    if !sweep.is_complete() {
        anyhow::bail!("{} network(s) could not be read", sweep.failures.len());
    }
    Ok(())
}

pub fn show_session(credential: &Credential) {
    println!("User token: {}", credential.as_str());
}
