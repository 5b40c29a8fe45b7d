//! Status command implementation

use colored::Colorize;

use crate::config::{self, Config};
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run() -> Result<()> {
    let config = Config::from_env();
    println!("{}\n", "reqgate Configuration Status".bold());
    print!("{}", report(&config));
    Ok(())
}

fn report(config: &Config) -> String {
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    match config.restlet_url.as_deref() {
        Some(url) => line(format!("{} Restlet URL: {}", "✓".green(), url.cyan())),
        None => {
            line(format!("{} Restlet URL not set", "✗".red()));
            line(format!("  → Set {}", config::RESTLET_URL));
        }
    }

    let missing = config.missing_credentials();
    for name in [
        config::ACCOUNT_ID,
        config::CONSUMER_KEY,
        config::CONSUMER_SECRET,
        config::TOKEN_ID,
        config::TOKEN_SECRET,
    ] {
        if missing.contains(&name) {
            line(format!("{} {} not set", "✗".red(), name));
        } else {
            line(format!("{} {} set", "✓".green(), name));
        }
    }

    match (&config.realm, &config.account_id) {
        (Some(realm), _) => line(format!("{} Realm: {}", "○".dimmed(), realm)),
        (None, Some(account)) => line(format!(
            "{} Realm: {} (from account id)",
            "○".dimmed(),
            account
        )),
        (None, None) => {}
    }
    line(format!("{} Server port: {}", "○".dimmed(), config.port));
    line(String::new());

    match config.credential() {
        Ok(_) => line(format!("{} Ready", "✓".green())),
        Err(e) => line(format!("{} Not configured: {}", "✗".red(), e)),
    }

    out
}
