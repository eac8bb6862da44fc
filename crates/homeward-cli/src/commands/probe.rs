//! `homeward probe` command implementation
//!
//! Single unretried request to page 1 of the animal listing: answers "is the
//! source up, and how much work is waiting" without starting a run.

use crate::error::Result;
use colored::Colorize;
use homeward_etl::config::DEFAULT_TIMEOUT_SECS;
use homeward_etl::AnimalApiClient;
use std::time::Duration;

/// Probe the source API
pub async fn run(base_url: String) -> Result<()> {
    let client = AnimalApiClient::new(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))?;

    println!("{} Probing {}...", "→".cyan(), client.base_url());

    let page = client.get_page(1).await?;

    println!("{} Source reachable", "✓".green());
    println!("  pages:   {}", page.total_pages);
    match page.total_items {
        Some(total) => println!("  records: {}", total),
        None => println!("  records: not reported"),
    }
    println!("  page 1:  {} record(s)", page.items.len());

    Ok(())
}
