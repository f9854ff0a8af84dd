use anyhow::{bail, Result};
use chrono::Local;
use std::env;

use startup_directory::{evaluate, DirectoryConfig, EntityCache, FacetIndex, FilterSpec, HttpSource};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let runtime = tokio::runtime::Runtime::new()?;

    match args.get(1).map(String::as_str) {
        None | Some("summary") => runtime.block_on(run_summary()),
        Some("search") => {
            let query = args[2..].join(" ");
            runtime.block_on(run_search(&query))
        }
        Some(other) => bail!("unknown command '{}' (expected: summary | search <text>)", other),
    }
}

fn open_cache() -> Result<EntityCache<HttpSource>> {
    let config = DirectoryConfig::from_env()?;
    let source = HttpSource::new(config.feed_url.clone(), config.timeout)?;
    Ok(EntityCache::new(source, config.schema))
}

async fn run_summary() -> Result<()> {
    println!("📂 Startup Directory - feed summary");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let cache = open_cache()?;
    let summary = cache.load().await?;
    let startups = cache.get_all().await;
    let facets = FacetIndex::build(&startups);

    println!("✓ Schema {}: {} startups loaded", summary.schema_version, summary.accepted);
    println!(
        "  Skipped rows: {} blank, {} short",
        summary.skipped_blank, summary.skipped_short
    );
    println!("\n🗂️  Facets");
    println!("  Tech verticals: {}", facets.tech_verticals.len());
    println!("  Countries:      {}", facets.countries.len());
    println!("  Industries:     {}", facets.industries.len());
    println!("  Sectors:        {}", facets.sectors.len());
    println!("  Investors:      {}", facets.investors.len());
    println!("  Round stages:   {}", facets.round_stages.len());
    println!(
        "  Funding range:  {} - {}",
        facets.funding_amount_range.min, facets.funding_amount_range.max
    );

    Ok(())
}

async fn run_search(query: &str) -> Result<()> {
    let cache = open_cache()?;
    cache.load().await?;
    let startups = cache.get_all().await;

    let spec = FilterSpec::new().with_search(query);
    let matching = evaluate(&startups, &spec, Local::now().date_naive());

    println!("🔎 {} of {} startups match '{}'", matching.len(), startups.len(), query);
    for startup in matching {
        println!("  [{}] {}", startup.id, startup.name);
    }

    Ok(())
}
