//! Information display handlers (data statistics, config)

use crate::advisor::Catalog;
use crate::cli::output::*;
use crate::AppConfig;
use crate::Result;

pub async fn handle_info_command(config: &AppConfig) -> Result<()> {
    print_info("📊 Coverwise data");
    println!();

    let catalog = Catalog::from_config(config)?;
    let states: std::collections::BTreeSet<&str> = catalog
        .plans()
        .iter()
        .map(|p| p.state_code.as_str())
        .collect();

    println!("🏥 Catalog:");
    println!("  Plan variants: {}", catalog.plans().len());
    println!("  Rate rows: {}", catalog.rates().len());
    println!(
        "  Components with covered benefits: {}",
        catalog.benefits().component_count()
    );
    println!("  States: {}", states.into_iter().collect::<Vec<_>>().join(", "));
    println!();

    println!("📚 Regulatory corpus:");
    match crate::data::load_corpus(&config.data) {
        Ok(index) => {
            println!("  Documents: {}", index.len());
            println!("  Embedding dimension: {}", index.dimension());
        }
        Err(e) => print_warning(&format!("Corpus not loaded: {e}")),
    }
    Ok(())
}

pub async fn handle_config_command(config: &AppConfig) -> Result<()> {
    print_config(config);
    Ok(())
}
