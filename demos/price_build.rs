//! Price a build document from the command line.
//!
//! Usage: `cargo run --example price_build -- <build.json> [config.json]`
//!
//! Formats the build, applies any persisted price overrides and prints
//! each bucket with the resolved prices and totals. Set `RUST_LOG=debug`
//! to see which records were dropped.

use buildprice::totals::display_amount;
use buildprice::*;
use std::path::Path;
use std::{env, fs, process};

fn price_label(price: Option<f64>) -> String {
    match price {
        Some(value) => format!("{:.2} div", display_amount(value)),
        None => "?".to_string(),
    }
}

fn print_section<'a>(
    title: &str,
    entries: impl IntoIterator<Item = &'a Entry>,
    overrides: &OverrideMap,
) {
    println!("\n=== {} ===", title);
    for entry in entries {
        println!(
            "  {:<40} {:>12}",
            entry.display_name(),
            price_label(resolve_price(entry, overrides))
        );
    }
}

fn run(build_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => PricingConfig::load(path)?,
        None => PricingConfig::default(),
    };

    let text = fs::read_to_string(build_path)
        .map_err(|e| PricingError::Document(format!("{}: {}", build_path.display(), e)))?;
    let summary = format_build_str(&text)?;

    let store = config.override_store(config.open_storage());
    let session = PricingSession::new(summary, store);
    let summary = session.summary();
    let overrides = session.overrides();

    println!(
        "{} / {}",
        summary.classes.character_class, summary.classes.ascendancy
    );

    print_section("Equipment", &summary.equipment, overrides);
    print_section("Flasks", &summary.flasks, overrides);
    print_section("Jewels", summary.jewels.iter(), overrides);
    for (slot, gems) in summary.gems_by_slot.iter() {
        print_section(&format!("Gems: {}", slot), gems, overrides);
    }

    let totals = session.totals();
    println!("\n=== Totals ===");
    println!("  Equipment: {:.2}", display_amount(totals.equipment));
    println!("  Jewels:    {:.2}", display_amount(totals.jewels));
    println!("  Gems:      {:.2}", display_amount(totals.gems));
    println!("  Flasks:    {:.2}", display_amount(totals.flasks));
    println!("  Total:     {:.2}", display_amount(totals.total));

    let unpriced = session.unpriced();
    if !unpriced.is_empty() {
        println!("\n{} entries without a price", unpriced.len());
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(build_path) = args.first() else {
        eprintln!("usage: price_build <build.json> [config.json]");
        process::exit(2);
    };

    if let Err(err) = run(Path::new(build_path), args.get(1).map(Path::new)) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
