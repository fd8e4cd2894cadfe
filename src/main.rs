use clap::Parser;

use realm_generator::config::RealmConfig;
use realm_generator::export;
use realm_generator::realm::generate_realm;
use realm_generator::synthetic;

#[derive(Parser, Debug)]
#[command(name = "realm_generator")]
#[command(about = "Generate countries, settlements, and trade routes over a terrain cell graph")]
struct Args {
    /// Width of the demo terrain grid in cells
    #[arg(short = 'W', long, default_value = "96")]
    width: usize,

    /// Height of the demo terrain grid in cells
    #[arg(short = 'H', long, default_value = "64")]
    height: usize,

    /// Master seed
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of countries to seed
    #[arg(short, long, default_value = "8")]
    countries: usize,

    /// Minimum settlements per country (capital included)
    #[arg(long, default_value = "2")]
    settlements_min: usize,

    /// Maximum settlements per country (capital included)
    #[arg(long, default_value = "5")]
    settlements_max: usize,

    /// Export the political map to a PNG file
    #[arg(long)]
    export_png: Option<String>,

    /// Export the realm snapshot to a JSON file
    #[arg(long)]
    export_json: Option<String>,

    /// Pixels per map unit in the PNG export
    #[arg(long, default_value = "8")]
    scale: u32,
}

fn main() {
    let args = Args::parse();

    println!(
        "Building demo terrain ({}x{} cells, seed {})",
        args.width, args.height, args.seed
    );
    let graph = synthetic::synthetic_island(args.width, args.height, args.seed);
    println!(
        "  {} cells, {} land",
        graph.len(),
        graph.land_count()
    );

    let config = RealmConfig {
        country_count: args.countries,
        settlements_min: args.settlements_min,
        settlements_max: args.settlements_max,
        ..RealmConfig::default()
    };

    println!("Generating political layer...");
    let realm = generate_realm(&graph, &config, args.seed);

    for (country, sites) in realm.countries.iter().zip(&realm.settlements) {
        println!(
            "  {}: {} cells, {} settlements, capital at {}",
            country.name,
            country.cells.len(),
            sites.len(),
            country.capital
        );
    }

    if let Some(path) = &args.export_png {
        match export::export_political_map(&graph, &realm, path, args.scale as f32) {
            Ok(()) => println!("Wrote {}", path),
            Err(e) => {
                eprintln!("Failed to write {}: {}", path, e);
                std::process::exit(1);
            }
        }
    }

    if let Some(path) = &args.export_json {
        match export::export_realm_json(&realm, path) {
            Ok(()) => println!("Wrote {}", path),
            Err(e) => {
                eprintln!("Failed to write {}: {}", path, e);
                std::process::exit(1);
            }
        }
    }
}
