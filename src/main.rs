use clap::{Parser, Subcommand};
use manifold::catalog::load;
use manifold::{diagnostics, graph};
use serde::Serialize;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "manifold")]
#[command(about = "Pattern-driven relationship synthesis for resource catalogs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every manifold against the catalog and print the resulting graph.
    Synthesize {
        #[arg(long)]
        registry: String,

        #[arg(long)]
        catalog: String,

        #[arg(short = 'o', long)]
        out: Option<String>,
    },
    /// Finalize the catalog and fail if the resulting graph contains a cycle.
    Check {
        #[arg(long)]
        registry: String,

        #[arg(long)]
        catalog: String,
    },
}

#[derive(Serialize)]
struct Output<'a> {
    edges: &'a manifold::EdgeSet,
    report: &'a manifold::FinalizeReport,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("manifold=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Synthesize {
            registry,
            catalog,
            out,
        } => {
            // 1) Load inputs (validates every manifold declaration).
            let registry = load::load_registry(&registry)?;
            let load::LoadedCatalog {
                mut catalog,
                manifolds,
            } = load::load_catalog(&catalog, &registry)?;

            // 2) Finalize.
            let report = manifold::finalize(&mut catalog, &manifolds, &registry)?;

            // 3) Emit.
            let json = serde_json::to_string_pretty(&Output {
                edges: catalog.edges(),
                report: &report,
            })?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Wrote {}", path);
                }
                None => println!("{}", json),
            }
        }
        Commands::Check { registry, catalog } => {
            let registry = load::load_registry(&registry)?;
            let load::LoadedCatalog {
                mut catalog,
                manifolds,
            } = load::load_catalog(&catalog, &registry)?;
            let report = manifold::finalize(&mut catalog, &manifolds, &registry)?;

            if let Some(cycle) = graph::find_cycle(catalog.edges()) {
                let path: Vec<String> = cycle.iter().map(|r| r.to_string()).collect();
                anyhow::bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "dependency cycle: {}",
                        path.join(" -> ")
                    ))
                );
            }
            println!(
                "OK: {} manifolds, {} synthesized edges, {} refreshed",
                manifolds.len(),
                report.edge_count(),
                report.refreshed.len()
            );
        }
    }

    Ok(())
}
