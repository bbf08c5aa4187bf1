use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use plone_versions::{Outcome, Resolvers, SeriesLatest};

#[derive(Parser)]
#[command(name = "plone-versions")]
#[command(version, about = "Resolve current Plone and Volto releases and their toolchains")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List offered Plone series with their newest releases
    Plone,
    /// List offered Volto series with their newest releases
    Volto,
    /// Show the Python versions supported by a Plone release or series
    Python { version: String },
    /// Show the Node.js and pnpm versions expected by a Volto release
    Node { version: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let resolvers = Resolvers::new();

    match cli.command {
        None => report(&resolvers).await,
        Some(Command::Plone) => print_series("Plone releases", &resolvers.plone.latest().await),
        Some(Command::Volto) => print_series("Volto releases", &resolvers.volto.latest().await),
        Some(Command::Python { version }) => {
            print_list("Python", &resolvers.python.python_versions(&version).await);
        }
        Some(Command::Node { version }) => {
            let (node, pnpm) = tokio::join!(
                resolvers.node.node_versions(&version),
                resolvers.node.pnpm_version(&version)
            );
            print_list("Node.js", &node);
            println!("pnpm: {}{}", pnpm.value(), marker(pnpm.is_fallback()));
        }
    }
    Ok(())
}

/// Full report: offered series for both ecosystems, then the toolchain for
/// the newest release of each.
async fn report(resolvers: &Resolvers) {
    let (plone, volto) = tokio::join!(resolvers.plone.latest(), resolvers.volto.latest());
    print_series("Plone releases", &plone);
    print_series("Volto releases", &volto);

    let plone_pick = plone.value().first().map(|entry| entry.version.clone());
    let volto_pick = volto.value().first().map(|entry| entry.version.clone());
    let (Some(plone_version), Some(volto_version)) = (plone_pick, volto_pick) else {
        return;
    };

    println!("Toolchain for Plone {plone_version} and Volto {volto_version}:");
    let (python, node, pnpm) = tokio::join!(
        resolvers.python.python_versions(&plone_version),
        resolvers.node.node_versions(&volto_version),
        resolvers.node.pnpm_version(&volto_version),
    );
    print_list("  Python", &python);
    print_list("  Node.js", &node);
    println!("  pnpm: {}{}", pnpm.value(), marker(pnpm.is_fallback()));
}

fn print_series(heading: &str, latest: &Outcome<Vec<SeriesLatest>>) {
    println!("{}{}:", heading, marker(latest.is_fallback()));
    for entry in latest.value() {
        println!("  {}: {}", entry.series, entry.version);
    }
}

fn print_list(label: &str, outcome: &Outcome<Vec<String>>) {
    println!("{}", format_list(label, outcome));
}

/// Compatibility lists arrive sorted ascending; the report shows the newest
/// candidate first.
fn format_list(label: &str, outcome: &Outcome<Vec<String>>) -> String {
    let newest_first: Vec<&str> = outcome.value().iter().rev().map(String::as_str).collect();
    format!(
        "{}: {}{}",
        label,
        newest_first.join(", "),
        marker(outcome.is_fallback())
    )
}

fn marker(fallback: bool) -> &'static str {
    if fallback { " (fallback)" } else { "" }
}
