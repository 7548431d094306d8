use anyhow::Result;
use clap::Parser;

pub mod cli;
pub mod pipeline;
pub mod watch;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider les options
    cli.validate()?;

    // 4. Charger les variantes + overrides CLI
    let overrides = cli.overrides();
    let configs = pipeline::resolve_variants(&cli.variants, &overrides)?;

    // 5. Construire et exporter
    let written = pipeline::generate(&configs, &cli.out_dir, cli.dump)?;
    log::info!("{} fichier(s) généré(s) dans {}", written.len(), cli.out_dir.display());

    if !cli.watch {
        return Ok(());
    }

    // 6. Mode surveillance : le watcher vit jusqu'à l'arrêt du process
    let _watcher = watch::spawn_variant_watcher(&cli.variants, &cli.out_dir, &overrides)?;
    log::info!("En attente de modifications (Ctrl+C pour quitter)...");
    loop {
        std::thread::park();
    }
}
