use clap::Parser;
use kubestat::{
    Cli, Config, Loader, Renderer, ResourceSet, Result, SnapshotDump, Source, init_logger,
};
use log::{debug, error, info};
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logger(cli.verbose, cli.quiet, cli.log_file) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::from_cli(cli)?;
    let loader = Loader::new(config.kubectl.as_str());

    info!("Starting kubestat");
    let mut current = load_set(&loader, &config.inputs)?;

    if !config.references.is_empty() {
        let reference = load_set(&loader, &config.references)?;
        current.compare(&reference);
    }

    let result = current.filter(&config.filter);
    debug!(
        "Rendering {} containers as {:?}",
        result.containers.len(),
        config.output
    );

    let renderer = Renderer::new(config.render.clone());
    let text = renderer.render(&result, config.output);
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;

    if let Some(path) = &config.dump {
        SnapshotDump::new(&result, &config.inputs, &config.references).write_to(path)?;
    }

    Ok(())
}

/// Load and merge several sources into one indexed set
fn load_set(loader: &Loader, sources: &[Source]) -> Result<ResourceSet> {
    let documents = sources
        .iter()
        .map(|source| loader.load(source))
        .collect::<Result<Vec<_>>>()?;
    ResourceSet::load(&documents)
}
