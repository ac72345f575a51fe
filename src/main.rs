use status_probe::cli::run_cli;

fn main() -> anyhow::Result<()> {
    run_cli()
}
