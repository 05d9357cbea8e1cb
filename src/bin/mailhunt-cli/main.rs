mod args;
mod config;
mod output;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands};
use mailhunt_lib::{EmailFinder, GenerateRequest, VerifyRequest};
use output::Report;

// exit codes: 0 ok, 2 invalid address/domain, 1 fatal
const EXIT_INVALID: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let options = config::probe_options(&cli)?;
    let finder = EmailFinder::from_system_conf(options).context("initialise DNS resolver")?;

    let (report, invalid) = match &cli.cmd {
        Commands::Generate {
            first,
            last,
            domain,
            company,
        } => {
            let mut request = GenerateRequest::new(first, last, domain);
            request.company = company.clone();
            match finder.generate(&request).await {
                Ok(report) => (Report::Generation(report), false),
                Err(err) if err.is_invalid_input() => {
                    eprintln!("[INVALID] {err}");
                    std::process::exit(EXIT_INVALID);
                }
                Err(err) => return Err(err).context("generate candidates"),
            }
        }
        Commands::Verify { email, deep } => {
            let result = finder.verify(&VerifyRequest::new(email, *deep)).await;
            let invalid = !result.format_valid || !result.domain.valid;
            (Report::Verification(result), invalid)
        }
    };

    output::write_report(&report, &cli)?;

    if invalid {
        std::process::exit(EXIT_INVALID);
    }
    Ok(())
}

fn init_tracing(cli: &Cli) {
    let filter = match cli.log_directive() {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
