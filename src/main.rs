use clap::Parser;
use damtomo_extract::{Damtomo, ExtractError, ScrapeStrategy, Settings};
use log::error;
use std::process::ExitCode;
use std::time::Duration;

/// Print metadata and the HLS stream of a DAM★とも karaoke video or recording
#[derive(Parser, Debug)]
#[command(name = "damtomo", version)]
struct Args {
    /// StreamingDkm.do or StreamingKrk.do URL
    url: String,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Read fields through an HTML tree query instead of pattern matching
    #[arg(long)]
    dom: bool,
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = Damtomo::builder().settings(Settings::load()?);
    if let Some(timeout) = args.timeout {
        builder = builder.timeout(Duration::from_secs(timeout));
    }
    if args.dom {
        builder = builder.scrape_strategy(ScrapeStrategy::Dom);
    }

    let result = builder.build()?.extract(&args.url)?;
    let json = if args.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{json}");

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let expected = e
                .downcast_ref::<ExtractError>()
                .is_some_and(ExtractError::is_expected);
            if !expected {
                error!("Extraction failed: {e:?}");
            }
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}
