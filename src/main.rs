use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use risk_committee_pdf::{DEFAULT_BASE_NAME, Error, FormInput, LayoutConfig, export_report, layout_report, validate};

#[derive(Parser)]
#[command(name = "risk-report")]
#[command(version)]
#[command(about = "Compile a risk-committee evaluation form into a PDF report", long_about = None)]
struct Cli {
    /// Form answers as a flat JSON object (field name -> text)
    #[arg(long, value_name = "FILE")]
    form: PathBuf,

    /// Logo drawn in the page header (PNG or JPEG)
    #[arg(long, value_name = "FILE")]
    logo: Option<PathBuf>,

    /// Layout configuration (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Prefix of the generated file name
    #[arg(long, default_value = DEFAULT_BASE_NAME)]
    base_name: String,

    /// Directory the PDF is written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Print the paginated text instead of writing a PDF
    #[arg(long)]
    dump: bool,
}

fn run(cli: &Cli) -> Result<(), Error> {
    let form = FormInput::load(&cli.form)?;
    let config = match &cli.config {
        Some(path) => LayoutConfig::load(path)?,
        None => LayoutConfig::default(),
    };
    let logo = cli.logo.as_ref().and_then(|path| match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("logo skipped: {}: {e}", path.display());
            None
        }
    });

    if cli.dump {
        let data = validate(&form)?;
        let list = layout_report(&data, logo.as_deref(), &config, chrono::Local::now().naive_local())?;
        for (i, texts) in list.page_texts().iter().enumerate() {
            println!("--- page {} ---", i + 1);
            for text in texts {
                println!("{text}");
            }
        }
        return Ok(());
    }

    let path = export_report(&form, logo.as_deref(), &config, &cli.out_dir, &cli.base_name)?;
    println!("{}", path.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
