use clap::Parser;
use invoice_forge::models::amount::format_money;
use invoice_forge::service::{sample, summary};
use invoice_forge::{AppConfig, DirectorySink, InvoiceError, InvoiceGenerator};
use chrono::Local;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// 渲染失败时的退出码 (其余发票已写出)
const EXIT_RENDER_FAILED: u8 = 2;

/// Generate PDF invoices from a spreadsheet of invoice rows
#[derive(Parser, Debug)]
#[command(author, version, name = env!("CARGO_BIN_NAME"))]
struct Cli {
    /// Input spreadsheet (.xlsx, .xlsm, .xls, .ods or .csv), or the file to create with --sample
    #[arg(value_hint = clap::ValueHint::FilePath)]
    input: PathBuf,

    /// Configuration file (default: ./config.json when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output folder, overrides `output_folder` from the configuration
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Worksheet name (default: first worksheet)
    #[arg(long, value_name = "NAME")]
    sheet: Option<String>,

    /// Also write a CSV summary of the generated invoices
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Read and total the invoices without writing any PDF
    #[arg(long)]
    dry_run: bool,

    /// With --dry-run, print the invoices and their totals as JSON
    #[arg(long, requires = "dry_run")]
    json: bool,

    /// Write a sample invoice sheet (.csv) to INPUT and exit
    #[arg(long, conflicts_with_all = ["dry_run", "summary"])]
    sample: bool,

    /// Print debug output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 本地时间格式日志，写到 stderr (stdout 留给 JSON 预览)
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_env_filter(filter)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode, InvoiceError> {
    if cli.sample {
        let today = Local::now().date_naive();
        let rows = sample::write_sample_file(&cli.input, sample::SAMPLE_INVOICES, today)?;
        println!(
            "Sample file created: {} ({} invoices, {} rows)",
            cli.input.display(),
            sample::SAMPLE_INVOICES,
            rows
        );
        return Ok(ExitCode::SUCCESS);
    }

    // 加载配置
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.output_dir {
        config.output_folder = dir.clone();
    }
    info!("Loaded config: {:?}", config);

    let generator = InvoiceGenerator::new(config);

    if cli.dry_run {
        let invoices = generator.load_invoices(&cli.input, cli.sheet.as_deref())?;
        if cli.json {
            summary::write_preview_json(io::stdout().lock(), &invoices)?;
            println!();
            return Ok(ExitCode::SUCCESS);
        }
        println!("Found {} invoice(s)", invoices.len());
        let symbol = &generator.config().currency_symbol;
        for invoice in &invoices {
            let totals = invoice.totals();
            println!(
                "  {:<16} {:<28} items: {:>3}  total: {}",
                invoice.invoice_number(),
                invoice.header.customer_name,
                invoice.items.len(),
                format_money(symbol, &totals.total)
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut sink = DirectorySink::create(&generator.config().output_folder)?;
    let report = generator.process_file(&cli.input, cli.sheet.as_deref(), &mut sink)?;

    if let Some(path) = &cli.summary {
        summary::write_summary_file(path, &report)?;
    }

    println!("{}", "=".repeat(60));
    println!("Successfully generated {} invoice(s)", report.generated.len());
    let folder = sink.root();
    println!(
        "Output folder: {}",
        folder.canonicalize().unwrap_or_else(|_| folder.to_path_buf()).display()
    );
    for failed in &report.failed {
        println!(
            "FAILED: invoice {} (row {}): {}",
            failed.invoice_number, failed.header_row, failed.error
        );
    }
    println!("{}", "=".repeat(60));

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_RENDER_FAILED))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
