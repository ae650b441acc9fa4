use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tablecloth::{
    Backend, ErrorType, Package, SheetsWriter, TemplateOptions, TemplatePlan, TemplateWriter,
    XlsxWriter,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tablecloth",
    version,
    about = "Generate data-entry spreadsheet templates from a Tabular Data Package"
)]
struct Cli {
    /// Log more detail (repeat for debug output).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a Microsoft Excel (.xlsx) template.
    Excel(WriteArgs),
    /// Write the Google Sheets batchUpdate requests (JSON) that build a template.
    Gsheets(WriteArgs),
    /// Print the resolved template plan: sheets, enum lists and column rules.
    Plan(PlanArgs),
    /// Print the JSON Schema of the package descriptor.
    Schema,
}

#[derive(Args, Debug)]
struct WriteArgs {
    /// Package descriptor (YAML or JSON).
    package: PathBuf,

    /// Output file.
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    template: TemplateArgs,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Package descriptor (YAML or JSON).
    package: PathBuf,

    #[arg(long, value_enum, default_value_t = BackendArg::Excel)]
    backend: BackendArg,

    #[arg(long, value_enum, default_value_t = PlanFormat::Yaml)]
    format: PlanFormat,

    #[command(flatten)]
    template: TemplateArgs,
}

#[derive(Args, Debug)]
struct TemplateArgs {
    /// Template options file (YAML). Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name of the sheet holding enum lists.
    #[arg(long)]
    enum_sheet: Option<String>,

    /// Alert raised on invalid input: information, warning or stop.
    #[arg(long)]
    error_type: Option<ErrorType>,

    /// Do not add dropdowns.
    #[arg(long)]
    no_dropdowns: bool,

    /// Use foreign keys for dropdowns only.
    #[arg(long)]
    no_validate_foreign_keys: bool,

    /// Hide the columns right of each table.
    #[arg(long)]
    hide_columns: bool,

    /// Do not freeze the header row.
    #[arg(long)]
    no_freeze_header: bool,

    /// Add field descriptions as header notes.
    #[arg(long)]
    describe_headers: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    Excel,
    Gsheets,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Excel => Backend::Excel,
            BackendArg::Gsheets => Backend::GoogleSheets,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlanFormat {
    Yaml,
    Json,
}

impl TemplateArgs {
    fn options(&self) -> Result<TemplateOptions> {
        let mut options = match &self.config {
            Some(path) => TemplateOptions::from_path(path)
                .with_context(|| format!("failed to load options {}", path.display()))?,
            None => TemplateOptions::default(),
        };
        if let Some(enum_sheet) = &self.enum_sheet {
            options.enum_sheet = enum_sheet.clone();
        }
        if let Some(error_type) = self.error_type {
            options.error_type = Some(error_type);
        }
        if self.no_dropdowns {
            options.dropdowns = false;
        }
        if self.no_validate_foreign_keys {
            options.validate_foreign_keys = false;
        }
        if self.hide_columns {
            options.hide_columns = true;
        }
        if self.no_freeze_header {
            options.freeze_header = false;
        }
        if self.describe_headers {
            options.describe_headers = true;
        }
        Ok(options)
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_package(path: &Path) -> Result<Package> {
    Package::from_path(path).with_context(|| format!("failed to load package {}", path.display()))
}

fn plan(args: &WriteArgs, backend: Backend) -> Result<TemplatePlan> {
    let package = load_package(&args.package)?;
    let options = args.template.options()?;
    TemplatePlan::build(&package, &options, backend)
        .with_context(|| format!("failed to plan {backend} template"))
}

fn run_excel(args: WriteArgs) -> Result<()> {
    let plan = plan(&args, Backend::Excel)?;
    XlsxWriter
        .save(&plan, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), "wrote Excel template");
    Ok(())
}

fn run_gsheets(args: WriteArgs) -> Result<()> {
    let plan = plan(&args, Backend::GoogleSheets)?;
    let json = SheetsWriter.write_plan(&plan)?.to_json()?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), "wrote Google Sheets requests");
    Ok(())
}

fn run_plan(args: PlanArgs) -> Result<()> {
    let package = load_package(&args.package)?;
    let options = args.template.options()?;
    let backend = Backend::from(args.backend);
    let plan = TemplatePlan::build(&package, &options, backend)
        .with_context(|| format!("failed to plan {backend} template"))?;
    let text = match args.format {
        PlanFormat::Yaml => plan.to_yaml()?,
        PlanFormat::Json => plan.to_json()?,
    };
    print(&text)
}

fn print(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match cli.command {
        Command::Excel(args) => run_excel(args),
        Command::Gsheets(args) => run_gsheets(args),
        Command::Plan(args) => run_plan(args),
        Command::Schema => print(&tablecloth::spec::schema_json()),
    }
}
