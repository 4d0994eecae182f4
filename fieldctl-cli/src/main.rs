//! `fieldctl` command line: batch-print field values and edit settings stores.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use fieldctl::{
    CodeValidator, DocumentFormat, MemoryHost, OutputDestination, OutputOptions, Plugin,
    PluginConfig, PrintCallerParams, PrintOverrides, SettingsScope, emit_text,
    parse_document_str,
};

#[derive(Debug, Parser)]
#[command(
    name = "fieldctl",
    version,
    about = "Render pluggable field values and manage dirty-tracked settings pages"
)]
struct Cli {
    /// Plugin configuration spec: file path, inline payload, or "-" for stdin
    #[arg(short = 'p', long = "plugin-config", value_name = "SPEC", global = true)]
    plugin_config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render one stored field read-only, the way the batch-print pipeline does
    Print(PrintArgs),
    /// Show a settings page, optionally apply an advanced edit and save it
    Settings(SettingsArgs),
    /// List the field types this plugin renders
    Fields,
}

#[derive(Debug, Args)]
struct PrintArgs {
    /// Field type to render
    #[arg(short = 't', long = "field-type", value_name = "TYPE")]
    field_type: String,

    /// Caller bundle spec (fieldInfo plus caller parameters)
    #[arg(short = 'c', long = "caller", value_name = "SPEC")]
    caller: String,

    /// Override layers spec (customer/project/section maps keyed by function id)
    #[arg(long = "overrides", value_name = "SPEC")]
    overrides: Option<String>,

    /// Output destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    Tenant,
    Project,
}

impl From<ScopeArg> for SettingsScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Tenant => SettingsScope::Tenant,
            ScopeArg::Project => SettingsScope::Project,
        }
    }
}

#[derive(Debug, Args)]
struct SettingsArgs {
    /// JSON file holding the settings store; created on save when missing
    #[arg(short = 's', long = "store", value_name = "PATH")]
    store: PathBuf,

    #[arg(long = "scope", value_enum, default_value = "tenant")]
    scope: ScopeArg,

    /// Current item id; its first '-' segment selects the project
    #[arg(short = 'i', long = "item", value_name = "ID")]
    item: Option<String>,

    /// File whose content replaces the settings, as confirmed in the advanced editor
    #[arg(short = 'a', long = "advanced", value_name = "PATH")]
    advanced: Option<PathBuf>,

    /// Persist the working copy back to the store
    #[arg(long = "save")]
    save: bool,
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.plugin_config.as_deref() {
        Some(spec) => {
            let value = load_value(spec, format_hint(spec), "plugin config")?;
            serde_json::from_value::<PluginConfig>(value)
                .wrap_err("invalid plugin configuration")?
        }
        None => PluginConfig::default(),
    };
    let plugin =
        Plugin::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), config).with_builtin_fields();
    tracing::debug!(plugin = plugin.name(), version = plugin.version(), "plugin ready");

    match cli.command {
        Command::Print(args) => run_print(&plugin, args),
        Command::Settings(args) => run_settings(&plugin, args),
        Command::Fields => run_fields(&plugin),
    }
}

fn run_print(plugin: &Plugin, args: PrintArgs) -> Result<()> {
    let caller: PrintCallerParams = serde_json::from_value(load_value(
        &args.caller,
        format_hint(&args.caller),
        "caller",
    )?)
    .wrap_err("invalid caller bundle")?;
    let overrides: PrintOverrides = match args.overrides.as_deref() {
        Some(spec) => serde_json::from_value(load_value(spec, format_hint(spec), "overrides")?)
            .wrap_err("invalid override layers")?,
        None => PrintOverrides::default(),
    };

    let mut errors = Vec::new();
    let markup = plugin
        .print(&args.field_type, &overrides, &caller, &mut |message: &str| {
            errors.push(message.to_string())
        })
        .ok_or_else(|| eyre!("field type '{}' is not supported", args.field_type))?;
    if !errors.is_empty() {
        return Err(eyre!(errors.join("\n")));
    }

    emit_text(&markup, &output_options(&args.outputs)).map_err(Report::msg)
}

fn run_settings(plugin: &Plugin, args: SettingsArgs) -> Result<()> {
    let mut host = load_store(&args.store)?;
    if let Some(item) = args.item {
        host.current_item = Some(item);
    }
    let scope = SettingsScope::from(args.scope);
    let mut page = plugin
        .open_settings_page(scope, host)
        .ok_or_else(|| eyre!("the {scope:?} settings page is disabled"))?;
    page.render_setting_page();

    if let Some(path) = args.advanced.as_ref() {
        let code = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read file {}", path.display()))?;
        let mut editor = |_seed: &str, _validator: &CodeValidator| -> Option<String> {
            Some(code.clone())
        };
        page.show_advanced(&mut editor).map_err(Report::new)?;
    }

    emit_text(page.markup(), &OutputOptions::default()).map_err(Report::msg)?;
    println!("dirty: {}", page.is_dirty().map_err(Report::new)?);

    if args.save {
        pollster::block_on(page.save_async()).map_err(Report::new)?;
        let store = serde_json::to_string_pretty(page.host()).wrap_err("failed to encode store")?;
        fs::write(&args.store, store)
            .wrap_err_with(|| format!("failed to write file {}", args.store.display()))?;
        eprintln!("saved settings to {}", args.store.display());
    }
    Ok(())
}

fn run_fields(plugin: &Plugin) -> Result<()> {
    let descriptions = plugin.field_config_options();
    let rendered =
        serde_json::to_string_pretty(&descriptions).wrap_err("failed to encode field list")?;
    println!("{rendered}");
    Ok(())
}

fn load_store(path: &Path) -> Result<MemoryHost> {
    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents)
            .wrap_err_with(|| format!("invalid settings store {}", path.display())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(MemoryHost::new()),
        Err(err) => {
            Err(Report::new(err).wrap_err(format!("failed to read file {}", path.display())))
        }
    }
}

fn output_options(outputs: &[String]) -> OutputOptions {
    if outputs.is_empty() {
        return OutputOptions::default();
    }
    outputs.iter().fold(
        OutputOptions::default().with_destinations(Vec::new()),
        |options, dest| {
            if dest == "-" {
                options.add_destination(OutputDestination::Stdout)
            } else {
                options.add_destination(OutputDestination::file(dest))
            }
        },
    )
}

fn format_hint(spec: &str) -> DocumentFormat {
    if spec == "-" {
        return DocumentFormat::default();
    }
    DocumentFormat::from_path(Path::new(spec)).unwrap_or_default()
}

fn load_value(spec: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    if spec == "-" {
        let contents = read_from_source(&InputSource::Stdin)?;
        return parse_contents(&contents, format, label);
    }

    let path = PathBuf::from(spec);
    match read_from_source(&InputSource::File(path.clone())) {
        Ok(contents) => parse_contents(&contents, format, label),
        Err(err) => {
            if is_not_found(&err) {
                let inline_label = format!("inline {label}");
                return parse_contents(spec, format, &inline_label);
            }
            Err(err.wrap_err(format!("failed to load {label} from {}", path.display())))
        }
    }
}

fn read_from_source(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            Ok(buffer)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read file {}", path.display())),
    }
}

fn is_not_found(err: &Report) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}

fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    match parse_document_str(contents, format) {
        Ok(value) => Ok(value),
        Err(primary) => {
            for candidate in DocumentFormat::available_formats() {
                if candidate == format {
                    continue;
                }
                if let Ok(value) = parse_document_str(contents, candidate) {
                    return Ok(value);
                }
            }
            Err(eyre!(
                "failed to parse {label}: tried {} (first error: {primary})",
                format_list()
            ))
        }
    }
}

fn format_list() -> String {
    DocumentFormat::available_formats()
        .into_iter()
        .map(|fmt| fmt.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
