#![forbid(unsafe_code)]

//! Hagalund CLI: resolve XML-DSig URI references.

mod logging;

use clap::{Parser, Subcommand};
use hagalund::setup;
use hagalund_core::Error;
use hagalund_resolver::backends::AnonymousResolver;
use hagalund_resolver::{PluginHandle, ResolutionContext, ResolutionFailure};
use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "hagalund",
    about = "Hagalund: resolve XML Signature URI references",
    version
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long = "log-json", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one URI reference and write its content
    Resolve {
        /// URI reference (omit to resolve the --data input)
        uri: Option<String>,

        /// Base URI (defaults to the --document location)
        #[arg(long)]
        base: Option<String>,

        /// Document containing the reference, for same-document URIs
        #[arg(short, long)]
        document: Option<PathBuf>,

        /// Content for a reference without a URI
        #[arg(long)]
        data: Option<PathBuf>,

        /// Refuse filesystem and direct HTTP resolvers
        #[arg(long)]
        secure: bool,

        /// Resolver property (KEY=VALUE)
        #[arg(short = 'p', long = "property")]
        property: Vec<String>,

        /// Register additional ID attribute names
        #[arg(long = "id-attr")]
        id_attr: Vec<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the references of a signed document and their resolvers
    References {
        /// Signed XML file
        file: PathBuf,

        /// Refuse filesystem and direct HTTP resolvers
        #[arg(long)]
        secure: bool,

        /// Also dereference each reference and report its size
        #[arg(long)]
        fetch: bool,

        /// Register additional ID attribute names
        #[arg(long = "id-attr")]
        id_attr: Vec<String>,
    },

    /// List the default resolvers in priority order
    Info,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] Error),

    #[error(transparent)]
    Resolution(#[from] ResolutionFailure),
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    let result = match cli.command {
        Commands::Resolve {
            uri,
            base,
            document,
            data,
            secure,
            property,
            id_attr,
            output,
        } => cmd_resolve(uri, base, document, data, secure, property, id_attr, output),

        Commands::References {
            file,
            secure,
            fetch,
            id_attr,
        } => cmd_references(&file, secure, fetch, &id_attr),

        Commands::Info => cmd_info(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_resolve(
    uri: Option<String>,
    base: Option<String>,
    document: Option<PathBuf>,
    data: Option<PathBuf>,
    secure: bool,
    property: Vec<String>,
    id_attr: Vec<String>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let properties = property
        .iter()
        .map(|p| setup::parse_property(p))
        .collect::<Result<Vec<_>, _>>()?;
    let registry = setup::configured_registry(&properties);

    let base = match (&base, &document) {
        (Some(base), _) => base.clone(),
        (None, Some(path)) => setup::file_base_uri(path)?,
        (None, None) => String::new(),
    };

    let mut ctx = ResolutionContext::new(uri.as_deref(), &base, secure);
    if let Some(path) = &document {
        ctx = ctx.with_document(Arc::new(setup::load_document(path, &id_attr)?));
    }

    let mut candidates: Vec<PluginHandle> = Vec::new();
    if let Some(path) = &data {
        candidates.push(Arc::new(AnonymousResolver::from_file(path)?));
    }

    let selected = registry.select(&ctx, Some(candidates.as_slice()))?;
    info!(resolver = selected.plugin().name(), "resolving");
    let content = selected.resolve(&ctx)?;
    if let Some(source) = content.source_uri() {
        info!(source, mime = content.mime_type(), "resolved");
    }
    write_output(output, &content.to_bytes()?)?;
    Ok(())
}

fn cmd_references(file: &Path, secure: bool, fetch: bool, id_attr: &[String]) -> Result<(), CliError> {
    let doc = Arc::new(setup::load_document(file, id_attr)?);
    let base = setup::file_base_uri(file)?;
    let registry = setup::configured_registry(&[]);

    for uri in setup::signature_references(&doc)? {
        let label = uri.as_deref().unwrap_or("<no URI>");
        let ctx =
            ResolutionContext::new(uri.as_deref(), &base, secure).with_document(Arc::clone(&doc));
        match registry.select(&ctx, None) {
            Ok(selected) if fetch => {
                match selected.resolve(&ctx).map_err(CliError::from).and_then(|content| {
                    content.to_bytes().map_err(CliError::from)
                }) {
                    Ok(bytes) => println!("{label}\t{}\t{} bytes", selected.kind(), bytes.len()),
                    Err(e) => println!("{label}\t{}\tERROR: {e}", selected.kind()),
                }
            }
            Ok(selected) => println!("{label}\t{}", selected.kind()),
            Err(e) => println!("{label}\t-\tERROR: {e}"),
        }
    }
    Ok(())
}

fn cmd_info() -> Result<(), CliError> {
    println!("Hagalund: XML Signature URI reference resolution");
    println!();
    println!("Default resolvers (priority order):");
    let registry = setup::configured_registry(&[]);
    for (i, registration) in registry.snapshot().iter().enumerate() {
        let plugin = registration.plugin();
        let gated = if hagalund_resolver::security::is_forbidden_in_secure_mode(plugin.as_ref()) {
            "  [forbidden in secure mode]"
        } else {
            ""
        };
        println!("  {}. {} ({}){gated}", i + 1, plugin.name(), plugin.kind());
        for key in plugin.property_keys() {
            println!("       property: {key}");
        }
    }
    Ok(())
}

// ── Utility functions ────────────────────────────────────────────────

fn write_output(path: Option<PathBuf>, data: &[u8]) -> Result<(), Error> {
    match path {
        Some(p) => {
            std::fs::write(&p, data)
                .map_err(|e| Error::Other(format!("{}: {e}", p.display())))
        }
        None => {
            use std::io::Write;
            std::io::stdout()
                .write_all(data)
                .map_err(|e| Error::Other(format!("stdout: {e}")))
        }
    }
}
