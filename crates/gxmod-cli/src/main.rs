mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{
    parse_hsl, parse_scheme, parse_section, Context, EXIT_EXPORT_ERROR, EXIT_FAILURE,
    EXIT_IMPORT_ERROR,
};
use gxmod_core::{BuilderConfig, ColorScheme};
use gxmod_schema::{Hsl, Section};
use gxmod_store::ArchiveFormat;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "gxmod",
    version,
    about = "Assemble, validate, and export GX mod bundles"
)]
struct Cli {
    /// Session file holding the mod under construction.
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start a new session.
    New {
        name: String,
        #[arg(default_value = "1.0.0")]
        version: String,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        developer: Option<String>,
        #[arg(long)]
        update_url: Option<String>,
        /// Replace an existing session file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Show metadata, section counts and the current flavor hash.
    Info,
    /// Merge an existing manifest.json (and the assets next to it) into the session.
    Import {
        manifest: PathBuf,
    },
    /// Register a file under a relative bundle path, e.g. icon_512.png.
    Register {
        rel: String,
        #[arg(required_unless_present = "remove")]
        file: Option<PathBuf>,
        /// Drop the registration instead.
        #[arg(long, default_value_t = false, conflicts_with = "file")]
        remove: bool,
    },
    /// Set the mod key from a key or pem file.
    Key {
        #[arg(conflicts_with_all = ["value", "clear"])]
        file: Option<PathBuf>,
        /// Use this literal key text.
        #[arg(long)]
        value: Option<String>,
        #[arg(long, default_value_t = false)]
        clear: bool,
    },
    /// Add a pack to a payload section.
    Pack {
        #[arg(value_parser = parse_section)]
        section: Section,
        name: String,
        files: Vec<PathBuf>,
        /// Explicit id; defaults to the next free <prefix>_N.
        #[arg(long)]
        id: Option<String>,
        /// Event, cursor type, image key or color scheme the files attach to.
        #[arg(long)]
        slot: Option<String>,
    },
    /// Attach files to an existing entry.
    Attach {
        #[arg(value_parser = parse_section)]
        section: Section,
        index: usize,
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        slot: Option<String>,
    },
    /// Map a sound event to a generated silent file.
    Placeholder {
        #[arg(value_parser = parse_section)]
        section: Section,
        index: usize,
        event: String,
        /// File extension; defaults to the configured one.
        #[arg(long)]
        ext: Option<String>,
    },
    /// Remove one entry from a section.
    Remove {
        #[arg(value_parser = parse_section)]
        section: Section,
        index: usize,
    },
    /// Set the accent and secondary colours of a theme entry.
    Theme {
        index: usize,
        #[arg(value_parser = parse_scheme)]
        scheme: ColorScheme,
        /// Accent colour as h,s,l.
        #[arg(long, value_parser = parse_hsl)]
        accent: Hsl,
        /// Secondary base colour as h,s,l.
        #[arg(long, value_parser = parse_hsl)]
        secondary: Hsl,
    },
    /// Set or clear the text colour of a wallpaper scheme.
    TextColor {
        index: usize,
        #[arg(value_parser = parse_scheme)]
        scheme: ColorScheme,
        color: Option<String>,
    },
    /// Replace a page style's URL match patterns (comma separated).
    Matches {
        index: usize,
        patterns: String,
    },
    /// Register files found under a folder for unregistered references.
    Scan {
        folder: PathBuf,
    },
    /// Check the payload against the registered files.
    Validate,
    /// Rewrite legacy and malformed sections into canonical form.
    Fix,
    /// Print the manifest as it would be exported.
    Preview,
    /// Write the bundle to a directory or archive.
    Export {
        output: PathBuf,
        /// Write a plain directory instead of an archive.
        #[arg(long, default_value_t = false, conflicts_with = "format")]
        dir: bool,
        /// Archive format; defaults to the output extension, then the config.
        #[arg(long)]
        format: Option<ArchiveFormat>,
        /// Export even if referenced files are not registered.
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },
    /// List known event and cursor type names.
    Presets {
        #[arg(value_parser = parse_section)]
        section: Option<Section>,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("GXMOD_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config = match BuilderConfig::load_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    let ctx = Context {
        session_path: cli.session.unwrap_or_else(|| config.session.clone()),
        config,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::New {
            name,
            version,
            author,
            description,
            developer,
            update_url,
            force,
        } => commands::new::run(
            &ctx,
            commands::new::NewArgs {
                name,
                version,
                author,
                description,
                developer,
                update_url,
            },
            force,
        ),
        Commands::Info => commands::info::run(&ctx),
        Commands::Import { manifest } => commands::import::run(&ctx, &manifest),
        Commands::Register { rel, file, remove } => {
            commands::register::run(&ctx, &rel, file.as_deref(), remove)
        }
        Commands::Key { file, value, clear } => {
            commands::key::run(&ctx, file.as_deref(), value.as_deref(), clear)
        }
        Commands::Pack {
            section,
            name,
            files,
            id,
            slot,
        } => commands::pack::run(&ctx, section, &name, &files, id.as_deref(), slot.as_deref()),
        Commands::Attach {
            section,
            index,
            files,
            slot,
        } => commands::attach::run(&ctx, section, index, &files, slot.as_deref()),
        Commands::Placeholder {
            section,
            index,
            event,
            ext,
        } => commands::placeholder::run(&ctx, section, index, &event, ext.as_deref()),
        Commands::Remove { section, index } => commands::remove::run(&ctx, section, index),
        Commands::Theme {
            index,
            scheme,
            accent,
            secondary,
        } => commands::style::theme(&ctx, index, scheme, accent, secondary),
        Commands::TextColor {
            index,
            scheme,
            color,
        } => commands::style::text_color(&ctx, index, scheme, color.as_deref()),
        Commands::Matches { index, patterns } => commands::style::matches(&ctx, index, &patterns),
        Commands::Scan { folder } => commands::scan::run(&ctx, &folder),
        Commands::Validate => commands::validate::run(&ctx),
        Commands::Fix => commands::fix::run(&ctx),
        Commands::Preview => commands::preview::run(&ctx),
        Commands::Export {
            output,
            dir,
            format,
            yes,
        } => commands::export::run(&ctx, &output, dir, format, yes),
        Commands::Presets { section } => commands::presets::run(&ctx, section),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("import error:") {
                EXIT_IMPORT_ERROR
            } else if msg.starts_with("export error:") {
                EXIT_EXPORT_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
