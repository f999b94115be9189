//! `serialosc-config`: inspect and edit saved per-device settings.
//!
//! # Usage
//!
//! ```text
//! serialosc-config [--config-dir <DIR>] <COMMAND>
//!
//! Commands:
//!   dir                  Print the config directory
//!   path  <SERIAL>       Print the config file path for a device
//!   init                 Create the config directory if it is missing
//!   show  <SERIAL>       Print the effective settings for a device
//!   set   <SERIAL> ...   Change one or more settings and save them
//!   reset <SERIAL>       Overwrite a device's settings with the defaults
//! ```
//!
//! # Environment variables
//!
//! | Variable               | Description                                 |
//! |------------------------|---------------------------------------------|
//! | `SERIALOSC_CONFIG_DIR` | Same as `--config-dir`                      |
//! | `XDG_CONFIG_HOME`      | Base of the default config directory        |
//! | `RUST_LOG`             | Log filter, e.g. `serialosc_config=debug`   |
//!
//! Logs go to stderr so that `show --json` output stays machine-readable.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use serialosc_config::{
    ConfigStore, LoadedSettings, Port, Provisioned, ReadSource, Rotation, SettingsRecord,
    SettingsUpdate,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "serialosc-config",
    about = "Inspect and edit saved serialosc device settings",
    version
)]
struct Cli {
    /// Directory holding `<serial>.conf` files, instead of the platform default.
    #[arg(long, global = true, env = "SERIALOSC_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the config directory.
    Dir,

    /// Print the config file path for a device.
    Path { serial: String },

    /// Create the config directory (owner-only permissions) if it is missing.
    Init,

    /// Print the effective settings for a device.
    Show {
        serial: String,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Change one or more settings and save them.
    Set(SetArgs),

    /// Overwrite a device's settings with the defaults.
    Reset { serial: String },
}

#[derive(Debug, Args)]
struct SetArgs {
    serial: String,

    /// Port of the device's own OSC server (0 = pick a free port).
    #[arg(long)]
    server_port: Option<Port>,

    /// Address prefix for outgoing OSC messages.
    #[arg(long)]
    osc_prefix: Option<String>,

    /// Host of the application receiving OSC messages.
    #[arg(long)]
    host: Option<String>,

    /// Port of the application receiving OSC messages.
    #[arg(long)]
    app_port: Option<Port>,

    /// Rotation as a number of quarter turns clockwise.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
    rotation: Option<u8>,
}

impl SetArgs {
    /// Converts the flags into an update.
    ///
    /// # Errors
    ///
    /// Fails when no setting flag was given.
    fn into_update(self) -> anyhow::Result<SettingsUpdate> {
        let update = SettingsUpdate {
            server_port: self.server_port,
            osc_prefix: self.osc_prefix,
            host: self.host,
            app_port: self.app_port,
            rotation: self.rotation.and_then(Rotation::from_quadrant),
        };
        if update.is_empty() {
            anyhow::bail!("nothing to change; pass at least one setting flag");
        }
        Ok(update)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut store = ConfigStore::system();
    if let Some(dir) = cli.config_dir {
        store = store.with_base_dir(dir);
    }

    match cli.command {
        Command::Dir => {
            let dir = store.config_dir().context("resolving config directory")?;
            println!("{}", dir.display());
        }
        Command::Path { serial } => {
            let path = store
                .path_for_serial(&serial)
                .with_context(|| format!("resolving config path for {serial}"))?;
            println!("{}", path.display());
        }
        Command::Init => match store.ensure_directory().context("provisioning config directory")? {
            Provisioned::Created => info!("config directory created"),
            Provisioned::AlreadyPresent => info!("config directory already present"),
        },
        Command::Show { serial, json } => {
            let loaded = store
                .read(&serial)
                .with_context(|| format!("reading settings for {serial}"))?;
            if json {
                println!("{}", render_json(&serial, &loaded)?);
            } else {
                print!("{}", render_table(&serial, &loaded));
            }
        }
        Command::Set(args) => {
            let serial = args.serial.clone();
            let update = args.into_update()?;

            let mut loaded = store
                .read(&serial)
                .with_context(|| format!("reading settings for {serial}"))?;
            update.apply(&mut loaded.settings);
            save(&store, &serial, &loaded.settings)?;
            info!(%serial, "settings saved");
        }
        Command::Reset { serial } => {
            save(&store, &serial, &SettingsRecord::default())?;
            info!(%serial, "settings reset to defaults");
        }
    }

    Ok(())
}

fn save(store: &ConfigStore, serial: &str, settings: &SettingsRecord) -> anyhow::Result<()> {
    store
        .ensure_directory()
        .context("provisioning config directory")?;
    store
        .write(serial, settings)
        .with_context(|| format!("writing settings for {serial}"))
}

// ── Output formatting ─────────────────────────────────────────────────────────

fn source_label(source: &ReadSource) -> String {
    match source {
        ReadSource::Absent => "defaults (no saved file)".to_string(),
        ReadSource::Defaulted { reason } => format!("defaults substituted ({reason})"),
        ReadSource::Parsed => "saved file".to_string(),
    }
}

fn render_table(serial: &str, loaded: &LoadedSettings) -> String {
    let s = &loaded.settings;
    format!(
        "device {serial}\n\
         \x20 source              {}\n\
         \x20 server.port         {}\n\
         \x20 application.prefix  {}\n\
         \x20 application.host    {}\n\
         \x20 application.port    {}\n\
         \x20 device.rotation     {}\n",
        source_label(&loaded.source),
        port_label(s.server.port),
        s.application.osc_prefix,
        s.application.host,
        s.application.port,
        s.device.rotation,
    )
}

fn port_label(port: Port) -> String {
    if port.is_auto() {
        format!("{port} (auto)")
    } else {
        port.to_string()
    }
}

fn render_json(serial: &str, loaded: &LoadedSettings) -> anyhow::Result<String> {
    let (source, reason) = match &loaded.source {
        ReadSource::Absent => ("absent", None),
        ReadSource::Defaulted { reason } => ("defaulted", Some(reason.as_str())),
        ReadSource::Parsed => ("parsed", None),
    };
    let value = serde_json::json!({
        "serial": serial,
        "source": source,
        "reason": reason,
        "settings": loaded.settings,
    });
    serde_json::to_string_pretty(&value).context("encoding settings as JSON")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
