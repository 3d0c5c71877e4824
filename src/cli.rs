use crate::aggregator::ProvenancePolicy;
use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Football statistics API
///
/// Serves season tables from FBref, Understat, FotMob, Sofascore, WhoScored,
/// ClubElo and SoFIFA as JSON records under one URL scheme.
///
/// Settings are read from the config file, then environment variables,
/// then these flags. Later sources win.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Address to listen on, e.g. 0.0.0.0:8000
    #[arg(long = "bind", short = 'b', help_heading = "Server")]
    pub bind: Option<String>,

    /// Base URL of the provider gateway
    #[arg(long = "provider-url", help_heading = "Server")]
    pub provider_url: Option<String>,

    /// How the combined endpoint reports its sources.
    /// `legacy` always lists fbref and understat, `honest` lists only providers that answered.
    #[arg(long = "provenance", value_enum, help_heading = "Server")]
    pub provenance: Option<ProvenancePolicy>,

    /// List current configuration settings and exit
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Enable debug level logging for this crate.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}
