use std::path::PathBuf;

use clap::Parser;

use retailsim_observability::LogFormat;

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "retailsim", about = "Retail ledger and campaign pricing simulator", version)]
pub struct CliArgs {
    #[arg(
        long,
        env = "RETAILSIM_SCENARIO",
        value_name = "FILE",
        help = "Run the commands in FILE instead of reading from stdin"
    )]
    pub file: Option<PathBuf>,

    #[arg(
        long,
        env = "RETAILSIM_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty,
        value_name = "FORMAT",
        help = "Diagnostic log format on stderr (pretty or json)"
    )]
    pub log_format: LogFormat,

    #[arg(
        long,
        env = "RETAILSIM_EMIT_EVENTS",
        help = "Print every published domain event as a JSON line on stderr"
    )]
    pub emit_events: bool,
}
