use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "order-batch")]
#[command(about = "Route, report and persist one user's orders")]
pub struct CliArgs {
    /// User whose orders are processed
    #[arg(long)]
    pub user_id: u64,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = "order-batch.toml")]
    pub config: String,

    /// Override report.output_dir from the config
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
