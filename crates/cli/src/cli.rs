use clap::builder::FalseyValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use lancache_sync_domain::config::parse_service_names;
use lancache_sync_domain::CliOverrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lancache-sync")]
#[command(version)]
#[command(about = "Keep AdGuard Home DNS rewrites pointed at a LAN cache")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true, env = "LANCACHE_SYNC_CONFIG")]
    pub config: Option<String>,

    /// AdGuard Home base URL, e.g. http://adguard.lan:3000
    #[arg(long, global = true, env = "ADGUARD_API")]
    pub adguard_api: Option<String>,

    #[arg(long, global = true, env = "ADGUARD_USERNAME")]
    pub adguard_username: Option<String>,

    #[arg(long, global = true, env = "ADGUARD_PASSWORD", hide_env_values = true)]
    pub adguard_password: Option<String>,

    /// Answer for every managed rewrite (cache server IP or hostname)
    #[arg(long, global = true, env = "LANCACHE_SERVER")]
    pub lancache_server: Option<String>,

    /// Select every service in the index
    #[arg(
        long,
        global = true,
        env = "ALL_SERVICES",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub all_services: bool,

    /// Comma-separated service names, e.g. "steam,epicgames"
    #[arg(long, global = true, env = "SERVICE_NAMES")]
    pub service_names: Option<String>,

    /// Location of cache_domains.json
    #[arg(long, global = true)]
    pub index_url: Option<String>,

    /// Snapshot of the last assembled rewrite set
    #[arg(long, global = true, env = "CACHE_FILE")]
    pub cache_file: Option<PathBuf>,

    #[arg(long, global = true, env = "MAX_CONCURRENT_FETCHES")]
    pub max_concurrent_fetches: Option<usize>,

    #[arg(long, global = true, env = "PROGRESS_BATCH_SIZE")]
    pub progress_batch_size: Option<usize>,

    /// trace, debug, info, warn or error
    #[arg(long, global = true, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Reconcile the rewrite table once, or periodically with --every (default)
    Run(RunArgs),
    /// Print the services available in the index
    ListSources,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Compute and log the plan without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Fail the run if any source cannot be fetched
    #[arg(long)]
    pub strict: bool,

    /// Delete rewrites this tool created that are no longer listed
    #[arg(long)]
    pub remove_stale: bool,

    /// Keep running and reconcile every N seconds
    #[arg(long, value_name = "SECS")]
    pub every: Option<u64>,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Run(RunArgs::default()))
    }

    /// Flags only override when set; an unset flag keeps the file's value.
    pub fn overrides(&self, command: &Command) -> CliOverrides {
        let run = match command {
            Command::Run(args) => args.clone(),
            Command::ListSources => RunArgs::default(),
        };

        CliOverrides {
            api_base_url: self.adguard_api.clone(),
            username: self.adguard_username.clone(),
            password: self.adguard_password.clone(),
            cache_target_host: self.lancache_server.clone(),
            all_sources: self.all_services.then_some(true),
            source_names: self
                .service_names
                .as_deref()
                .map(parse_service_names)
                .filter(|names| !names.is_empty()),
            index_url: self.index_url.clone(),
            max_concurrent_fetches: self.max_concurrent_fetches,
            progress_batch_size: self.progress_batch_size,
            cache_file_path: self.cache_file.clone(),
            strict: run.strict.then_some(true),
            remove_stale: run.remove_stale.then_some(true),
            dry_run: run.dry_run.then_some(true),
            log_level: self.log_level.clone(),
        }
    }
}
