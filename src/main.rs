use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tollgate::config::{RingConfig, TollgateConfig};
use tollgate::ratelimit::{LimiterConfig, RateLimiter, SharedLimiter};
use tollgate::ring::HasherKind;

#[derive(Debug, Parser)]
#[command(name = "tollgate", version, about = "Hash ring and rate limiter playground")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show how keys spread across ring nodes
    Ring(RingArgs),
    /// Replay a request stream against one or all limiter strategies
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
struct RingArgs {
    /// Comma-separated node names
    #[arg(long, value_delimiter = ',', default_value = "NodeA,NodeB,NodeC")]
    nodes: Vec<String>,

    /// Virtual nodes per physical node
    #[arg(long, default_value_t = 100)]
    replicas: u32,

    /// Number of `user:<i>` keys to place
    #[arg(long, default_value_t = 10_000)]
    keys: usize,

    #[arg(long, value_enum, default_value_t = HasherArg::Sha256)]
    hasher: HasherArg,

    /// Print the distribution as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HasherArg {
    Sha256,
    Murmur64,
}

impl From<HasherArg> for HasherKind {
    fn from(arg: HasherArg) -> Self {
        match arg {
            HasherArg::Sha256 => HasherKind::Sha256,
            HasherArg::Murmur64 => HasherKind::Murmur64,
        }
    }
}

#[derive(Debug, Args)]
struct SimulateArgs {
    /// YAML configuration file holding named limiter rules
    #[arg(long, requires = "limiter")]
    config: Option<PathBuf>,

    /// Name of the limiter rule to use from --config
    #[arg(long)]
    limiter: Option<String>,

    /// Strategy to simulate when no config is given (default: all five)
    #[arg(long, value_enum, conflicts_with = "config")]
    strategy: Option<StrategyArg>,

    /// Window strategies: requests per window
    #[arg(long, default_value_t = 5)]
    limit: u64,

    /// Window strategies: window length in milliseconds
    #[arg(long, default_value_t = 10_000)]
    window_ms: u64,

    /// Bucket strategies: capacity
    #[arg(long, default_value_t = 5)]
    capacity: u32,

    /// Bucket strategies: refill or leak rate per second
    #[arg(long, default_value_t = 1.0)]
    rate: f64,

    /// Requests to issue per strategy
    #[arg(long, default_value_t = 10)]
    requests: u32,

    /// Delay between requests in milliseconds
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,

    /// Extra random delay of up to this many milliseconds per request
    #[arg(long, default_value_t = 0)]
    jitter_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    FixedWindow,
    SlidingLog,
    SlidingCounter,
    TokenBucket,
    LeakyBucket,
}

impl StrategyArg {
    const ALL: [StrategyArg; 5] = [
        StrategyArg::FixedWindow,
        StrategyArg::SlidingLog,
        StrategyArg::SlidingCounter,
        StrategyArg::TokenBucket,
        StrategyArg::LeakyBucket,
    ];

    fn rule(self, args: &SimulateArgs) -> LimiterConfig {
        let (limit, window_ms) = (args.limit, args.window_ms);
        match self {
            StrategyArg::FixedWindow => LimiterConfig::FixedWindow { limit, window_ms },
            StrategyArg::SlidingLog => LimiterConfig::SlidingLog { limit, window_ms },
            StrategyArg::SlidingCounter => LimiterConfig::SlidingCounter { limit, window_ms },
            StrategyArg::TokenBucket => LimiterConfig::TokenBucket {
                capacity: args.capacity,
                refill_per_sec: args.rate,
            },
            StrategyArg::LeakyBucket => LimiterConfig::LeakyBucket {
                capacity: args.capacity,
                leak_per_sec: args.rate,
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Ring(args) => run_ring(args),
        Command::Simulate(args) => run_simulate(args).await,
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run_ring(args: RingArgs) -> anyhow::Result<()> {
    if args.nodes.is_empty() {
        bail!("at least one node is required");
    }

    let mut ring = RingConfig {
        replicas: args.replicas,
        hasher: args.hasher.into(),
    }
    .build()?;
    for node in &args.nodes {
        ring.add_node(node);
    }
    info!(
        nodes = ring.node_count(),
        vnodes = ring.len(),
        keys = args.keys,
        "Placing keys on ring"
    );

    let keys = (0..args.keys).map(|i| format!("user:{i}"));
    let distribution = ring.distribution(keys);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&distribution)?);
    } else {
        for (node, count) in &distribution {
            println!("{node} -> {count}");
        }
    }
    Ok(())
}

async fn run_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let rules: Vec<(String, LimiterConfig)> = match (&args.config, &args.limiter) {
        (Some(path), Some(name)) => {
            let config = TollgateConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            vec![(name.clone(), config.limiter(name)?.clone())]
        }
        (Some(_), None) => bail!("--config needs --limiter"),
        (None, _) => {
            let strategies = match args.strategy {
                Some(strategy) => vec![strategy],
                None => StrategyArg::ALL.to_vec(),
            };
            strategies
                .into_iter()
                .map(|s| {
                    let rule = s.rule(&args);
                    (rule.kind().to_string(), rule)
                })
                .collect()
        }
    };

    for (name, rule) in rules {
        simulate(&name, &rule, &args).await?;
    }
    Ok(())
}

async fn simulate(name: &str, rule: &LimiterConfig, args: &SimulateArgs) -> anyhow::Result<()> {
    let limiter = SharedLimiter::new(rule.build(Instant::now())?);
    println!("\n--- {name} ---");

    let mut rng = rand::thread_rng();
    for i in 1..=args.requests {
        if limiter.allow_now() {
            println!("Request {i} -> {}", chrono::Local::now().format("%H:%M:%S%.3f"));
        } else {
            println!("Request {i} -> RATE LIMITED");
        }

        let jitter = if args.jitter_ms > 0 {
            rng.gen_range(0..=args.jitter_ms)
        } else {
            0
        };
        tokio::time::sleep(Duration::from_millis(args.interval_ms + jitter)).await;
    }
    Ok(())
}
