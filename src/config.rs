use std::time::Duration;

use color_eyre::eyre::{bail, eyre, Result, WrapErr};

#[derive(Debug, Clone)]
pub struct Config {
    /// Cache namespace to operate on. First positional argument.
    pub namespace: String,

    /// Operation and its arguments. Remaining positional arguments.
    pub command: Command,

    /// Store config. Set with `REGION_CACHE_STORE`. Default is `redis`.
    pub store_config: StoreConfig,

    /// Namespace TTL applied on every write. Set with `REGION_CACHE_TIMEOUT_MS`. Default is none.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get { key: String },
    Put { key: String, value: String },
    Remove { key: String },
    Clear,
    Size,
}

#[derive(Debug, Clone)]
pub enum StoreType {
    Memory,
    Redis,
}

#[derive(Debug, Clone)]
pub enum StoreConfig {
    Memory,
    Redis(RedisConfig),
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// URL to Redis. Set with `REGION_CACHE_REDIS_URL`, defaults to localhost.
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1/".to_string(),
        }
    }
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let arg = |i: usize, name: &str| {
            args.get(i)
                .cloned()
                .ok_or_else(|| eyre!("missing <{}> argument", name))
        };

        let Some(op) = args.first() else {
            bail!("missing <command> argument");
        };

        Ok(match op.as_str() {
            "get" => Command::Get { key: arg(1, "key")? },
            "put" => Command::Put {
                key: arg(1, "key")?,
                value: arg(2, "value")?,
            },
            "remove" => Command::Remove { key: arg(1, "key")? },
            "clear" => Command::Clear,
            "size" => Command::Size,
            other => bail!("unknown command {:?}", other),
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::from_args(&args, |name| std::env::var(name).ok())
    }

    fn from_args(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let Some(namespace) = args.first().cloned() else {
            bail!("usage: region-cache <namespace> <get|put|remove|clear|size> [key] [value]");
        };
        let command = Command::parse(&args[1..])?;

        let store_type = match env("REGION_CACHE_STORE").as_deref() {
            Some("memory") => StoreType::Memory,
            Some("redis") | None => StoreType::Redis,
            Some(other) => bail!("unknown REGION_CACHE_STORE {:?}", other),
        };

        let store_config = match store_type {
            StoreType::Memory => StoreConfig::Memory,
            StoreType::Redis => {
                let url = env("REGION_CACHE_REDIS_URL")
                    .unwrap_or_else(|| RedisConfig::default().url);

                StoreConfig::Redis(RedisConfig { url })
            }
        };

        let timeout = env("REGION_CACHE_TIMEOUT_MS")
            .map(|ms| ms.parse::<u64>().map(Duration::from_millis))
            .transpose()
            .wrap_err("REGION_CACHE_TIMEOUT_MS must be a number of milliseconds")?;

        Ok(Self {
            namespace,
            command,
            store_config,
            timeout,
        })
    }
}
