//! 游戏外壳 - 终端前端
//!
//! 加载配置、初始化日志，在单线程 tokio 运行时上驱动游戏外壳。

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use shell_host::{
    CatalogueProvider, ContentProvider, HostConfig, MemoryProvider, ProviderKind, ShellDriver,
    Terminal,
};
use shell_runtime::{Attribution, SessionBootstrapper, ShellRouter};
use tokio::io::BufReader;
use tokio::task::LocalSet;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// 游戏外壳终端前端
#[derive(Parser, Debug)]
#[command(name = "game-shell", version, about)]
struct Cli {
    /// 配置文件路径
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// 启动 URL，覆盖配置文件中的 launch_url
    #[arg(long)]
    url: Option<String>,

    /// 内容目录路径（使用磁盘内容目录）
    #[arg(long, conflicts_with = "demo")]
    content: Option<PathBuf>,

    /// 使用内置演示内容
    #[arg(long)]
    demo: bool,

    /// 固定随机种子，生成可复现的用户 ID
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    /// 命令行参数覆盖配置文件
    fn apply(&self, config: &mut HostConfig) {
        if let Some(url) = &self.url {
            config.launch_url = url.clone();
        }
        if let Some(content) = &self.content {
            config.provider = ProviderKind::Catalogue;
            config.content_path = content.clone();
        }
        if self.demo {
            config.provider = ProviderKind::Memory;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = HostConfig::load(&cli.config);
    init_tracing(&loaded.config.log.filter);
    loaded.log(&cli.config);

    let mut config = loaded.config;
    cli.apply(&mut config);

    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    match run(&cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// 日志写入 stderr，`RUST_LOG` 优先于配置文件
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn run(cli: &Cli, config: HostConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("创建 tokio 运行时失败")?;
    let local = LocalSet::new();

    let bootstrapper = match cli.seed {
        Some(seed) => SessionBootstrapper::seeded(seed),
        None => SessionBootstrapper::from_entropy(),
    };
    let router = ShellRouter::new(bootstrapper);
    let attribution = Attribution::from_url(&config.launch_url);
    let timeout = config.provider_timeout();
    let content_check = config.debug.content_check;

    info!(provider = ?config.provider, timeout_ms = config.provider_timeout_ms, "宿主启动");

    match config.provider {
        ProviderKind::Memory => {
            let provider = Rc::new(MemoryProvider::demo());
            local.block_on(
                &runtime,
                drive(provider, router, timeout, attribution, content_check),
            )
        }
        ProviderKind::Catalogue => {
            let mut provider = CatalogueProvider::new(&config.content_path);
            if let Some(log) = &config.analytics_log {
                provider = provider.with_analytics_log(log);
            }
            local.block_on(
                &runtime,
                drive(Rc::new(provider), router, timeout, attribution, content_check),
            )
        }
    }
}

async fn drive<P: ContentProvider + 'static>(
    provider: Rc<P>,
    router: ShellRouter,
    timeout: std::time::Duration,
    attribution: Attribution,
    content_check: bool,
) -> anyhow::Result<()> {
    let mut driver = ShellDriver::new(provider, router).with_timeout(timeout);
    let mut terminal = Terminal::new(std::io::stdout()).with_content_check(content_check);
    let stdin = BufReader::new(tokio::io::stdin());

    terminal.run(&mut driver, attribution, stdin).await
}
