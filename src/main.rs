use anyhow::{Context, Result};
use beanmon::monitor::{Config, Monitor, shutdown_signal};
use beanmon::render::TerminalSurface;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::time::Duration;

/// 极简系统资源显示小窗
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 刷新间隔毫秒数 (默认: 1500)
    #[arg(short, long, default_value_t = 1500)]
    interval_ms: u64,

    /// 统计剩余空间的挂载点 (默认: /)
    #[arg(short, long, default_value = "/")]
    mount: PathBuf,

    /// CPU 计数来源
    #[arg(long, default_value = "/proc/stat")]
    stat_path: PathBuf,

    /// 内存信息来源
    #[arg(long, default_value = "/proc/meminfo")]
    meminfo_path: PathBuf,

    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志系统
    init_logger(&args.log_level);

    let config = Config {
        stat_path: args.stat_path,
        meminfo_path: args.meminfo_path,
        mount_path: args.mount,
        interval: Duration::from_millis(args.interval_ms),
    };

    info!(
        "配置信息 - CPU: {}, 内存: {}, 挂载点: {}, 间隔: {:?}",
        config.stat_path.display(),
        config.meminfo_path.display(),
        config.mount_path.display(),
        config.interval
    );

    // 先注册退出信号，保证终端在任何时刻退出都能恢复
    let shutdown = shutdown_signal().context("无法注册退出信号")?;

    // 没有可绘制的表面时无法继续，这是唯一的致命错误
    let surface = match TerminalSurface::acquire().context("无法获取终端") {
        Ok(surface) => surface,
        Err(e) => {
            error!("{e:#}");
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    };

    let sampler = config.proc_sampler();
    let mut monitor = Monitor::new(sampler, surface, config).await;

    monitor.run(shutdown).await;

    info!("正常退出");

    Ok(())
}

/// 初始化日志系统
fn init_logger(level: &str) {
    match env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .try_init()
    {
        Ok(_) => info!("日志系统初始化成功，级别: {level}"),
        Err(e) => eprintln!("日志系统初始化失败: {e}，沿用已有的日志实现"),
    }
}
