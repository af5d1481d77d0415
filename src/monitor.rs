use crate::render::{Line, Surface, compose, format_disk};
use crate::stats::{CoreCounters, MemorySnapshot, ProcSampler, Sampler};
use crate::usage::compute_all;
use log::{debug, info, warn};
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// 默认刷新间隔
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1500);

/// 运行配置
#[derive(Debug, Clone)]
pub struct Config {
    pub stat_path: PathBuf,
    pub meminfo_path: PathBuf,
    pub mount_path: PathBuf,
    pub interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stat_path: PathBuf::from("/proc/stat"),
            meminfo_path: PathBuf::from("/proc/meminfo"),
            mount_path: PathBuf::from("/"),
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl Config {
    /// 按配置中的路径创建 procfs 采样器
    #[inline]
    pub fn proc_sampler(&self) -> ProcSampler {
        ProcSampler::new(&self.stat_path, &self.meminfo_path)
    }
}

/// 立即注册 SIGINT 与 SIGTERM，返回任一信号到达时完成的 future。
///
/// 注册发生在调用时而不是首次 poll 时，因此应在获取终端之前调用。
#[cfg(unix)]
pub fn shutdown_signal() -> io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => info!("收到 SIGINT"),
            _ = terminate.recv() => info!("收到 SIGTERM"),
        }
    })
}

#[cfg(not(unix))]
pub fn shutdown_signal() -> io::Result<impl Future<Output = ()>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("无法监听退出信号: {e}");
            std::future::pending::<()>().await;
        }
    })
}

/// 采样 → 计算 → 绘制 的循环控制器，独占前后两代 CPU 计数
pub struct Monitor<S, R> {
    sampler: S,
    surface: R,
    config: Config,
    cpu_count: usize,
    width: u32,
    previous: Vec<CoreCounters>,
    current: Vec<CoreCounters>,
    disk_text: String,
}

impl<S: Sampler, R: Surface> Monitor<S, R> {
    /// 创建控制器，CPU 数量只在此时统计一次
    pub async fn new(sampler: S, surface: R, config: Config) -> Self {
        let cpu_count = sampler.count_logical_cpus().await.unwrap_or_else(|e| {
            warn!("无法统计逻辑 CPU 数量: {e}");
            0
        });
        let (width, height) = surface.window_dimensions(cpu_count);
        info!("逻辑 CPU: {cpu_count}, 窗口尺寸: {width}x{height}");

        Self {
            sampler,
            surface,
            config,
            cpu_count,
            width,
            previous: vec![CoreCounters::default(); cpu_count],
            current: vec![CoreCounters::default(); cpu_count],
            disk_text: String::new(),
        }
    }

    #[inline]
    pub fn cpu_count(&self) -> usize {
        self.cpu_count
    }

    #[inline]
    pub fn surface(&self) -> &R {
        &self.surface
    }

    /// 执行一次完整的刷新，返回本次绘制的文本行
    pub async fn tick(&mut self) -> Vec<Line> {
        let memory = self.sample().await;

        let usages = compute_all(&self.previous, &self.current);
        let lines = compose(&usages, &memory, &self.disk_text, self.width);

        if let Err(e) = self.paint(&lines) {
            warn!("绘制失败: {e}");
        }

        // 整体覆盖上一代
        self.previous.clone_from(&self.current);
        lines
    }

    /// 持续刷新，直到 `shutdown` 完成；只在两次刷新之间检查退出
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            self.tick().await;

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("收到退出信号，停止刷新");
                    break;
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }

    /// 读取本代数据；失败时按降级策略替换，返回内存快照
    async fn sample(&mut self) -> MemorySnapshot {
        match self.sampler.read_cpu_counters(self.cpu_count).await {
            Ok(mut rows) => {
                rows.resize(self.cpu_count, CoreCounters::default());
                self.current = rows;
            }
            Err(e) => {
                warn!("读取 CPU 计数失败，本次按零处理: {e}");
                self.current = vec![CoreCounters::default(); self.cpu_count];
            }
        }

        let memory = self.sampler.read_memory().await.unwrap_or_else(|e| {
            warn!("读取内存信息失败，本次按零处理: {e}");
            MemorySnapshot::default()
        });

        match self.sampler.read_disk(&self.config.mount_path).await {
            Ok(disk) => self.disk_text = format_disk(&self.config.mount_path, &disk),
            Err(e) => debug!(
                "查询 {} 失败，保留上次结果: {e}",
                self.config.mount_path.display()
            ),
        }

        memory
    }

    fn paint(&mut self, lines: &[Line]) -> io::Result<()> {
        self.surface.clear()?;
        for line in lines {
            self.surface
                .draw_line(line.x, line.y, &line.text, line.color)?;
        }
        self.surface.flush()
    }
}
