use std::path::{Path, PathBuf};

/// 单个逻辑 CPU 的累计时间计数（单位：内核 tick，自开机起累计）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CoreCounters {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
}

impl CoreCounters {
    #[inline]
    pub fn new(user: u64, nice: u64, system: u64, idle: u64) -> Self {
        Self {
            user,
            nice,
            system,
            idle,
        }
    }

    /// 四项计数之和，使用 u128 避免溢出
    #[inline]
    pub fn total(&self) -> u128 {
        self.user as u128 + self.nice as u128 + self.system as u128 + self.idle as u128
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// 内存快照（MiB，向下取整）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub free_mib: u64,
    pub cached_mib: u64,
}

/// 磁盘快照（GiB，向下取整）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiskSnapshot {
    pub free_gib: u64,
}

/// 系统资源获取错误类型
#[derive(Debug)]
pub enum StatsError {
    IoError(std::io::Error),
    ParseError(String),
    UnsupportedPlatform,
}

impl From<std::io::Error> for StatsError {
    #[inline]
    fn from(error: std::io::Error) -> Self {
        StatsError::IoError(error)
    }
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::IoError(e) => write!(f, "IO 错误: {e}"),
            StatsError::ParseError(s) => write!(f, "解析错误: {s}"),
            StatsError::UnsupportedPlatform => write!(f, "不支持的平台"),
        }
    }
}

impl std::error::Error for StatsError {}

pub type Result<T> = std::result::Result<T, StatsError>;

const GIB: u128 = 1024 * 1024 * 1024;

/// 统计 /proc/stat 中的逻辑 CPU 行数，不含汇总的 "cpu" 行
pub fn count_cpu_rows(content: &str) -> usize {
    content
        .lines()
        .filter(|line| line.starts_with("cpu"))
        .count()
        .saturating_sub(1)
}

/// 解析单行 CPU 计数，格式为 `cpuN user nice system idle ...`
fn parse_cpu_row(line: &str) -> Option<CoreCounters> {
    let mut parts = line.split_whitespace();
    if !parts.next()?.starts_with("cpu") {
        return None;
    }

    // 忽略其他字段 (iowait, irq, softirq, steal, guest, guest_nice)
    let mut next = || parts.next()?.parse::<u64>().ok();
    Some(CoreCounters::new(next()?, next()?, next()?, next()?))
}

/// 跳过第一行汇总数据，按顺序读取 `count` 行单核计数。
///
/// 缺失或无法解析的行记为全零，结果长度始终等于 `count`。
pub fn parse_cpu_rows(content: &str, count: usize) -> Vec<CoreCounters> {
    let mut lines = content.lines().skip(1);
    (0..count)
        .map(|_| {
            lines
                .next()
                .and_then(parse_cpu_row)
                .unwrap_or_default()
        })
        .collect()
}

/// 解析 /proc/meminfo 中的 `MemFree:` 与 `Cached:`，重复出现时以最后一次为准
pub fn parse_meminfo(content: &str) -> MemorySnapshot {
    let mut snapshot = MemorySnapshot::default();

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
            let mib = value.parse::<u64>().unwrap_or(0) / 1024; // kB 转换为 MiB

            match key {
                "MemFree:" => snapshot.free_mib = mib,
                "Cached:" => snapshot.cached_mib = mib,
                _ => {}
            }
        }
    }

    snapshot
}

/// 可用块数 × 块大小，换算为整 GiB
#[inline]
pub fn free_gib(available_blocks: u64, block_size: u64) -> u64 {
    (available_blocks as u128 * block_size as u128 / GIB) as u64
}

/// 系统计数来源
#[allow(async_fn_in_trait)]
pub trait Sampler {
    /// 逻辑 CPU 数量，不含汇总行
    async fn count_logical_cpus(&self) -> Result<usize>;

    /// 读取 `count` 个逻辑 CPU 的计数，按 CPU 序号排列
    async fn read_cpu_counters(&self, count: usize) -> Result<Vec<CoreCounters>>;

    async fn read_memory(&self) -> Result<MemorySnapshot>;

    async fn read_disk(&self, path: &Path) -> Result<DiskSnapshot>;
}

/// 基于 procfs 与 statvfs 的采样器
#[derive(Debug, Clone)]
pub struct ProcSampler {
    stat_path: PathBuf,
    meminfo_path: PathBuf,
}

impl Default for ProcSampler {
    #[inline]
    fn default() -> Self {
        Self::new("/proc/stat", "/proc/meminfo")
    }
}

impl ProcSampler {
    pub fn new(stat_path: impl Into<PathBuf>, meminfo_path: impl Into<PathBuf>) -> Self {
        Self {
            stat_path: stat_path.into(),
            meminfo_path: meminfo_path.into(),
        }
    }
}

impl Sampler for ProcSampler {
    async fn count_logical_cpus(&self) -> Result<usize> {
        let content = tokio::fs::read_to_string(&self.stat_path).await?;
        Ok(count_cpu_rows(&content))
    }

    async fn read_cpu_counters(&self, count: usize) -> Result<Vec<CoreCounters>> {
        let content = tokio::fs::read_to_string(&self.stat_path).await?;
        Ok(parse_cpu_rows(&content, count))
    }

    async fn read_memory(&self) -> Result<MemorySnapshot> {
        let content = tokio::fs::read_to_string(&self.meminfo_path).await?;
        Ok(parse_meminfo(&content))
    }

    async fn read_disk(&self, path: &Path) -> Result<DiskSnapshot> {
        statvfs_free_gib(path).map(|free_gib| DiskSnapshot { free_gib })
    }
}

/// 通过 statvfs 查询挂载点剩余空间
#[cfg(unix)]
#[allow(clippy::unnecessary_cast)]
fn statvfs_free_gib(path: &Path) -> Result<u64> {
    use std::os::unix::ffi::OsStrExt;

    let c_path = std::ffi::CString::new(path.as_os_str().as_bytes())
        .map_err(|e| StatsError::ParseError(format!("路径包含空字节: {e}")))?;

    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
    if ret != 0 {
        return Err(std::io::Error::last_os_error().into());
    }

    Ok(free_gib(stat.f_bavail as u64, stat.f_frsize as u64))
}

#[cfg(not(unix))]
fn statvfs_free_gib(_path: &Path) -> Result<u64> {
    Err(StatsError::UnsupportedPlatform)
}
