//! 极简系统资源显示库
//!
//! 周期性读取各核心 CPU 计数、空闲/缓存内存与挂载点剩余空间，并以纯文本行绘制到任意表面。

pub mod monitor;
pub mod render;
pub mod stats;
pub mod usage;

// 重新导出主要的公共类型
pub use monitor::{Config, Monitor};
pub use render::{Color, Line, Surface, TerminalSurface, window_dimensions};
pub use stats::{CoreCounters, DiskSnapshot, MemorySnapshot, ProcSampler, Sampler};
pub use usage::compute_usage;
