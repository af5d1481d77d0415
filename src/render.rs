use crate::stats::{DiskSnapshot, MemorySnapshot};
use crossterm::style::{self, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use crossterm::tty::IsTty;
use crossterm::{cursor, execute, queue};
use std::io::{self, Stdout, Write};
use std::path::Path;

// 布局常量（像素）
pub const LINE_HEIGHT: u32 = 20;
pub const ADDITIONAL_LINES: u32 = 3;
pub const BASE_OFFSET: u32 = 30;
pub const MIN_WIDTH: u32 = 150;
pub const TEXT_X: u32 = 20;
pub const CHAR_WIDTH: u32 = 8;
pub const VERSION_Y: u32 = 15;
pub const VERSION_INSET: u32 = 60;

/// 最长的核心行，用于估算窗口宽度
const WIDEST_LINE: &str = "Core 00: 100%";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const TITLE: &str = "BeanMon";

/// 固定调色板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// 各核心使用率
    Cyan,
    /// 内存
    Yellow,
    /// 磁盘
    White,
    /// 版本号
    Gray,
}

impl Color {
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Color::Cyan => "cyan",
            Color::Yellow => "yellow",
            Color::White => "white",
            Color::Gray => "gray",
        }
    }
}

impl From<Color> for style::Color {
    fn from(color: Color) -> Self {
        match color {
            Color::Cyan => style::Color::Cyan,
            Color::Yellow => style::Color::Yellow,
            Color::White => style::Color::White,
            Color::Gray => style::Color::Grey,
        }
    }
}

/// 一行待绘制的文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub x: u32,
    pub y: u32,
    pub text: String,
    pub color: Color,
}

impl Line {
    fn new(x: u32, y: u32, text: String, color: Color) -> Self {
        Self { x, y, text, color }
    }
}

/// 根据核心数计算窗口尺寸 `(宽, 高)`
pub fn window_dimensions(core_count: usize) -> (u32, u32) {
    let estimated = CHAR_WIDTH * (WIDEST_LINE.len() as u32 + 1) + 40;
    let width = estimated.max(MIN_WIDTH);
    let rows = (core_count as u32).saturating_add(ADDITIONAL_LINES);
    let height = BASE_OFFSET.saturating_add(rows.saturating_mul(LINE_HEIGHT));
    (width, height)
}

/// 磁盘行文本，例如 `/ 42GiB`
pub fn format_disk(mount: &Path, disk: &DiskSnapshot) -> String {
    format!("{} {}GiB", mount.display(), disk.free_gib)
}

/// 组装一帧的全部文本行
pub fn compose(usages: &[u8], memory: &MemorySnapshot, disk_text: &str, width: u32) -> Vec<Line> {
    let mut lines = Vec::with_capacity(usages.len() + 4);

    for (i, usage) in usages.iter().enumerate() {
        lines.push(Line::new(
            TEXT_X,
            BASE_OFFSET + i as u32 * LINE_HEIGHT,
            format!("Core {i}: {usage}%"),
            Color::Cyan,
        ));
    }

    let text_y = BASE_OFFSET + usages.len() as u32 * LINE_HEIGHT;
    lines.push(Line::new(
        TEXT_X,
        text_y,
        format!("Free RAM: {} MiB", memory.free_mib),
        Color::Yellow,
    ));
    lines.push(Line::new(
        TEXT_X,
        text_y + LINE_HEIGHT,
        format!("Cached RAM: {} MiB", memory.cached_mib),
        Color::Yellow,
    ));
    lines.push(Line::new(
        TEXT_X,
        text_y + 2 * LINE_HEIGHT,
        disk_text.to_string(),
        Color::White,
    ));
    lines.push(Line::new(
        width.saturating_sub(VERSION_INSET),
        VERSION_Y,
        format!("v {VERSION}"),
        Color::Gray,
    ));

    lines
}

/// 绘制表面：任何能在指定位置画一行彩色文本的后端
pub trait Surface {
    fn clear(&mut self) -> io::Result<()>;

    fn draw_line(&mut self, x: u32, y: u32, text: &str, color: Color) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    fn window_dimensions(&self, core_count: usize) -> (u32, u32) {
        window_dimensions(core_count)
    }
}

/// 基于 crossterm 的终端表面，像素坐标按字符格折算
pub struct TerminalSurface {
    out: Stdout,
}

impl TerminalSurface {
    /// 获取终端；标准输出不是终端时失败
    pub fn acquire() -> io::Result<Self> {
        let mut out = io::stdout();
        if !out.is_tty() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "标准输出不是终端",
            ));
        }

        enter(&mut out)?;
        Ok(Self { out })
    }

    #[inline]
    fn cell(x: u32, y: u32) -> (u16, u16) {
        let col = (x / CHAR_WIDTH).min(u16::MAX as u32) as u16;
        let row = (y / LINE_HEIGHT).min(u16::MAX as u32) as u16;
        (col, row)
    }
}

/// 进入备用屏幕、隐藏光标并设置标题
fn enter<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, EnterAlternateScreen, cursor::Hide, SetTitle(TITLE))
}

impl Surface for TerminalSurface {
    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))
    }

    fn draw_line(&mut self, x: u32, y: u32, text: &str, color: Color) -> io::Result<()> {
        let (col, row) = Self::cell(x, y);
        queue!(
            self.out,
            cursor::MoveTo(col, row),
            SetForegroundColor(color.into()),
            Print(text),
            ResetColor
        )
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, cursor::Show, LeaveAlternateScreen);
    }
}
