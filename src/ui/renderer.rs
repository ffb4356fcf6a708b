//! Presentation layer: double-buffered, diff-based terminal renderer.
//!
//! How it works:
//!   1. Paint the scene into the RGBA `PixelBuffer` (see `draw`)
//!   2. Downsample it into `front` as upper-half-block cells: each cell shows
//!      a `ppc`-wide, `2 * ppc`-tall pixel block (top half = fg, bottom = bg)
//!   3. Overlay HUD, help row and, when open, the dialog box
//!   4. Compare each cell with `back` (previous frame) and only emit
//!      terminal commands for cells that changed, batched with `queue!`
//!   5. Swap front/back

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::DisplayConfig;
use crate::sim::world::{Phase, WorldState};

use super::draw;
use super::surface::{PixelBuffer, Rgba, Surface};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: [u8; 16],  // up to 16 bytes (supports ZWJ emoji sequences)
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells.
    ///
    /// Using the same RGB for `Clear(ClearType::All)` and every blank cell
    /// keeps VTE inter-row gap pixels the same colour as the cells.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = bg;
        cell
    }

    fn from_char_wide(c: char, fg: Color, bg: Color) -> Self {
        Cell { wide: true, ..Self::from_char(c, fg, bg) }
    }

    fn wide_cont(bg: Color) -> Self {
        Cell { ch: [0; 16], ch_len: 0, bg, cont: true, ..Self::BLANK }
    }

    /// Append a zero-width codepoint (variation selector, ZWJ, joined glyph).
    fn push_char(&mut self, c: char) {
        let mut tmp = [0u8; 4];
        let bytes = c.encode_utf8(&mut tmp).as_bytes();
        let start = self.ch_len as usize;
        let end = start + bytes.len();
        if end <= self.ch.len() {
            self.ch[start..end].copy_from_slice(bytes);
            self.ch_len = end as u8;
        }
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or(" ")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn fill_row(&mut self, y: usize, x0: usize, x1: usize, bg: Color) {
        for x in x0..x1.min(self.width) {
            self.set(x, y, Cell::from_char(' ', Color::White, bg));
        }
    }

    /// Write `s` at (x, y) using at most `max_w` columns. Wide glyphs take
    /// two columns; zero-width codepoints and ZWJ-joined glyphs are folded
    /// into the preceding cell. Returns the columns used.
    fn put_text(&mut self, x: usize, y: usize, s: &str, max_w: usize, fg: Color, bg: Color) -> usize {
        let mut used = 0;
        let mut last: Option<usize> = None;
        let mut join = false;
        for ch in s.chars() {
            let w = char_width(ch);
            if w == 0 || join {
                if let Some(col) = last {
                    if col < self.width && y < self.height {
                        self.cells[y * self.width + col].push_char(ch);
                    }
                }
                join = ch == ZWJ;
                continue;
            }
            let col = x + used;
            if used + w > max_w || col + w > self.width {
                break;
            }
            if w == 2 {
                self.set(col, y, Cell::from_char_wide(ch, fg, bg));
                self.set(col + 1, y, Cell::wide_cont(bg));
            } else {
                self.set(col, y, Cell::from_char(ch, fg, bg));
            }
            last = Some(col);
            used += w;
        }
        used
    }
}

// ── Text layout ──

const ZWJ: char = '\u{200D}';
const ELLIPSIS: &str = "…";

/// Terminal column width of a glyph: 0 for joiners/variation selectors,
/// 2 for emoji and East Asian wide ranges, 1 otherwise.
pub fn char_width(c: char) -> usize {
    match c as u32 {
        0x200B..=0x200D | 0xFE00..=0xFE0F | 0x0300..=0x036F => 0,
        0x1100..=0x115F
        | 0x2600..=0x27BF
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFF60
        | 0x1F000..=0x10FFFF => 2,
        _ => 1,
    }
}

pub fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Word-wrap `text` to `width` columns. `\n` always breaks; blank lines and
/// leading indentation of each paragraph are kept; words longer than the
/// width are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    if width == 0 {
        return out;
    }
    for para in text.split('\n') {
        let indent = para.len() - para.trim_start_matches(' ').len();
        let mut line = String::new();
        let mut line_w = 0;
        if indent < width {
            line.push_str(&para[..indent]);
            line_w = indent;
        }
        let mut fresh = true;
        for word in para.split_whitespace() {
            let word_w = str_width(word);
            if !fresh && line_w + 1 + word_w > width {
                out.push(std::mem::take(&mut line));
                line_w = 0;
                fresh = true;
            }
            if fresh && line_w + word_w > width {
                // Indent does not fit alongside the first word.
                line.clear();
                line_w = 0;
            }
            if word_w > width {
                for ch in word.chars() {
                    let cw = char_width(ch);
                    if line_w + cw > width && line_w > 0 {
                        out.push(std::mem::take(&mut line));
                        line_w = 0;
                    }
                    line.push(ch);
                    line_w += cw;
                }
                fresh = false;
                continue;
            }
            if !fresh {
                line.push(' ');
                line_w += 1;
            }
            line.push_str(word);
            line_w += word_w;
            fresh = false;
        }
        if fresh {
            line.clear();
        }
        out.push(line);
    }
    out
}

/// Wrapped dialog lines that fit `max_lines`; overflow ends in an ellipsis line.
pub fn layout_dialog(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines = wrap_text(text, width);
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    if lines.len() > max_lines {
        lines.truncate(max_lines.saturating_sub(1));
        if max_lines > 0 {
            lines.push(ELLIPSIS.to_string());
        }
    }
    lines
}

// ── Renderer ──

/// Vertical layout
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 1;

const HALF_BLOCK: char = '▀';
const BACKDROP: Rgba = Rgba::hex(0x161623);

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const DIALOG_BG: Color = Color::Rgb { r: 16, g: 16, b: 28 };
const DIALOG_BORDER: Color = Color::Rgb { r: 255, g: 220, b: 50 };
const DIALOG_TEXT: Color = Color::Rgb { r: 230, g: 230, b: 230 };
const HELP_FG: Color = Color::DarkGrey;

const DIALOG_MAX_W: usize = 72;
const DIALOG_MAX_H: usize = 18;
const HELP: &str = " WASD/Arrows: move  Space/Enter: talk  Esc/click: close  Q: quit";

/// A screen rectangle in terminal cells.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub col: usize,
    pub row: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub fn contains(&self, col: usize, row: usize) -> bool {
        col >= self.col && col < self.col + self.w && row >= self.row && row < self.row + self.h
    }
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    pixels: PixelBuffer,
    ppc: u32,
    last_phase: Option<Phase>,
    dialog_rect: Option<Rect>,
    key_release: bool,
}

impl Renderer {
    pub fn new(display: &DisplayConfig) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            pixels: PixelBuffer::new(display.viewport_width, display.viewport_height),
            ppc: display.pixels_per_cell.max(1),
            last_phase: None,
            dialog_rect: None,
            key_release: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    /// Ask the terminal to report key releases. Returns whether it will.
    pub fn enable_key_release(&mut self) -> io::Result<bool> {
        if !terminal::supports_keyboard_enhancement()? {
            return Ok(false);
        }
        execute!(
            self.writer,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
        self.key_release = true;
        Ok(true)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.key_release {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
            self.key_release = false;
        }
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Whether terminal cell (col, row) lies on the open dialog box.
    pub fn dialog_hit(&self, col: usize, row: usize) -> bool {
        self.dialog_rect.is_some_and(|r| r.contains(col, row))
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → full repaint for a clean transition
        let phase = world.phase();
        if self.last_phase != Some(phase) {
            self.back.cells.fill(Cell::INVALID);
            self.last_phase = Some(phase);
        }

        self.compose(world);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
    }

    /// Map area in terminal cells, clipped to the terminal (HUD above, help below).
    fn map_area(&self) -> (usize, usize) {
        let cols = (self.pixels.width() / self.ppc) as usize;
        let rows = (self.pixels.height() / (2 * self.ppc)) as usize;
        (
            cols.min(self.term_w),
            rows.min(self.term_h.saturating_sub(MAP_ROW + 1)),
        )
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colours; ResetColor would fall back to the
        // terminal's own default and leave gap artifacts.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Skip continuation cells (right half of wide emoji)
                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                // For wide cells, also check if the continuation changed
                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    // Wide char printed: cursor advanced 2 columns
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, world: &WorldState) {
        self.front.clear();
        draw::render_world(&mut self.pixels, world);

        let (map_cols, map_rows) = self.map_area();
        self.compose_hud(world);
        self.compose_scene(map_cols, map_rows);

        let help_row = MAP_ROW + map_rows;
        if help_row < self.front.height {
            self.front.put_text(0, help_row, HELP, self.term_w, HELP_FG, Cell::BASE_BG);
        }

        self.dialog_rect = None;
        if world.phase() == Phase::Dialog {
            let name = world.speaker_name().unwrap_or("");
            self.compose_dialog(name, world.dialog.text(), map_cols, map_rows);
        }
    }

    fn compose_hud(&mut self, world: &WorldState) {
        if self.front.height == 0 {
            return;
        }
        self.front.fill_row(HUD_ROW, 0, self.term_w, HUD_BG);
        let status = match (world.phase(), world.nearby_npc()) {
            (Phase::Dialog, _) => format!("Talking to {}", world.speaker_name().unwrap_or("?")),
            (Phase::Running, Some(npc)) => format!("◆ {} is nearby  [Space] talk", npc.name),
            (Phase::Running, None) => String::new(),
        };
        let hud = format!(" RESUME QUEST  ({}, {})  {}", world.player.x, world.player.y, status);
        self.front.put_text(0, HUD_ROW, &hud, self.term_w, Color::White, HUD_BG);
    }

    /// Downsample the pixel buffer: one half-block per `ppc × 2·ppc` block.
    fn compose_scene(&mut self, cols: usize, rows: usize) {
        let ppc = self.ppc;
        for row in 0..rows {
            let py = row as u32 * 2 * ppc;
            for col in 0..cols {
                let px = col as u32 * ppc;
                let top = self.pixels.average(px, py, ppc, ppc, BACKDROP);
                let bottom = self.pixels.average(px, py + ppc, ppc, ppc, BACKDROP);
                self.front.set(col, MAP_ROW + row, Cell::from_char(HALF_BLOCK, term_color(top), term_color(bottom)));
            }
        }
    }

    /// Bordered box near the bottom of the map, titled with the speaker.
    fn compose_dialog(&mut self, name: &str, text: &str, map_cols: usize, map_rows: usize) {
        let box_w = map_cols.saturating_sub(4).min(DIALOG_MAX_W);
        let box_h = map_rows.saturating_sub(2).min(DIALOG_MAX_H);
        if box_w < 8 || box_h < 3 {
            return;
        }
        let rect = Rect {
            col: (map_cols - box_w) / 2,
            row: MAP_ROW + map_rows - box_h - 1,
            w: box_w,
            h: box_h,
        };

        let (x0, y0) = (rect.col, rect.row);
        let (x1, y1) = (x0 + box_w - 1, y0 + box_h - 1);
        for y in y0..=y1 {
            self.front.fill_row(y, x0, x1 + 1, DIALOG_BG);
        }

        // Border
        for x in x0 + 1..x1 {
            self.front.set(x, y0, Cell::from_char('─', DIALOG_BORDER, DIALOG_BG));
            self.front.set(x, y1, Cell::from_char('─', DIALOG_BORDER, DIALOG_BG));
        }
        for y in y0 + 1..y1 {
            self.front.set(x0, y, Cell::from_char('│', DIALOG_BORDER, DIALOG_BG));
            self.front.set(x1, y, Cell::from_char('│', DIALOG_BORDER, DIALOG_BG));
        }
        self.front.set(x0, y0, Cell::from_char('┌', DIALOG_BORDER, DIALOG_BG));
        self.front.set(x1, y0, Cell::from_char('┐', DIALOG_BORDER, DIALOG_BG));
        self.front.set(x0, y1, Cell::from_char('└', DIALOG_BORDER, DIALOG_BG));
        self.front.set(x1, y1, Cell::from_char('┘', DIALOG_BORDER, DIALOG_BG));

        // Title and close hint sit on the border
        let title = format!(" {name} ");
        self.front.put_text(x0 + 2, y0, &title, box_w.saturating_sub(4), DIALOG_BORDER, DIALOG_BG);
        let hint = " Esc / Space ";
        if str_width(&title) + str_width(hint) + 6 <= box_w {
            self.front.put_text(x1 - str_width(hint) - 1, y1, hint, box_w, HELP_FG, DIALOG_BG);
        }

        let inner_w = box_w - 4;
        let inner_h = box_h - 2;
        for (i, line) in layout_dialog(text, inner_w, inner_h).iter().enumerate() {
            self.front.put_text(x0 + 2, y0 + 1 + i, line, inner_w, DIALOG_TEXT, DIALOG_BG);
        }

        self.dialog_rect = Some(rect);
    }
}

fn term_color(c: Rgba) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}
