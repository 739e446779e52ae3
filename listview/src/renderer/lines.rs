use alloc::vec::Vec;

use crate::fenwick::PrefixSums;
use crate::renderer::Renderer;
use crate::{LayoutSettings, LineSpan};

/// Extents of the lines (rows for vertical lists) of a layout.
///
/// Offsets are relative to the start of the first line: padding is applied by the renderer.
pub trait LineMetrics {
    fn line_count(&self) -> usize;
    fn line_size(&self, line: usize) -> Option<u32>;
    /// Start of `line` including the spacing after every previous line.
    fn line_start(&self, line: usize) -> Option<u64>;
    /// Sum of all lines plus the spacing between them.
    fn content_size(&self) -> u64;
    /// The line containing `offset`, clamped to the last line.
    fn line_at(&self, offset: u64) -> Option<usize>;
    fn min_line_size(&self) -> u32;
    fn spacing(&self) -> u32;
}

/// Lines of one shared size. Every lookup is `O(1)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedLines {
    count: usize,
    size: u32,
    spacing: u32,
}

impl FixedLines {
    pub fn new(count: usize, size: u32, spacing: u32) -> Self {
        Self {
            count,
            size: size.max(1),
            spacing,
        }
    }

    fn step(&self) -> u64 {
        self.size as u64 + self.spacing as u64
    }
}

impl LineMetrics for FixedLines {
    fn line_count(&self) -> usize {
        self.count
    }

    fn line_size(&self, line: usize) -> Option<u32> {
        (line < self.count).then_some(self.size)
    }

    fn line_start(&self, line: usize) -> Option<u64> {
        (line < self.count).then(|| (line as u64).saturating_mul(self.step()))
    }

    fn content_size(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        (self.count as u64)
            .saturating_mul(self.step())
            .saturating_sub(self.spacing as u64)
    }

    fn line_at(&self, offset: u64) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let line = offset / self.step();
        Some(line.min(self.count as u64 - 1) as usize)
    }

    fn min_line_size(&self) -> u32 {
        self.size
    }

    fn spacing(&self) -> u32 {
        self.spacing
    }
}

/// Lines of individual sizes backed by prefix sums: `O(log n)` lookups and single-line updates.
///
/// The smallest line size is cached together with how many lines have it, so it is rescanned
/// only when the last such line grows.
#[derive(Clone, Debug, Default)]
pub struct VariableLines {
    sizes: Vec<u32>,
    sums: PrefixSums,
    spacing: u32,
    min_size: u32,
    min_lines: usize,
}

impl VariableLines {
    pub fn new(sizes: Vec<u32>, spacing: u32) -> Self {
        let sizes: Vec<u32> = sizes.into_iter().map(|s| s.max(1)).collect();
        let sums = PrefixSums::from_sizes(&sizes, spacing);
        let mut lines = Self {
            sizes,
            sums,
            spacing,
            min_size: 0,
            min_lines: 0,
        };
        lines.rescan_min();
        lines
    }

    fn rescan_min(&mut self) {
        self.min_size = self.sizes.iter().copied().min().unwrap_or(0);
        self.min_lines = self.sizes.iter().filter(|&&s| s == self.min_size).count();
    }

    /// Updates one line and returns the change of its extent.
    pub fn set_line_size(&mut self, line: usize, size: u32) -> i64 {
        let Some(cur) = self.sizes.get(line).copied() else {
            return 0;
        };
        let size = size.max(1);
        if cur == size {
            return 0;
        }
        self.sizes[line] = size;
        if size < self.min_size {
            self.min_size = size;
            self.min_lines = 1;
        } else if size == self.min_size {
            self.min_lines += 1;
        } else if cur == self.min_size {
            self.min_lines -= 1;
            if self.min_lines == 0 {
                self.rescan_min();
            }
        }
        let delta = size as i64 - cur as i64;
        self.sums.add(line, delta);
        delta
    }
}

impl LineMetrics for VariableLines {
    fn line_count(&self) -> usize {
        self.sums.len()
    }

    fn line_size(&self, line: usize) -> Option<u32> {
        self.sizes.get(line).copied()
    }

    fn line_start(&self, line: usize) -> Option<u64> {
        (line < self.sizes.len()).then(|| self.sums.prefix_sum(line))
    }

    fn content_size(&self) -> u64 {
        self.sums.total()
    }

    fn line_at(&self, offset: u64) -> Option<usize> {
        let n = self.sizes.len();
        if n == 0 {
            return None;
        }
        Some(self.sums.lower_bound(offset).min(n - 1))
    }

    fn min_line_size(&self) -> u32 {
        self.min_size.max(1)
    }

    fn spacing(&self) -> u32 {
        self.spacing
    }
}

/// Linear and tiled layouts: items are packed `per_line` at a time into lines.
///
/// A list is the one-item-per-line case. In looped mode the list repeats every
/// [`Renderer::loop_size`] units, with the spacing inserted between the last and the first item.
#[derive(Clone, Debug)]
pub struct LinesRenderer<L> {
    lines: L,
    count: usize,
    per_line: usize,
    padding_start: u32,
    padding_end: u32,
    looped: bool,
}

pub type FixedList = LinesRenderer<FixedLines>;
pub type VariableList = LinesRenderer<VariableLines>;
pub type FixedTiles = LinesRenderer<FixedLines>;
pub type VariableTiles = LinesRenderer<VariableLines>;

/// Number of tiles of `item_cross` that fit into `viewport_cross`.
pub fn tiles_per_line(viewport_cross: u32, item_cross: u32, cross_spacing: u32) -> usize {
    let item = item_cross.max(1) as u64 + cross_spacing as u64;
    let avail = viewport_cross as u64 + cross_spacing as u64;
    ((avail / item) as usize).max(1)
}

impl LinesRenderer<FixedLines> {
    /// Fixed-size tiles; `per_line = 1` yields a fixed-size list.
    pub fn fixed(count: usize, per_line: usize, size: u32, settings: &LayoutSettings) -> Self {
        let per_line = per_line.max(1);
        let lines = FixedLines::new(count.div_ceil(per_line), size, settings.spacing);
        Self::with_lines(lines, count, per_line, settings)
    }
}

impl LinesRenderer<VariableLines> {
    /// Variable-size tiles; a line is as large as its largest item.
    pub fn variable(item_sizes: &[u32], per_line: usize, settings: &LayoutSettings) -> Self {
        let per_line = per_line.max(1);
        let line_sizes = item_sizes
            .chunks(per_line)
            .map(|chunk| chunk.iter().copied().max().unwrap_or(1))
            .collect();
        let lines = VariableLines::new(line_sizes, settings.spacing);
        Self::with_lines(lines, item_sizes.len(), per_line, settings)
    }

    /// Recomputes the line holding `index` from the item sizes and returns the extent delta.
    pub fn refresh_line(&mut self, index: usize, item_sizes: &[u32]) -> i64 {
        if index >= self.count {
            return 0;
        }
        let line = index / self.per_line;
        let start = line * self.per_line;
        let end = (start + self.per_line).min(item_sizes.len());
        let size = item_sizes[start..end].iter().copied().max().unwrap_or(1);
        self.lines.set_line_size(line, size)
    }
}

impl<L: LineMetrics> LinesRenderer<L> {
    fn with_lines(lines: L, count: usize, per_line: usize, settings: &LayoutSettings) -> Self {
        Self {
            lines,
            count,
            per_line,
            padding_start: settings.padding_start,
            padding_end: settings.padding_end,
            looped: settings.looped,
        }
    }

    pub fn lines(&self) -> &L {
        &self.lines
    }

    pub fn line_of(&self, index: usize) -> usize {
        index / self.per_line
    }

    fn line_in_list(&self, offset: u64) -> Option<usize> {
        let ps = self.padding_start as u64;
        self.lines.line_at(offset.saturating_sub(ps))
    }

    fn virtual_line(&self, offset: u64, looped: bool) -> Option<i64> {
        if !looped {
            return self.line_in_list(offset).map(|l| l as i64);
        }
        let period = self.loop_size().max(1);
        let cycle = (offset / period) as i64;
        let line = self.line_in_list(offset % period)? as i64;
        Some(cycle * self.lines.line_count() as i64 + line)
    }

    fn virtual_line_start(&self, line: i64) -> Option<i64> {
        let lines = self.lines.line_count() as i64;
        if lines == 0 {
            return None;
        }
        let cycle = line.div_euclid(lines);
        let phys = line.rem_euclid(lines) as usize;
        let start = self.padding_start as u64 + self.lines.line_start(phys)?;
        Some(cycle * self.loop_size() as i64 + start as i64)
    }

    fn virtual_line_end(&self, line: i64) -> Option<i64> {
        let lines = self.lines.line_count() as i64;
        let size = self.lines.line_size(line.rem_euclid(lines.max(1)) as usize)?;
        Some(self.virtual_line_start(line)? + size as i64)
    }

    fn first_index_of_line(&self, line: i64) -> usize {
        let lines = self.lines.line_count().max(1) as i64;
        line.rem_euclid(lines) as usize * self.per_line
    }

    fn last_index_of_line(&self, line: i64) -> usize {
        let first = self.first_index_of_line(line);
        (first + self.per_line).min(self.count).saturating_sub(1)
    }
}

impl<L: LineMetrics> Renderer for LinesRenderer<L> {
    fn count(&self) -> usize {
        self.count
    }

    fn items_per_line(&self) -> usize {
        self.per_line
    }

    fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    fn item_position(&self, index: usize) -> Option<u64> {
        if index >= self.count {
            return None;
        }
        let start = self.lines.line_start(self.line_of(index))?;
        Some((self.padding_start as u64).saturating_add(start))
    }

    fn item_position_end(&self, index: usize) -> Option<u64> {
        let start = self.item_position(index)?;
        let size = self.lines.line_size(self.line_of(index))?;
        Some(start.saturating_add(size as u64))
    }

    fn item_extent(&self, index: usize) -> Option<u32> {
        if index >= self.count {
            return None;
        }
        self.lines.line_size(self.line_of(index))
    }

    fn first_visible_index(
        &self,
        scroll_offset: u64,
        viewport: u32,
        strict: bool,
    ) -> Option<usize> {
        let span = self.visible_lines(scroll_offset, viewport)?;
        let mut line = span.first;
        if strict && line < span.last {
            let scroll = self.validate_position(scroll_offset, viewport) as i64;
            if self.virtual_line_start(line)? < scroll {
                line += 1;
            }
        }
        Some(self.first_index_of_line(line))
    }

    fn last_visible_index(&self, scroll_offset: u64, viewport: u32, strict: bool) -> Option<usize> {
        let span = self.visible_lines(scroll_offset, viewport)?;
        let mut line = span.last;
        if strict && line > span.first {
            let scroll = self.validate_position(scroll_offset, viewport) as i64;
            if self.virtual_line_end(line)? > scroll + viewport as i64 {
                line -= 1;
            }
        }
        Some(self.last_index_of_line(line))
    }

    fn max_visible_items(&self, viewport: u32) -> usize {
        if self.count == 0 {
            return 0;
        }
        let step = self.lines.min_line_size() as u64 + self.lines.spacing() as u64;
        let lines = (viewport as u64).div_ceil(step.max(1)) as usize + 1;
        lines.saturating_mul(self.per_line).min(self.count)
    }

    fn list_size(&self) -> u64 {
        (self.padding_start as u64)
            .saturating_add(self.lines.content_size())
            .saturating_add(self.padding_end as u64)
    }

    fn loop_size(&self) -> u64 {
        self.list_size().saturating_add(self.lines.spacing() as u64)
    }

    fn is_looped(&self, viewport: u32) -> bool {
        self.looped && self.count > 0 && self.list_size() > viewport as u64
    }

    fn validate_position(&self, position: u64, viewport: u32) -> u64 {
        if self.is_looped(viewport) {
            return position % self.loop_size().max(1);
        }
        position.min(self.list_size().saturating_sub(viewport as u64))
    }

    fn visible_lines(&self, scroll_offset: u64, viewport: u32) -> Option<LineSpan> {
        if self.count == 0 {
            return None;
        }
        let looped = self.is_looped(viewport);
        let scroll = self.validate_position(scroll_offset, viewport);
        let view = viewport.max(1) as u64;
        let first = self.virtual_line(scroll, looped)?;
        let last = self.virtual_line(scroll.saturating_add(view - 1), looped)?;
        Some(LineSpan {
            first,
            last: last.max(first),
        })
    }

    fn virtual_item_start(&self, virtual_index: isize) -> Option<i64> {
        if self.count == 0 {
            return None;
        }
        let count = self.count as isize;
        let cycle = virtual_index.div_euclid(count) as i64;
        let index = virtual_index.rem_euclid(count) as usize;
        let start = self.item_position(index)? as i64;
        Some(cycle * self.loop_size() as i64 + start)
    }
}
