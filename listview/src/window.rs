use crate::renderer::Renderer;
use crate::{LayoutSettings, VisibleWindow};

/// Remembers the last window handed to the host.
///
/// `update` reports whether instances must be rebound, so recomputing the window without any
/// state change never causes a rebind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowTracker {
    current: Option<VisibleWindow>,
}

impl WindowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<VisibleWindow> {
        self.current
    }

    /// Stores `next` and returns `true` when it differs from the previous window.
    pub fn update(&mut self, next: VisibleWindow) -> bool {
        if self.current == Some(next) {
            return false;
        }
        vtrace!(
            first = next.first,
            count = next.count,
            total = next.total,
            "WindowTracker::update"
        );
        self.current = Some(next);
        true
    }

    /// Forces the next `update` to report a change.
    pub fn invalidate(&mut self) {
        self.current = None;
    }
}

/// Upper bound of the window size for `viewport`, overscan and minimum included.
pub(crate) fn max_window_len(r: &dyn Renderer, viewport: u32, settings: &LayoutSettings) -> usize {
    let total = r.count();
    let overscan = settings
        .overscan
        .saturating_mul(2)
        .saturating_mul(r.items_per_line());
    // Padding to the minimum adds whole lines, so it may overshoot by less than one line.
    let padded_min = match settings.min_visible {
        0 => 0,
        min => min.saturating_add(r.items_per_line().max(1) - 1),
    };
    r.max_visible_items(viewport)
        .saturating_add(overscan)
        .max(padded_min)
        .min(total)
}

pub(crate) fn compute_window(
    r: &dyn Renderer,
    scroll_offset: u64,
    viewport: u32,
    settings: &LayoutSettings,
) -> VisibleWindow {
    let total = r.count();
    let Some(span) = r.visible_lines(scroll_offset, viewport) else {
        return VisibleWindow::EMPTY;
    };
    let looped = r.is_looped(viewport);
    let lines = r.line_count() as i64;
    let per_line = r.items_per_line();
    let overscan = settings.overscan as i64;

    let mut first_line = span.first.saturating_sub(overscan);
    let mut last_line = span.last.saturating_add(overscan);
    if !looped {
        first_line = first_line.max(0);
        last_line = last_line.min(lines - 1);
    }

    let first_v = line_to_virtual_index(first_line, lines, per_line, total);
    let end_v = line_to_virtual_index(last_line + 1, lines, per_line, total);
    let span_len = (end_v - first_v).max(0) as usize;

    let min = settings.min_visible.min(total);
    let max = max_window_len(r, viewport, settings);
    if looped {
        return VisibleWindow {
            first: first_v as isize,
            count: span_len.min(max).max(min).min(total),
            total,
        };
    }

    // Pad up to `min_visible` with whole lines, after the span first, so tile windows stay
    // line aligned.
    let per_line = per_line.max(1);
    let mut first = first_v.max(0) as usize;
    let mut end = first.saturating_add(span_len.min(max)).min(total);
    while end - first < min {
        if end < total {
            end = (end + per_line).min(total);
        } else {
            first = first.saturating_sub(per_line);
        }
    }

    VisibleWindow {
        first: first as isize,
        count: end - first,
        total,
    }
}

/// First virtual index of virtual line `line`.
fn line_to_virtual_index(line: i64, lines: i64, per_line: usize, total: usize) -> i64 {
    let cycle = line.div_euclid(lines.max(1));
    let phys = line.rem_euclid(lines.max(1));
    cycle * total as i64 + phys * per_line as i64
}
