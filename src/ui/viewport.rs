/// Scroll window over a list of lines (the text pane or the tree pane).
pub struct Viewport {
    pub start_line: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(start_line: usize, height: usize) -> Self {
        Self { start_line, height }
    }

    pub fn scroll_down(&mut self, max_lines: usize) {
        if self.start_line + 1 < max_lines {
            self.start_line += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.start_line = self.start_line.saturating_sub(1);
    }

    pub fn scroll_down_page(&mut self, max_lines: usize) {
        self.start_line = (self.start_line + self.height / 2).min(max_lines.saturating_sub(1));
    }

    pub fn scroll_up_page(&mut self) {
        self.start_line = self.start_line.saturating_sub(self.height / 2);
    }

    /// Scrolls the minimum amount needed to bring `line` into view.
    pub fn ensure_visible(&mut self, line: usize) {
        if line < self.start_line {
            self.start_line = line;
        } else if self.height > 0 && line >= self.start_line + self.height {
            self.start_line = line + 1 - self.height;
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.start_line && line < self.start_line + self.height
    }
}
