use anyhow::Result;
use ropey::Rope;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Rope-backed document text. All offsets on this API are char offsets,
/// matching `TextRange` as produced by the occurrence resolver.
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            path: None,
        }
    }

    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        self.rope = Rope::from_reader(BufReader::new(File::open(path)?))?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Replaces the whole document, e.g. after format/minify/edit-apply.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn get_line(&self, line_idx: usize) -> String {
        if line_idx >= self.rope.len_lines() {
            return String::new();
        }
        // Strip the trailing newline; the renderer owns line breaks.
        let line = self.rope.line(line_idx).to_string();
        line.trim_end_matches(['\n', '\r']).to_string()
    }

    pub fn visible_lines(&self, start_line: usize, count: usize) -> Vec<String> {
        (start_line..start_line.saturating_add(count))
            .take_while(|&i| i < self.line_count())
            .map(|i| self.get_line(i))
            .collect()
    }

    pub fn line_to_char(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    pub fn char_to_line(&self, char_idx: usize) -> usize {
        self.rope.char_to_line(char_idx.min(self.rope.len_chars()))
    }

    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let char_idx = char_idx.min(self.rope.len_chars());
        self.rope.insert(char_idx, text);
    }

    pub fn remove(&mut self, start: usize, end: usize) {
        let start = start.min(self.rope.len_chars());
        let end = end.min(self.rope.len_chars());
        if start < end {
            self.rope.remove(start..end);
        }
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        let start = start.min(self.rope.len_chars());
        let end = end.min(self.rope.len_chars());
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn set_path(&mut self, path: &Path) {
        self.path = Some(path.to_path_buf());
    }

    pub fn clear_path(&mut self) {
        self.path = None;
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}
