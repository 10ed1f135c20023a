//! Framework-agnostic editor session: owns the document text, the debounced
//! validation flow, the projected display forest, and the file lifecycle.
//! A host shell (TUI, GUI, tests) drives it with discrete events and renders
//! whatever it exposes; no widget types appear anywhere in here.

use crate::buffer::Buffer;
use crate::config::EditorConfig;
use crate::document::{self, ParseError, Path};
use crate::export;
use crate::search::{self, SearchOptions};
use crate::sync::{self, EditError, LocateError, TextRange};
use crate::tree::{find_node, project, DisplayNode};
use anyhow::{anyhow, bail, Result};
use std::fmt;
use std::path::{Path as FilePath, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Tri-state result of (re-)validating the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationStatus {
    Valid,
    Empty,
    Invalid {
        line: usize,
        column: usize,
        message: String,
    },
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Valid => write!(f, "✅ Valid JSON"),
            ValidationStatus::Empty => write!(f, "⚠️ Empty document"),
            ValidationStatus::Invalid { line, column, .. } => {
                write!(f, "❌ Error: line {}, column {}", line, column)
            }
        }
    }
}

/// Trailing-edge debounce as a generation counter: every text-changed event
/// bumps the generation and re-arms the deadline; a fire only counts if its
/// generation is still the latest, so a superseded arm never publishes.
pub struct Debounce {
    delay: Duration,
    generation: u64,
    armed: Option<(u64, Instant)>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            armed: None,
        }
    }

    /// Records a text-changed event; returns the new generation.
    pub fn note(&mut self, now: Instant) -> u64 {
        self.generation += 1;
        self.armed = Some((self.generation, now + self.delay));
        self.generation
    }

    /// Fires at most once per quiet period.
    pub fn due(&mut self, now: Instant) -> Option<u64> {
        match self.armed {
            Some((generation, deadline)) if now >= deadline && generation == self.generation => {
                self.armed = None;
                Some(generation)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

type ValidatedCallback = Box<dyn Fn(&ValidationStatus)>;
type ProjectedCallback = Box<dyn Fn(&[DisplayNode])>;

pub struct EditorSession {
    buffer: Buffer,
    config: EditorConfig,
    debounce: Debounce,
    status: ValidationStatus,
    forest: Vec<DisplayNode>,
    modified: bool,
    validated_callbacks: Vec<ValidatedCallback>,
    projected_callbacks: Vec<ProjectedCallback>,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        let delay = Duration::from_millis(config.validation_delay_ms);
        Self {
            buffer: Buffer::new(),
            config,
            debounce: Debounce::new(delay),
            status: ValidationStatus::Empty,
            forest: Vec::new(),
            modified: false,
            validated_callbacks: Vec::new(),
            projected_callbacks: Vec::new(),
        }
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn status(&self) -> &ValidationStatus {
        &self.status
    }

    pub fn forest(&self) -> &[DisplayNode] {
        &self.forest
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EditorConfig {
        &mut self.config
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn current_file(&self) -> Option<&PathBuf> {
        self.buffer.path()
    }

    pub fn title(&self) -> String {
        let mut title = String::from("jot");
        if let Some(path) = self.buffer.path() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                title.push_str(" - ");
                title.push_str(name);
            }
        }
        if self.modified {
            title.push_str(" *");
        }
        title
    }

    pub fn on_validated(&mut self, callback: impl Fn(&ValidationStatus) + 'static) {
        self.validated_callbacks.push(Box::new(callback));
    }

    pub fn on_projected(&mut self, callback: impl Fn(&[DisplayNode]) + 'static) {
        self.projected_callbacks.push(Box::new(callback));
    }

    /// Inserts typed text at a char offset; arms the debounce.
    pub fn insert_text(&mut self, at: usize, text: &str, now: Instant) {
        self.buffer.insert(at, text);
        self.text_changed(now);
    }

    /// Deletes a char range; arms the debounce.
    pub fn delete_range(&mut self, start: usize, end: usize, now: Instant) {
        self.buffer.remove(start, end);
        self.text_changed(now);
    }

    fn text_changed(&mut self, now: Instant) {
        self.modified = true;
        if self.config.auto_validate {
            let generation = self.debounce.note(now);
            debug!(generation, "text changed, validation armed");
        }
    }

    /// Drives the debounce; call once per event-loop tick. Returns true when
    /// a deferred validation ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some(generation) = self.debounce.due(now) {
            debug!(generation, "debounce fired");
            self.revalidate();
            true
        } else {
            false
        }
    }

    /// Immediate re-validation, e.g. for an explicit menu action. Disarms
    /// any pending debounce so the same state is not published twice.
    pub fn validate_now(&mut self) {
        self.debounce.cancel();
        self.revalidate();
    }

    fn revalidate(&mut self) {
        let text = self.buffer.text();
        if text.trim().is_empty() {
            self.status = ValidationStatus::Empty;
            self.forest.clear();
        } else {
            match document::parse(&text) {
                Ok(value) => {
                    self.status = ValidationStatus::Valid;
                    self.forest = project(&value);
                }
                Err(err) => {
                    debug!(line = err.line, column = err.column, "document invalid");
                    self.status = ValidationStatus::Invalid {
                        line: err.line,
                        column: err.column,
                        message: err.message,
                    };
                    self.forest.clear();
                }
            }
        }
        for callback in &self.validated_callbacks {
            callback(&self.status);
        }
        for callback in &self.projected_callbacks {
            callback(&self.forest);
        }
    }

    /// Pretty-prints the document (2-space indent). Fails without touching
    /// the text if it does not parse.
    pub fn format(&mut self) -> Result<(), ParseError> {
        let value = document::parse(&self.buffer.text())?;
        self.buffer.set_text(&document::serialize(&value, true));
        self.modified = true;
        self.validate_now();
        Ok(())
    }

    /// Strips all insignificant whitespace from the document.
    pub fn minify(&mut self) -> Result<(), ParseError> {
        let value = document::parse(&self.buffer.text())?;
        self.buffer.set_text(&document::serialize(&value, false));
        self.modified = true;
        self.validate_now();
        Ok(())
    }

    /// Maps a tree-row activation to a text range. Containers anchor on
    /// their nearest leaf descendant, like the original tree view did.
    pub fn resolve_selection(&self, path: &Path) -> Result<TextRange, LocateError> {
        let not_located = || LocateError::NotFound {
            target: path.to_string(),
            occurrence: 0,
        };
        let node = find_node(&self.forest, path).ok_or_else(not_located)?;
        let anchor = if node.is_leaf() {
            node
        } else {
            node.first_leaf().ok_or_else(not_located)?
        };
        let repr = anchor.leaf_value_repr.as_deref().ok_or_else(not_located)?;
        let result = sync::locate(
            &self.buffer.text(),
            repr,
            anchor.key_name.as_deref(),
            anchor.occurrence_index,
        );
        if result.is_err() {
            warn!(path = %path, "selection not located in text");
        }
        result
    }

    /// Applies an in-place tree edit and replaces the whole document with
    /// the re-serialized result. On error the text is left untouched.
    pub fn apply_node_edit(&mut self, path: &Path, new_literal: &str) -> Result<(), EditError> {
        let new_text = sync::apply_edit(&self.buffer.text(), path, new_literal)?;
        self.buffer.set_text(&new_text);
        self.modified = true;
        debug!(path = %path, "node edit applied");
        self.validate_now();
        Ok(())
    }

    /// Forward search from `from`, wrapping to the start on a miss.
    pub fn find_next_wrapping(
        &self,
        needle: &str,
        from: usize,
        opts: &SearchOptions,
    ) -> Option<TextRange> {
        let text = self.buffer.text();
        search::find_next(&text, needle, from, opts)
            .or_else(|| search::find_next(&text, needle, 0, opts))
    }

    pub fn count_occurrences(&self, needle: &str, opts: &SearchOptions) -> usize {
        search::count_occurrences(&self.buffer.text(), needle, opts)
    }

    /// Replaces every match; returns the replacement count.
    pub fn replace_all(
        &mut self,
        needle: &str,
        replacement: &str,
        opts: &SearchOptions,
        now: Instant,
    ) -> usize {
        let (new_text, count) = search::replace_all(&self.buffer.text(), needle, replacement, opts);
        if count > 0 {
            self.buffer.set_text(&new_text);
            self.text_changed(now);
        }
        count
    }

    pub fn export_xml(&self) -> Result<String, ParseError> {
        let value = document::parse(&self.buffer.text())?;
        Ok(export::to_xml(&value))
    }

    pub fn export_yaml(&self) -> Result<String, ParseError> {
        let value = document::parse(&self.buffer.text())?;
        Ok(export::to_yaml(&value))
    }

    pub fn open_file(&mut self, path: &FilePath) -> Result<()> {
        self.buffer.load_file(path)?;
        self.modified = false;
        self.config.add_recent_file(path);
        debug!(path = %path.display(), "file opened");
        self.validate_now();
        Ok(())
    }

    pub fn save(&mut self) -> Result<PathBuf> {
        let path = self
            .buffer
            .path()
            .cloned()
            .ok_or_else(|| anyhow!("no file path set; use save-as"))?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_as(&mut self, path: &FilePath) -> Result<()> {
        self.buffer.set_path(path);
        self.save_to(path)
    }

    fn save_to(&mut self, path: &FilePath) -> Result<()> {
        let text = self.buffer.text();
        if let Err(err) = document::parse(&text) {
            bail!("refusing to save invalid JSON: {}", err);
        }
        std::fs::write(path, &text)?;
        self.modified = false;
        self.config.add_recent_file(path);
        debug!(path = %path.display(), "file saved");
        Ok(())
    }

    /// Clears the document, its file association, and the tree.
    pub fn close_document(&mut self) {
        self.buffer.set_text("");
        self.buffer.clear_path();
        self.modified = false;
        self.validate_now();
    }
}
