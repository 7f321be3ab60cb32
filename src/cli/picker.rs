// src/cli/picker.rs - Searchable target menu
use std::io;
use console::{Key, Term};
use dialoguer::theme::ColorfulTheme;
use tracing::debug;

use crate::core::Target;
use crate::error::{MakesError, MakesResult};

/// Selection state of the menu, independent of the terminal
#[derive(Debug)]
pub struct PickerState<'a> {
    items: &'a [Target],
    query: String,
    matches: Vec<usize>,
    cursor: usize,
    offset: usize,
    size: usize,
}

impl<'a> PickerState<'a> {
    pub fn new(items: &'a [Target], size: usize) -> Self {
        let mut state = Self {
            items,
            query: String::new(),
            matches: Vec::new(),
            cursor: 0,
            offset: 0,
            size: size.max(1),
        };
        state.refilter();
        state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn pop_char(&mut self) {
        if self.query.pop().is_some() {
            self.refilter();
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.matches.len() {
            self.cursor += 1;
        }
        if self.cursor >= self.offset + self.size {
            self.offset = self.cursor + 1 - self.size;
        }
    }

    /// Index into the item slice of the highlighted entry
    pub fn selected(&self) -> Option<usize> {
        self.matches.get(self.cursor).copied()
    }

    /// Visible page as `(item, is_active)` pairs
    pub fn page(&self) -> impl Iterator<Item = (&'a Target, bool)> + '_ {
        let items = self.items;
        let cursor = self.cursor;
        self.matches
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(self.size)
            .map(move |(pos, &index)| (&items[index], pos == cursor))
    }

    fn refilter(&mut self) {
        let query = &self.query;
        self.matches = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, target)| target.matches(query))
            .map(|(index, _)| index)
            .collect();
        self.cursor = 0;
        self.offset = 0;
    }
}

/// Interactive menu over a list of targets
pub struct TargetPicker<'a> {
    label: String,
    items: &'a [Target],
    size: usize,
    theme: ColorfulTheme,
    term: Term,
}

impl<'a> TargetPicker<'a> {
    pub fn new(label: impl Into<String>, items: &'a [Target], max_size: usize) -> Self {
        Self {
            label: label.into(),
            items,
            size: max_size.min(items.len()),
            theme: ColorfulTheme::default(),
            term: Term::stderr(),
        }
    }

    /// Show the menu until a target is chosen; Esc or Ctrl-C cancels
    pub fn interact(&self) -> MakesResult<usize> {
        if self.items.is_empty() {
            return Err(MakesError::NoTargets);
        }
        if !self.term.is_term() {
            return Err(MakesError::NotATerminal);
        }

        self.term.hide_cursor()?;
        let result = self.event_loop();
        self.term.show_cursor()?;

        result
    }

    fn event_loop(&self) -> MakesResult<usize> {
        let mut state = PickerState::new(self.items, self.size);
        let mut height = 0;

        loop {
            self.clear(height)?;
            let frame = self.render(&state);
            let width = self.term.size().1 as usize;
            height = frame.iter().map(|line| wrapped_rows(line, width)).sum();
            for line in &frame {
                self.term.write_line(line)?;
            }

            let key = match self.term.read_key() {
                Ok(key) => key,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => Key::Escape,
                Err(e) => return Err(e.into()),
            };

            match key {
                Key::Enter => {
                    if let Some(index) = state.selected() {
                        self.clear(height)?;
                        self.term.write_line(&format!(
                            "{} {}",
                            self.theme.success_prefix,
                            self.theme.values_style.apply_to(&self.items[index].name)
                        ))?;
                        return Ok(index);
                    }
                }
                Key::Escape => {
                    self.clear(height)?;
                    debug!("Selection cancelled");
                    return Err(MakesError::Cancelled);
                }
                Key::ArrowUp => state.move_up(),
                Key::ArrowDown | Key::Tab => state.move_down(),
                Key::Backspace => state.pop_char(),
                Key::Char(c) if !c.is_control() => state.push_char(c),
                _ => {}
            }
        }
    }

    fn clear(&self, height: usize) -> io::Result<()> {
        if height > 0 {
            self.term.clear_last_lines(height)?;
        }
        Ok(())
    }

    fn render(&self, state: &PickerState<'_>) -> Vec<String> {
        let theme = &self.theme;
        let mut lines = vec![format!(
            "{} {} {}",
            theme.prompt_prefix,
            theme.prompt_style.apply_to(&self.label),
            theme.hint_style.apply_to(format!("Search: {}", state.query()))
        )];

        for (target, active) in state.page() {
            if active {
                lines.push(format!(
                    "{} {}",
                    theme.active_item_prefix,
                    theme.active_item_style.apply_to(&target.name)
                ));
            } else {
                lines.push(format!(
                    "{} {}",
                    theme.inactive_item_prefix,
                    theme.inactive_item_style.apply_to(&target.name)
                ));
            }
        }

        match state.selected() {
            Some(index) => {
                let target = &self.items[index];
                lines.push("----".to_string());
                lines.push(format!("Help: {}", target.help));
                lines.push(target.status());
            }
            None => lines.push(theme.hint_style.apply_to("No matching targets").to_string()),
        }

        lines
    }
}

/// Terminal rows a line occupies once wrapped at `width` columns
fn wrapped_rows(line: &str, width: usize) -> usize {
    let columns = console::measure_text_width(line);
    if width == 0 || columns == 0 {
        return 1;
    }
    columns.div_ceil(width)
}
