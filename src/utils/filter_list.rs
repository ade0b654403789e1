//! A scrollable, filterable list rendered as plain text lines.
//!
//! The widget knows nothing about the terminal: it consumes key events and
//! produces the lines to draw for its current viewport size. Layout:
//!
//! ```text
//! Select the board                      <- title
//! 3 items                               <- status / filter line
//! ▸ Arduino Uno  arduino:avr:uno        <- items, one per line
//!   Arduino Mega  arduino:avr:mega
//! ↑/↓ move • / filter • enter select • q quit
//! ```

use std::borrow::Cow;

use console::{style, truncate_str};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Lines taken by the title, the status line and the help line.
const CHROME_LINES: usize = 3;

const HELP: &str = "↑/↓ move • / filter • enter select • q quit";
const FILTER_HELP: &str = "enter keep filter • esc clear filter";

/// Something that can be displayed and filtered in a [`FilterList`].
pub trait ListItem {
    fn title(&self) -> &str;
    /// Secondary text shown dimmed after the title; may be empty.
    fn description(&self) -> &str;
    /// The text the filter is matched against.
    fn filter_value(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct FilterList<T> {
    title: String,
    items: Vec<T>,
    filter: String,
    editing: bool,
    /// Indices into `items` of the entries matching `filter`.
    visible: Vec<usize>,
    /// Position of the highlighted entry in `visible`.
    cursor: usize,
    /// Position in `visible` of the first entry drawn.
    offset: usize,
    width: u16,
    height: u16,
}

impl<T: ListItem> FilterList<T> {
    pub fn new(title: impl Into<String>, items: Vec<T>) -> Self {
        let mut list = FilterList {
            title: title.into(),
            items,
            filter: String::new(),
            editing: false,
            visible: Vec::new(),
            cursor: 0,
            offset: 0,
            width: 0,
            height: 0,
        };
        list.apply_filter();
        list
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replaces all items; the current filter is re-applied to them.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.apply_filter();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.scroll_to_cursor();
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// `true` while keystrokes are going into the filter.
    pub fn is_editing_filter(&self) -> bool {
        self.editing
    }

    /// `true` when a filter restricts the shown items.
    pub fn is_filtered(&self) -> bool {
        !self.filter.is_empty()
    }

    pub fn reset_filter(&mut self) {
        self.filter.clear();
        self.editing = false;
        self.apply_filter();
    }

    /// The entries matching the current filter, in order.
    pub fn visible_items(&self) -> impl Iterator<Item = &T> + '_ {
        self.visible.iter().map(move |&index| &self.items[index])
    }

    /// The highlighted entry, if any entry is shown at all.
    pub fn selected(&self) -> Option<&T> {
        self.visible
            .get(self.cursor)
            .map(|&index| &self.items[index])
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Feeds a key to the widget: cursor movement, or filter editing.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.editing {
            self.handle_filter_key(key);
            return;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(1),
            KeyCode::PageUp => self.move_up(self.page_size()),
            KeyCode::PageDown => self.move_down(self.page_size()),
            KeyCode::Home | KeyCode::Char('g') => self.move_up(self.cursor),
            KeyCode::End | KeyCode::Char('G') => self.move_down(self.visible.len()),
            KeyCode::Char('/') => self.editing = true,
            KeyCode::Esc if self.is_filtered() => self.reset_filter(),
            _ => {}
        }
    }

    /// Renders the widget into lines fitting the current viewport.
    pub fn view(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.page_size() + CHROME_LINES);
        lines.push(style(self.fit(&self.title)).bold().to_string());

        let status = if self.editing {
            format!("Filter: {}_", self.filter)
        } else if self.is_filtered() {
            format!(
                "“{}” {} of {} items",
                self.filter,
                self.visible.len(),
                self.items.len()
            )
        } else {
            match self.items.len() {
                0 => "No items".to_string(),
                1 => "1 item".to_string(),
                n => format!("{} items", n),
            }
        };
        lines.push(style(self.fit(&status)).dim().to_string());

        let end = (self.offset + self.page_size()).min(self.visible.len());
        for (position, &index) in self.visible[self.offset..end].iter().enumerate() {
            let item = &self.items[index];
            let highlighted = self.offset + position == self.cursor;
            lines.push(self.render_item(item, highlighted));
        }

        let help = if self.editing { FILTER_HELP } else { HELP };
        lines.push(style(self.fit(help)).dim().to_string());
        lines
    }

    // -------------------------------------------------------------------------

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.filter.push(c);
                self.apply_filter();
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.apply_filter();
            }
            KeyCode::Esc => self.reset_filter(),
            KeyCode::Enter | KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                self.editing = false;
            }
            _ => {}
        }
    }

    fn apply_filter(&mut self) {
        let filter = &self.filter;
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| fuzzy_match(&item.filter_value(), filter))
            .map(|(index, _)| index)
            .collect();
        self.cursor = 0;
        self.offset = 0;
    }

    fn page_size(&self) -> usize {
        (self.height as usize).saturating_sub(CHROME_LINES).max(1)
    }

    fn move_up(&mut self, by: usize) {
        self.cursor = self.cursor.saturating_sub(by);
        self.scroll_to_cursor();
    }

    fn move_down(&mut self, by: usize) {
        let last = self.visible.len().saturating_sub(1);
        self.cursor = self.cursor.saturating_add(by).min(last);
        self.scroll_to_cursor();
    }

    fn scroll_to_cursor(&mut self) {
        let page = self.page_size();
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + page {
            self.offset = self.cursor + 1 - page;
        }
    }

    fn render_item(&self, item: &T, highlighted: bool) -> String {
        let marker = if highlighted { "▸ " } else { "  " };
        let text = if item.description().is_empty() {
            format!("{}{}", marker, item.title())
        } else {
            format!("{}{}  {}", marker, item.title(), item.description())
        };
        let text = self.fit(&text);

        // Style title and description separately, splitting on the truncated
        // text so that the line never exceeds the viewport.
        let title_end = (marker.len() + item.title().len()).min(text.len());
        let (head, tail) = match text.is_char_boundary(title_end) {
            true => text.split_at(title_end),
            false => (&text[..], ""),
        };
        let head = if highlighted {
            style(head).cyan().bold().to_string()
        } else {
            head.to_string()
        };
        format!("{}{}", head, style(tail).dim())
    }

    fn fit<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.width == 0 {
            Cow::Borrowed(text)
        } else {
            truncate_str(text, self.width as usize, "…")
        }
    }
}

/// Case-insensitive subsequence match: every character of `filter` appears in
/// `value` in the same order.
fn fuzzy_match(value: &str, filter: &str) -> bool {
    let mut haystack = value.chars().flat_map(char::to_lowercase);
    filter
        .chars()
        .flat_map(char::to_lowercase)
        .all(|needle| haystack.any(|c| c == needle))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry(&'static str);
    impl ListItem for Entry {
        fn title(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            ""
        }
        fn filter_value(&self) -> String {
            self.0.to_string()
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        code.into()
    }

    fn list() -> FilterList<Entry> {
        FilterList::new(
            "Pick",
            vec![
                Entry("Arduino Uno"),
                Entry("Arduino Mega"),
                Entry("Adafruit Feather"),
                Entry("ESP32 Dev Module"),
            ],
        )
    }

    fn type_filter(list: &mut FilterList<Entry>, text: &str) {
        list.handle_key(key(KeyCode::Char('/')));
        for c in text.chars() {
            list.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn fuzzy_matching() {
        assert!(fuzzy_match("Arduino Uno", "uno"));
        assert!(fuzzy_match("Arduino Uno", "ADU"));
        assert!(fuzzy_match("anything", ""));
        assert!(!fuzzy_match("Arduino Uno", "onu!"));
        assert!(!fuzzy_match("Mega", "megaa"));
    }

    #[test]
    fn selects_first_item_initially() {
        let list = list();
        assert_eq!(list.selected(), Some(&Entry("Arduino Uno")));
        assert_eq!(list.visible_items().count(), 4);
    }

    #[test]
    fn empty_list_has_no_selection() {
        let list: FilterList<Entry> = FilterList::new("Pick", vec![]);
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn cursor_moves_within_bounds() {
        let mut list = list();
        list.handle_key(key(KeyCode::Up));
        assert_eq!(list.cursor(), 0);
        list.handle_key(key(KeyCode::Down));
        list.handle_key(key(KeyCode::Char('j')));
        assert_eq!(list.selected(), Some(&Entry("Adafruit Feather")));
        list.handle_key(key(KeyCode::End));
        list.handle_key(key(KeyCode::Down));
        assert_eq!(list.selected(), Some(&Entry("ESP32 Dev Module")));
        list.handle_key(key(KeyCode::Char('k')));
        assert_eq!(list.selected(), Some(&Entry("Adafruit Feather")));
        list.handle_key(key(KeyCode::Home));
        assert_eq!(list.cursor(), 0);
    }

    #[test]
    fn filter_restricts_items_and_resets_cursor() {
        let mut list = list();
        list.handle_key(key(KeyCode::Down));
        type_filter(&mut list, "ar");
        assert!(list.is_editing_filter());
        assert_eq!(
            list.visible_items().cloned().collect::<Vec<_>>(),
            vec![
                Entry("Arduino Uno"),
                Entry("Arduino Mega"),
                Entry("Adafruit Feather")
            ]
        );
        assert_eq!(list.cursor(), 0);

        // `j` goes into the filter while editing.
        list.handle_key(key(KeyCode::Char('j')));
        assert_eq!(list.filter(), "arj");
        assert_eq!(list.selected(), None);
        list.handle_key(key(KeyCode::Backspace));
        assert_eq!(list.visible_items().count(), 3);
    }

    #[test]
    fn enter_keeps_filter_and_escape_clears_it() {
        let mut list = list();
        type_filter(&mut list, "mega");
        list.handle_key(key(KeyCode::Enter));
        assert!(!list.is_editing_filter());
        assert!(list.is_filtered());
        assert_eq!(list.selected(), Some(&Entry("Arduino Mega")));

        list.handle_key(key(KeyCode::Esc));
        assert!(!list.is_filtered());
        assert_eq!(list.visible_items().count(), 4);
    }

    #[test]
    fn reset_filter_shows_all_items() {
        let mut list = list();
        type_filter(&mut list, "esp");
        list.reset_filter();
        assert!(!list.is_editing_filter());
        assert_eq!(list.filter(), "");
        assert_eq!(list.visible_items().count(), 4);
    }

    #[test]
    fn set_items_replaces_content() {
        let mut list = list();
        list.handle_key(key(KeyCode::End));
        list.set_items(vec![Entry("/dev/ttyUSB0")]);
        assert_eq!(list.cursor(), 0);
        assert_eq!(list.selected(), Some(&Entry("/dev/ttyUSB0")));
    }

    #[test]
    fn view_fits_viewport_and_scrolls() {
        let mut list = list();
        list.set_size(40, 5);
        // title + status + 2 items + help
        assert_eq!(list.view().len(), 5);

        list.handle_key(key(KeyCode::Down));
        list.handle_key(key(KeyCode::Down));
        let view = list.view().join("\n");
        assert!(view.contains("Adafruit Feather"));
        assert!(!view.contains("Arduino Uno"));
    }

    #[test]
    fn page_down_moves_by_page() {
        let mut list = list();
        list.set_size(40, 5);
        list.handle_key(key(KeyCode::PageDown));
        assert_eq!(list.cursor(), 2);
        list.handle_key(key(KeyCode::PageDown));
        assert_eq!(list.cursor(), 3);
        list.handle_key(key(KeyCode::PageUp));
        assert_eq!(list.cursor(), 1);
    }

    #[test]
    fn view_reports_filter_status() {
        let mut list = list();
        type_filter(&mut list, "esp");
        assert!(list.view()[1].contains("Filter: esp_"));
        list.handle_key(key(KeyCode::Enter));
        assert!(list.view()[1].contains("1 of 4 items"));
    }
}
