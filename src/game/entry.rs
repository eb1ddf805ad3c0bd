use crate::consts;
use crate::leaderboard::sanitize_name;
use crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
};
use std::num::NonZeroUsize;
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};
use unicode_segmentation::UnicodeSegmentation;

/// A pop-up asking the player for a name to put on the leaderboard
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct NameForm {
    /// The rank the score will receive
    rank: NonZeroUsize,
    name: String,
}

impl NameForm {
    /// The height that should be used for the `Rect` passed to
    /// `NameForm::render()`
    pub(super) const HEIGHT: u16 = 7;

    /// The width that should be used for the `Rect` passed to
    /// `NameForm::render()`
    #[allow(clippy::cast_possible_truncation)]
    pub(super) const WIDTH: u16 = 2 /* border */ + 2 /* padding */ + Self::PROMPT_WIDTH
        + 2 * (consts::MAX_NAME_LENGTH as u16) + 1 /* cursor */;

    const PROMPT: &'static str = "Name: ";

    #[allow(clippy::cast_possible_truncation)]
    const PROMPT_WIDTH: u16 = Self::PROMPT.len() as u16;

    pub(super) fn new(rank: NonZeroUsize) -> NameForm {
        NameForm {
            rank,
            name: String::new(),
        }
    }

    /// Handle an input event.  Returns `Some` if the user is done with the
    /// form.
    pub(super) fn handle_event(&mut self, event: Event) -> Option<FormOutcome> {
        let ev = event.as_key_press_event()?;
        match (ev.modifiers, ev.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Some(FormOutcome::Quit),
            (_, KeyCode::Esc) => return Some(FormOutcome::Skip),
            (_, KeyCode::Enter) => {
                if let Some(name) = sanitize_name(&self.name) {
                    return Some(FormOutcome::Submit(name));
                }
            }
            (_, KeyCode::Backspace) => self.pop(),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => self.push(c),
            _ => (),
        }
        None
    }

    fn push(&mut self, c: char) {
        if c.general_category_group() == GeneralCategoryGroup::Other {
            return;
        }
        self.name.push(c);
        // A combining character may have merged into the last grapheme, so
        // the limit is checked after the fact.
        if self.name.graphemes(true).count() > consts::MAX_NAME_LENGTH {
            self.name.pop();
        }
    }

    fn pop(&mut self) {
        if let Some((i, _)) = self.name.grapheme_indices(true).next_back() {
            self.name.truncate(i);
        }
    }

    #[cfg(test)]
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) enum FormOutcome {
    Submit(String),
    Skip,
    Quit,
}

impl Widget for &NameForm {
    /*
     * ┌──────────────── NEW HIGH SCORE! ────────────────┐
     * │ You placed #1 on the leaderboard!               │
     * │                                                 │
     * │ Name: Alice_                                    │
     * │                                                 │
     * │ Save (Enter) — Skip (Esc)                       │
     * └─────────────────────────────────────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" NEW HIGH SCORE! ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);
        let mut rows = inner.rows();
        if let Some(row) = rows.next() {
            Line::raw(format!("You placed #{} on the leaderboard!", self.rank)).render(row, buf);
        }
        rows.next();
        if let Some(row) = rows.next() {
            Line::from_iter([
                Span::raw(NameForm::PROMPT),
                Span::raw(self.name.as_str()),
                Span::styled("_", consts::KEY_STYLE),
            ])
            .render(row, buf);
        }
        rows.next();
        if let Some(row) = rows.next() {
            Line::from_iter([
                Span::raw("Save ("),
                Span::styled("Enter", consts::KEY_STYLE),
                Span::raw(") — Skip ("),
                Span::styled("Esc", consts::KEY_STYLE),
                Span::raw(")"),
            ])
            .render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use pretty_assertions::assert_eq;

    fn type_str(form: &mut NameForm, s: &str) {
        for c in s.chars() {
            assert_eq!(form.handle_event(Event::Key(KeyCode::Char(c).into())), None);
        }
    }

    fn rank(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn submit_name() {
        let mut form = NameForm::new(rank(1));
        type_str(&mut form, " Alx");
        assert_eq!(form.handle_event(Event::Key(KeyCode::Backspace.into())), None);
        type_str(&mut form, "ice ");
        assert_eq!(form.name(), " Alice ");
        assert_eq!(
            form.handle_event(Event::Key(KeyCode::Enter.into())),
            Some(FormOutcome::Submit(String::from("Alice")))
        );
    }

    #[test]
    fn empty_name_not_submitted() {
        let mut form = NameForm::new(rank(1));
        type_str(&mut form, "   ");
        assert_eq!(form.handle_event(Event::Key(KeyCode::Enter.into())), None);
        assert_eq!(
            form.handle_event(Event::Key(KeyCode::Esc.into())),
            Some(FormOutcome::Skip)
        );
    }

    #[test]
    fn shifted_letters_and_control_keys() {
        let mut form = NameForm::new(rank(1));
        form.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('Q'),
            KeyModifiers::SHIFT,
        )));
        form.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('r'),
            KeyModifiers::ALT,
        )));
        type_str(&mut form, "q\t\u{7}");
        assert_eq!(form.name(), "Qq");
        assert_eq!(
            form.handle_event(Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            ))),
            Some(FormOutcome::Quit)
        );
    }

    #[test]
    fn length_limit() {
        let mut form = NameForm::new(rank(1));
        type_str(&mut form, "abcdefghijklmnopqrstuvwxyz");
        assert_eq!(form.name(), "abcdefghijklmnopqrst");
        // A combining accent joins the last grapheme rather than adding one
        type_str(&mut form, "\u{301}");
        assert_eq!(form.name(), "abcdefghijklmnopqrst\u{301}");
    }

    #[test]
    fn backspace_removes_grapheme() {
        let mut form = NameForm::new(rank(1));
        type_str(&mut form, "ae\u{301}");
        form.handle_event(Event::Key(KeyCode::Backspace.into()));
        assert_eq!(form.name(), "a");
        form.handle_event(Event::Key(KeyCode::Backspace.into()));
        form.handle_event(Event::Key(KeyCode::Backspace.into()));
        assert_eq!(form.name(), "");
    }

    #[test]
    fn render() {
        let mut form = NameForm::new(rank(3));
        type_str(&mut form, "Bob");
        let area = Rect::new(0, 0, NameForm::WIDTH, NameForm::HEIGHT);
        let mut buffer = Buffer::empty(area);
        form.render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            "┌──────────────── NEW HIGH SCORE! ────────────────┐",
            "│ You placed #3 on the leaderboard!               │",
            "│                                                 │",
            "│ Name: Bob_                                      │",
            "│                                                 │",
            "│ Save (Enter) — Skip (Esc)                       │",
            "└─────────────────────────────────────────────────┘",
        ]);
        expected.set_style(area, Style::reset());
        expected.set_style(Rect::new(11, 3, 1, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(8, 5, 5, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(23, 5, 3, 1), consts::KEY_STYLE);
        assert_eq!(buffer, expected);
    }
}
