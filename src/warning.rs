use crate::command::Command;
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect, Size},
    text::{Line, Text},
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
};
use std::borrow::Cow;
use std::error::Error;

/// A pop-up describing a problem with the program's data files, shown over
/// whatever screen the problem occurred on
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Warning {
    lines: Vec<String>,
}

impl Warning {
    const MAX_LINES: u16 = 12;
    const TEXT_WIDTH: u16 = 48;
    const WIDTH: u16 = Self::TEXT_WIDTH + 4;

    pub(crate) fn new(err: &dyn Error) -> Warning {
        Warning::from_error_messages(&error_chain(err))
    }

    /// Handle a command.  Returns `Some` once the user is done with the
    /// warning.
    pub(crate) fn handle_command(&self, cmd: Command) -> Option<WarningOutcome> {
        match cmd {
            Command::Enter | Command::Esc | Command::Space => Some(WarningOutcome::Dismissed),
            Command::Quit => Some(WarningOutcome::Quit),
            _ => None,
        }
    }

    fn from_error_messages(msgs: &[String]) -> Warning {
        let mut lines = Vec::new();
        let Some((first, causes)) = msgs.split_first() else {
            return Warning { lines };
        };
        let wrap = |text: &str, first: &str, rest: &str, lines: &mut Vec<String>| {
            let opts = textwrap::Options::new(usize::from(Warning::TEXT_WIDTH))
                .break_words(true)
                .initial_indent(first)
                .subsequent_indent(rest);
            lines.extend(textwrap::wrap(text, opts).into_iter().map(Cow::into_owned));
        };
        wrap(first, "", "", &mut lines);
        if !causes.is_empty() {
            lines.push(String::new());
            lines.push(String::from("Caused by:"));
        }
        if let [cause] = causes {
            wrap(cause, "    ", "    ", &mut lines);
        } else {
            for (i, cause) in causes.iter().enumerate() {
                wrap(cause, &format!("{i:>5}: "), "       ", &mut lines);
            }
        }
        if lines.len() > usize::from(Warning::MAX_LINES) {
            lines.truncate(usize::from(Warning::MAX_LINES) - 1);
            lines.push(String::from("…"));
        }
        Warning { lines }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum WarningOutcome {
    Dismissed,
    Quit,
}

/// Return the message of an error followed by those of each of its sources
pub(crate) fn error_chain(err: &dyn Error) -> Vec<String> {
    let mut msgs = vec![err.to_string()];
    let mut source = err.source();
    while let Some(src) = source {
        msgs.push(src.to_string());
        source = src.source();
    }
    msgs
}

impl Widget for &Warning {
    // `area` is the area of the entire display, not just the pop-up.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = u16::try_from(self.lines.len())
            .unwrap_or(u16::MAX)
            .saturating_add(4);
        let block_area = center_rect(
            area,
            Size {
                width: Warning::WIDTH,
                height,
            },
        );
        let block = Block::bordered()
            .title(" WARNING ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));
        let [text_area, ok_area] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
            .flex(Flex::Start)
            .spacing(1)
            .areas(block.inner(block_area));
        Clear.render(block_area, buf);
        block.render(block_area, buf);
        Text::from_iter(self.lines.iter().map(String::as_str)).render(text_area, buf);
        Line::from("[OK]").centered().render(ok_area, buf);
    }
}
