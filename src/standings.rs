use crate::consts;
use crate::leaderboard::Leaderboard;
use crate::options::GameMode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{
        block::{Block, Padding},
        Widget,
    },
};
use std::num::NonZeroUsize;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A widget listing the leaderboard entries for one game mode
#[derive(Clone, Copy, Debug)]
pub(crate) struct Standings<'a> {
    leaderboard: &'a Leaderboard,
    mode: GameMode,
    /// The rank of an entry to draw attention to
    highlight: Option<NonZeroUsize>,
}

impl<'a> Standings<'a> {
    const RANK_WIDTH: u16 = 3;
    const NAME_WIDTH: u16 = 20;
    const SCORE_WIDTH: u16 = 6;

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const HEIGHT: u16 = consts::LEADERBOARD_SIZE as u16 + 2;

    pub(crate) const WIDTH: u16 = 2 /* border */ + 2 /* padding */ + Self::RANK_WIDTH
        + 1 + Self::NAME_WIDTH + 1 + Self::SCORE_WIDTH;

    pub(crate) fn new(leaderboard: &'a Leaderboard, mode: GameMode) -> Standings<'a> {
        Standings {
            leaderboard,
            mode,
            highlight: None,
        }
    }

    pub(crate) fn highlight(mut self, rank: Option<NonZeroUsize>) -> Standings<'a> {
        self.highlight = rank;
        self
    }
}

impl Widget for Standings<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(format!(" Top Scores: {} ", self.mode))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);
        let mut entries = self.leaderboard.top(self.mode);
        for (rank, row) in (1..=consts::LEADERBOARD_SIZE).zip(inner.rows()) {
            let (text, style) = match entries.next() {
                Some(entry) => (
                    format!(
                    "{rank:>rwidth$} {name} {score:>swidth$}",
                    rank = format!("{rank}."),
                    rwidth = usize::from(Standings::RANK_WIDTH),
                    name = fit_name(&entry.name, usize::from(Standings::NAME_WIDTH)),
                    score = entry.score,
                        swidth = usize::from(Standings::SCORE_WIDTH),
                    ),
                    rank.checked_sub(1)
                        .and_then(|i| consts::PODIUM_STYLES.get(i))
                        .copied()
                        .unwrap_or_default(),
                ),
                None => (
                    format!(
                        "{rank:>rwidth$}",
                        rank = format!("{rank}."),
                        rwidth = usize::from(Standings::RANK_WIDTH),
                    ),
                    Style::new(),
                ),
            };
            let style = if self.highlight.map(NonZeroUsize::get) == Some(rank) {
                consts::KEY_STYLE
            } else {
                style
            };
            Line::styled(text, style).render(row, buf);
        }
    }
}

/// Pad or truncate a name to exactly `width` terminal columns.  Names that
/// don't fit are cut at a grapheme boundary and end in an ellipsis.
fn fit_name(name: &str, width: usize) -> String {
    let mut fitted = String::new();
    let mut used = name.width();
    if used <= width {
        fitted.push_str(name);
    } else {
        used = 0;
        for g in name.graphemes(true) {
            let w = g.width();
            if used + w + 1 > width {
                break;
            }
            fitted.push_str(g);
            used += w;
        }
        fitted.push('…');
        used += 1;
    }
    fitted.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    fitted
}
