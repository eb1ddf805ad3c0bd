use crate::consts;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::Widget,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Logo;

impl Logo {
    const WORD_WIDTH: u16 = 15;
    const SNAKE_BODY_LENGTH: u16 = 12;
    const SNAKE_FOOD_GUTTER: u16 = 2;
    const TEXT_HEIGHT: u16 = 3;
    pub(super) const HEIGHT: u16 = Self::TEXT_HEIGHT + 2;
    pub(super) const WIDTH: u16 = Self::WORD_WIDTH * 2;

    #[rustfmt::skip]
    const SNAKE: [&'static str; Self::TEXT_HEIGHT as usize] = [
        "╔═╗╔╗╔╔═╗╦╔═╔═╗",
        "╚═╗║║║╠═╣╠╩╗║╣ ",
        "╚═╝╝╚╝╩ ╩╩ ╩╚═╝",
    ];

    #[rustfmt::skip]
    const BOARD: [&'static str; Self::TEXT_HEIGHT as usize] = [
        "╔╗ ╔═╗╔═╗╦═╗╔╦╗",
        "╠╩╗║ ║╠═╣╠╦╝ ║║",
        "╚═╝╚═╝╩ ╩╩╚══╩╝",
    ];
}

impl Widget for Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [words_area, diagram_area] = Layout::vertical([Self::TEXT_HEIGHT, 1])
            .flex(Flex::Start)
            .spacing(1)
            .areas(area);
        let [snake_area, board_area] = Layout::horizontal([Self::WORD_WIDTH, Self::WORD_WIDTH])
            .flex(Flex::Start)
            .areas(words_area);
        Text::from_iter(Self::SNAKE)
            .style(consts::SNAKE_STYLE)
            .render(snake_area, buf);
        Text::from_iter(Self::BOARD)
            .style(consts::FOOD_STYLE)
            .render(board_area, buf);
        let [body_area, head_area, _, food_area] = Layout::horizontal([
            Constraint::Length(Self::SNAKE_BODY_LENGTH),
            Constraint::Length(1),
            Constraint::Length(Self::SNAKE_FOOD_GUTTER),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .areas(diagram_area);
        paint(body_area, buf, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        paint(head_area, buf, consts::SNAKE_HEAD_EAST_SYMBOL, consts::SNAKE_STYLE);
        paint(food_area, buf, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
    }
}

fn paint(area: Rect, buf: &mut Buffer, symbol: char, style: Style) {
    for p in area.positions() {
        if let Some(cell) = buf.cell_mut(p) {
            cell.set_char(symbol);
            cell.set_style(style);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Instructions;

impl Instructions {
    pub(super) const HEIGHT: u16 = 7;
    pub(super) const WIDTH: u16 = 23;
}

impl Widget for Instructions {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let keys = |lead: &'static str, keys: [&'static str; 4]| {
            let mut line = Line::raw(lead);
            for (i, k) in keys.into_iter().enumerate() {
                if i > 0 {
                    line.push_span(" ");
                }
                line.push_span(Span::styled(k, consts::KEY_STYLE));
            }
            line
        };
        let text = Text::from_iter([
            Line::from("Steer the snake with:"),
            keys("       ", ["←", "↓", "↑", "→"]),
            keys("   or: ", ["h", "j", "k", "l"]),
            keys("   or: ", ["a", "s", "w", "d"]),
            keys("   or: ", ["4", "2", "8", "6"]),
            Line::from("Eat the food. Don't hit"),
            Line::from("the walls or yourself!"),
        ]);
        debug_assert_eq!(
            text.height(),
            usize::from(Self::HEIGHT),
            "Instructions::HEIGHT is wrong"
        );
        debug_assert_eq!(
            text.width(),
            usize::from(Self::WIDTH),
            "Instructions::WIDTH is wrong"
        );
        text.render(area, buf);
    }
}
