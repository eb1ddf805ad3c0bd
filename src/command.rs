use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Quit,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Esc,
    Home,
    End,
    Next,
    Prev,
    M,
    P,
    Q,
    R,
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Command> {
        match (ev.modifiers, ev.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Command::Quit),
            (KeyModifiers::NONE, KeyCode::Char('w' | 'k' | '8') | KeyCode::Up) => {
                Some(Command::Up)
            }
            (KeyModifiers::NONE, KeyCode::Char('s' | 'j' | '2') | KeyCode::Down) => {
                Some(Command::Down)
            }
            (KeyModifiers::NONE, KeyCode::Char('a' | 'h' | '4') | KeyCode::Left) => {
                Some(Command::Left)
            }
            (KeyModifiers::NONE, KeyCode::Char('d' | 'l' | '6') | KeyCode::Right) => {
                Some(Command::Right)
            }
            (_, KeyCode::Enter) => Some(Command::Enter),
            (KeyModifiers::NONE, KeyCode::Char(' ')) => Some(Command::Space),
            (_, KeyCode::Esc) => Some(Command::Esc),
            (_, KeyCode::Home) => Some(Command::Home),
            (_, KeyCode::End) => Some(Command::End),
            (_, KeyCode::Tab) => Some(Command::Next),
            (_, KeyCode::BackTab) => Some(Command::Prev),
            (KeyModifiers::NONE, KeyCode::Char('m')) => Some(Command::M),
            (KeyModifiers::NONE, KeyCode::Char('p')) => Some(Command::P),
            (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Command::Q),
            (KeyModifiers::NONE, KeyCode::Char('r')) => Some(Command::R),
            _ => None,
        }
    }

    /// The unit vector a steering command points along, with y growing
    /// downwards
    pub(crate) fn vector(self) -> Option<(i32, i32)> {
        match self {
            Command::Up => Some((0, -1)),
            Command::Down => Some((0, 1)),
            Command::Left => Some((-1, 0)),
            Command::Right => Some((1, 0)),
            _ => None,
        }
    }
}
