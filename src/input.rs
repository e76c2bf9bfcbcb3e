use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::session::GRID_SIZE;

/// Which physical keys stand in for the 3x3 grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[derive(strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum KeyLayout {
    /// 7 8 9 / 4 5 6 / 1 2 3, laid out like a numeric keypad
    #[default]
    Numpad,
    /// q w e / a s d / z x c
    Qwerty,
}

impl KeyLayout {
    /// Keys in grid order (row-major, top row first)
    pub fn keys(&self) -> [char; GRID_SIZE] {
        match self {
            KeyLayout::Numpad => ['7', '8', '9', '4', '5', '6', '1', '2', '3'],
            KeyLayout::Qwerty => ['q', 'w', 'e', 'a', 's', 'd', 'z', 'x', 'c'],
        }
    }

    pub fn cell_for(&self, c: char) -> Option<usize> {
        let c = c.to_ascii_lowercase();
        self.keys().iter().position(|&k| k == c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Hit(usize),
    Restart,
    PauseResume,
    Quit,
}

pub fn action_for(key: KeyEvent, layout: KeyLayout) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char(' ') => Some(Action::PauseResume),
        KeyCode::Char(c) => layout.cell_for(c).map(Action::Hit).or(match c {
            'r' | 'R' => Some(Action::Restart),
            'p' | 'P' => Some(Action::PauseResume),
            _ => None,
        }),
        _ => None,
    }
}
