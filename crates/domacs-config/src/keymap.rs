use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use domacs_engine::Action;

use crate::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

/// The non-modifier part of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// A printable character, stored lowercase.
    Char(char),
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Tab,
    Space,
    Backspace,
    Delete,
    Escape,
    F(u8),
}

const NAMED_KEYS: [(&str, Key); 14] = [
    ("Left", Key::Left),
    ("Right", Key::Right),
    ("Up", Key::Up),
    ("Down", Key::Down),
    ("Home", Key::Home),
    ("End", Key::End),
    ("PageUp", Key::PageUp),
    ("PageDown", Key::PageDown),
    ("Enter", Key::Enter),
    ("Tab", Key::Tab),
    ("Space", Key::Space),
    ("Backspace", Key::Backspace),
    ("Delete", Key::Delete),
    ("Escape", Key::Escape),
];

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::Char(c.to_ascii_lowercase()));
        }
        if let Some((_, key)) = NAMED_KEYS.iter().find(|(name, _)| name.eq_ignore_ascii_case(s)) {
            return Ok(*key);
        }
        if s.eq_ignore_ascii_case("plus") {
            return Ok(Key::Char('+'));
        }
        if let Some(number) = s.strip_prefix(['f', 'F'])
            && let Ok(n) = number.parse::<u8>()
            && (1..=24).contains(&n)
        {
            return Ok(Key::F(n));
        }
        Err(format!("unknown key {s:?}"))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char('+') => f.write_str("Plus"),
            Key::Char(c) => write!(f, "{c}"),
            Key::F(n) => write!(f, "F{n}"),
            named => {
                let name = NAMED_KEYS
                    .iter()
                    .find(|(_, key)| key == named)
                    .map_or("?", |(name, _)| *name);
                f.write_str(name)
            }
        }
    }
}

/// A key with its modifiers, written `Ctrl+Alt+f` in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyChord {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl KeyChord {
    pub fn new(modifiers: Modifiers, key: Key) -> Self {
        Self { modifiers, key }
    }

    pub fn ctrl(key: char) -> Self {
        Self::new(
            Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
            Key::Char(key),
        )
    }

    pub fn alt(key: char) -> Self {
        Self::new(
            Modifiers {
                alt: true,
                ..Modifiers::default()
            },
            Key::Char(key),
        )
    }

    pub fn ctrl_alt(key: char) -> Self {
        Self::new(
            Modifiers {
                ctrl: true,
                alt: true,
                ..Modifiers::default()
            },
            Key::Char(key),
        )
    }

    pub fn plain(key: Key) -> Self {
        Self::new(Modifiers::default(), key)
    }
}

impl FromStr for KeyChord {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ConfigError::InvalidChord {
            chord: s.to_string(),
            reason,
        };

        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let Some((key, modifier_names)) = parts.split_last() else {
            return Err(invalid("empty chord".to_string()));
        };
        if key.is_empty() {
            return Err(invalid("missing key".to_string()));
        }

        let mut modifiers = Modifiers::default();
        for name in modifier_names {
            let flag = match name.to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "c" => &mut modifiers.ctrl,
                "alt" | "m" => &mut modifiers.alt,
                "shift" => &mut modifiers.shift,
                "meta" | "super" | "cmd" => &mut modifiers.meta,
                _ => return Err(invalid(format!("unknown modifier {name:?}"))),
            };
            if *flag {
                return Err(invalid(format!("modifier {name:?} given twice")));
            }
            *flag = true;
        }

        let key = key.parse::<Key>().map_err(invalid)?;
        Ok(KeyChord::new(modifiers, key))
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Modifiers {
            ctrl,
            alt,
            shift,
            meta,
        } = self.modifiers;
        for (set, name) in [(ctrl, "Ctrl"), (alt, "Alt"), (shift, "Shift"), (meta, "Meta")] {
            if set {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{}", self.key)
    }
}

/// Lookup table from chords to actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymap {
    bindings: BTreeMap<KeyChord, Action>,
}

impl Keymap {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Emacs-flavoured default bindings.
    pub fn emacs() -> Self {
        let mut keymap = Self::empty();
        let defaults = [
            (KeyChord::ctrl('f'), Action::ForwardChar),
            (KeyChord::ctrl('b'), Action::BackwardChar),
            (KeyChord::alt('f'), Action::ForwardWord),
            (KeyChord::alt('b'), Action::BackwardWord),
            (KeyChord::ctrl('n'), Action::NextLine),
            (KeyChord::ctrl('p'), Action::PreviousLine),
            (KeyChord::plain(Key::Right), Action::ForwardChar),
            (KeyChord::plain(Key::Left), Action::BackwardChar),
            (KeyChord::plain(Key::Down), Action::NextLine),
            (KeyChord::plain(Key::Up), Action::PreviousLine),
            (
                KeyChord::new(
                    Modifiers {
                        ctrl: true,
                        ..Modifiers::default()
                    },
                    Key::Space,
                ),
                Action::SetMark,
            ),
            (KeyChord::ctrl('g'), Action::UnsetMark),
            (KeyChord::ctrl('s'), Action::SearchForward),
            (KeyChord::ctrl('r'), Action::SearchBackward),
            (KeyChord::ctrl_alt('s'), Action::SavePoint),
            (KeyChord::ctrl_alt('r'), Action::RestorePoint),
            (KeyChord::ctrl_alt('c'), Action::CodifySelection),
            (KeyChord::ctrl_alt('u'), Action::UncodifySelection),
            (KeyChord::ctrl_alt('b'), Action::BoldToCode),
        ];
        for (chord, action) in defaults {
            keymap.bind(chord, action);
        }
        keymap
    }

    /// Binds `chord`, returning the action it replaced.
    pub fn bind(&mut self, chord: KeyChord, action: Action) -> Option<Action> {
        self.bindings.insert(chord, action)
    }

    pub fn unbind(&mut self, chord: &KeyChord) -> Option<Action> {
        self.bindings.remove(chord)
    }

    pub fn lookup(&self, chord: &KeyChord) -> Option<Action> {
        self.bindings.get(chord).copied()
    }

    /// Every chord bound to `action`, in chord order.
    pub fn chords_for(&self, action: Action) -> impl Iterator<Item = &KeyChord> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, bound)| **bound == action)
            .map(|(chord, _)| chord)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
