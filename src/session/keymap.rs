//! Keyboard Shortcuts
//!
//! Key presses arrive as [`KeyPress`] values (parsed from chords such as
//! `ctrl+s`). The only bound action is the save-style shortcut, which
//! exports the current file.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Error};

/// A key press with its modifier state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyPress {
    /// The produced key, already shifted (`S` for shift+s)
    pub key: char,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: char) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    pub fn ctrl(key: char) -> Self {
        Self {
            key,
            ctrl: true,
            ..Self::default()
        }
    }

    pub fn meta(key: char) -> Self {
        Self {
            key,
            meta: true,
            ..Self::default()
        }
    }
}

impl FromStr for KeyPress {
    type Err = Error;

    /// Parse chords like `ctrl+s`, `cmd+s` or `ctrl+shift+s`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (modifiers, key) = split_chord(s)?;
        let mut press = KeyPress::new(key);

        for modifier in modifiers {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => press.ctrl = true,
                "meta" | "cmd" | "command" | "super" | "win" => press.meta = true,
                "alt" | "option" => press.alt = true,
                "shift" => press.shift = true,
                other => bail!("Unknown modifier '{}' in '{}'", other, s.trim()),
            }
        }

        if press.shift {
            press.key = press.key.to_ascii_uppercase();
        }
        Ok(press)
    }
}

/// Modifier requirement of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Ctrl,
    Meta,
    /// Either Ctrl or Meta (Cmd on macOS)
    CtrlOrMeta,
}

/// A modifier plus an exact key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub modifier: Modifier,
    pub key: char,
}

impl KeyBinding {
    /// Ctrl+S or Cmd+S
    pub const SAVE: KeyBinding = KeyBinding {
        modifier: Modifier::CtrlOrMeta,
        key: 's',
    };

    pub fn matches(&self, press: &KeyPress) -> bool {
        let modifier = match self.modifier {
            Modifier::Ctrl => press.ctrl,
            Modifier::Meta => press.meta,
            Modifier::CtrlOrMeta => press.ctrl || press.meta,
        };
        modifier && press.key == self.key
    }
}

impl Default for KeyBinding {
    fn default() -> Self {
        Self::SAVE
    }
}

impl FromStr for KeyBinding {
    type Err = Error;

    /// Parse `mod+s` (ctrl or meta), `ctrl+s` or `meta+s`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (modifiers, key) = split_chord(s)?;
        let [modifier] = modifiers.as_slice() else {
            bail!("Binding '{}' needs exactly one modifier", s.trim());
        };

        let modifier = match modifier.to_ascii_lowercase().as_str() {
            "mod" => Modifier::CtrlOrMeta,
            "ctrl" | "control" => Modifier::Ctrl,
            "meta" | "cmd" | "command" | "super" | "win" => Modifier::Meta,
            other => bail!("Unsupported modifier '{}' in binding '{}'", other, s.trim()),
        };
        Ok(KeyBinding { modifier, key })
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifier = match self.modifier {
            Modifier::Ctrl => "ctrl",
            Modifier::Meta => "meta",
            Modifier::CtrlOrMeta => "mod",
        };
        write!(f, "{}+{}", modifier, self.key)
    }
}

/// What the session did with a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The press triggered an action; the host default must be suppressed
    Handled { prevent_default: bool },
    Ignored,
}

fn split_chord(s: &str) -> Result<(Vec<&str>, char), Error> {
    let mut parts: Vec<&str> = s.trim().split('+').map(str::trim).collect();
    let key_part = parts
        .pop()
        .filter(|part| !part.is_empty())
        .ok_or_else(|| anyhow!("Missing key in chord '{}'", s.trim()))?;

    let mut chars = key_part.chars();
    let key = match (chars.next(), chars.next()) {
        (Some(key), None) => key,
        _ => bail!("Expected a single key in chord '{}', got '{}'", s.trim(), key_part),
    };
    Ok((parts, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_press() {
        assert_eq!("ctrl+s".parse::<KeyPress>().unwrap(), KeyPress::ctrl('s'));
        assert_eq!("Cmd + s".parse::<KeyPress>().unwrap(), KeyPress::meta('s'));

        let shifted: KeyPress = "ctrl+shift+s".parse().unwrap();
        assert_eq!(shifted.key, 'S');
        assert!(shifted.ctrl && shifted.shift);
    }

    #[test]
    fn test_parse_key_press_errors() {
        assert!("ctrl+".parse::<KeyPress>().is_err());
        assert!("hyper+s".parse::<KeyPress>().is_err());
        assert!("ctrl+save".parse::<KeyPress>().is_err());
    }

    #[test]
    fn test_save_binding_matches_ctrl_or_meta() {
        let save = KeyBinding::SAVE;
        assert!(save.matches(&KeyPress::ctrl('s')));
        assert!(save.matches(&KeyPress::meta('s')));
        assert!(!save.matches(&KeyPress::new('s')));
        assert!(!save.matches(&KeyPress::ctrl('S')));
        assert!(!save.matches(&KeyPress::ctrl('d')));
    }

    #[test]
    fn test_parse_binding() {
        assert_eq!("mod+s".parse::<KeyBinding>().unwrap(), KeyBinding::SAVE);
        let ctrl_only: KeyBinding = "ctrl+e".parse().unwrap();
        assert!(ctrl_only.matches(&KeyPress::ctrl('e')));
        assert!(!ctrl_only.matches(&KeyPress::meta('e')));
        assert_eq!(ctrl_only.to_string(), "ctrl+e");

        assert!("s".parse::<KeyBinding>().is_err());
        assert!("ctrl+alt+s".parse::<KeyBinding>().is_err());
        assert!("alt+s".parse::<KeyBinding>().is_err());
    }
}
