//! User configuration: carousel constants, keybindings and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/poster-carousel/config.toml`
//! (default `~/.config/poster-carousel/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::carousel::CarouselConfig;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    PrevItem,
    NextItem,
    FirstItem,
    LastItem,
    Reload,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used when serialising).
    pub const ALL: &[Action] = &[
        Action::PrevItem,
        Action::NextItem,
        Action::FirstItem,
        Action::LastItem,
        Action::Reload,
        Action::Quit,
    ];

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::PrevItem => "prev_item",
            Action::NextItem => "next_item",
            Action::FirstItem => "first_item",
            Action::LastItem => "last_item",
            Action::Reload => "reload",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "prev_item" => Some(Action::PrevItem),
            "next_item" => Some(Action::NextItem),
            "first_item" => Some(Action::FirstItem),
            "last_item" => Some(Action::LastItem),
            "reload" => Some(Action::Reload),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"Alt+←"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Alt+Left"`, `"Ctrl+c"`, `"q"`).
    fn to_config_string(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Left"`, `"q"`, `"End"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration: carousel constants and keybindings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub carousel: CarouselConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            carousel: CarouselConfig::default(),
        }
    }
}

impl AppConfig {
    /// Hard-coded default bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(PrevItem, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(NextItem, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(FirstItem, vec![KeyBind::new(Home, n)]);
        m.insert(LastItem, vec![KeyBind::new(End, n)]);
        m.insert(Reload, vec![KeyBind::new(Char('r'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: browse | drag: scroll | {}: reload | {}: quit",
            self.short_binding(Action::PrevItem),
            self.short_binding(Action::NextItem),
            self.short_binding(Action::Reload),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(_) => Self::default(),
        }
    }

    /// Persist current config to the default location.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // Carousel constants.  Range checks happen when the engine is built.
            let carousel = &mut config.carousel;
            let slot = match key {
                "viewport_width" => Some(&mut carousel.viewport_width),
                "item_fraction" => Some(&mut carousel.item_fraction),
                "spacing" => Some(&mut carousel.spacing),
                "displacement" => Some(&mut carousel.displacement),
                "deceleration_rate" => Some(&mut carousel.deceleration_rate),
                "settle_speed" => Some(&mut carousel.settle_speed),
                "drag_step" => Some(&mut carousel.drag_step),
                _ => None,
            };
            if let Some(slot) = slot {
                if let Ok(v) = value.parse::<f64>() {
                    *slot = v;
                }
                continue;
            }
            if key == "scroll_throttle_ms" {
                if let Ok(v) = value.parse::<u64>() {
                    carousel.scroll_throttle = Duration::from_millis(v);
                }
                continue;
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                if let Some(bind) = KeyBind::parse(part) {
                    parsed.push(bind);
                }
            }
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let c = &self.carousel;
        let mut lines = vec![
            "# poster-carousel configuration".to_string(),
            String::new(),
            "# Carousel".to_string(),
            format!("viewport_width = {}", c.viewport_width),
            format!("item_fraction = {}", c.item_fraction),
            format!("spacing = {}", c.spacing),
            format!("displacement = {}", c.displacement),
            format!("scroll_throttle_ms = {}", c.scroll_throttle.as_millis()),
            format!("deceleration_rate = {}", c.deceleration_rate),
            format!("settle_speed = {}", c.settle_speed),
            format!("drag_step = {}", c.drag_step),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/poster-carousel/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("poster-carousel").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        let mut ev = KeyEvent::new(code, modifiers);
        ev.kind = KeyEventKind::Press;
        ev
    }

    #[test]
    fn test_default_bindings() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::Right, KeyModifiers::NONE)),
            Some(Action::NextItem)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Char('h'), KeyModifiers::NONE)),
            Some(Action::PrevItem)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_parse_keybind() {
        assert_eq!(
            KeyBind::parse("Ctrl+n"),
            Some(KeyBind::new(KeyCode::Char('n'), KeyModifiers::CONTROL))
        );
        assert_eq!(
            KeyBind::parse("alt+left"),
            Some(KeyBind::new(KeyCode::Left, KeyModifiers::ALT))
        );
        assert_eq!(KeyBind::parse("F5"), Some(KeyBind::new(KeyCode::F(5), KeyModifiers::NONE)));
        assert_eq!(
            KeyBind::parse("G"),
            Some(KeyBind::new(KeyCode::Char('G'), KeyModifiers::NONE))
        );
        assert_eq!(KeyBind::parse("Hyper+x"), None);
        assert_eq!(KeyBind::parse("nonsense"), None);
    }

    #[test]
    fn test_parse_config_overrides() {
        let text = "\
# comment
viewport_width = 600
item_fraction = 0.5
displacement = 30
scroll_throttle_ms = 33
settle_speed = oops
next_item = n, Ctrl+Right
unknown_key = whatever
";
        let config = AppConfig::parse_config(text);
        assert_eq!(config.carousel.viewport_width, 600.0);
        assert_eq!(config.carousel.item_fraction, 0.5);
        assert_eq!(config.carousel.displacement, 30.0);
        assert_eq!(config.carousel.scroll_throttle, Duration::from_millis(33));
        // Unparsable values keep their default.
        assert_eq!(config.carousel.settle_speed, CarouselConfig::default().settle_speed);
        assert_eq!(
            config.match_key(key(KeyCode::Char('n'), KeyModifiers::NONE)),
            Some(Action::NextItem)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Right, KeyModifiers::CONTROL)),
            Some(Action::NextItem)
        );
        // Plain Right was replaced along with the rest of next_item's list.
        assert_eq!(config.match_key(key(KeyCode::Right, KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_serialise_then_parse_keeps_settings() {
        let mut config = AppConfig::default();
        config.carousel.displacement = 12.5;
        config
            .bindings
            .insert(Action::Reload, vec![KeyBind::new(KeyCode::F(5), KeyModifiers::NONE)]);
        let parsed = AppConfig::parse_config(&config.serialise());
        assert_eq!(parsed.carousel, config.carousel);
        assert_eq!(parsed.bindings, config.bindings);
    }

    #[test]
    fn test_save_and_load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("poster-carousel").join("config.toml");
        let mut config = AppConfig::default();
        config.carousel.viewport_width = 512.0;
        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.carousel.viewport_width, 512.0);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let loaded = AppConfig::load_from(Path::new("/definitely/not/here/config.toml"));
        assert_eq!(loaded.carousel, CarouselConfig::default());
    }

    #[test]
    fn test_status_hint_uses_bindings() {
        let hint = AppConfig::default().status_bar_hint();
        assert!(hint.starts_with("←/→"));
        assert!(hint.contains("r: reload"));
    }
}
