//! Headless command scripts
//!
//! A script is a `;` or newline separated list of commands, for example
//! `goto 3; scale 1.5; font large; chapter intro`. Each command runs to
//! completion (animations settled, debounced work flushed) before the next.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};

use crate::backend::RenderLibrary;
use crate::gesture::TouchPoint;
use crate::keyboard::NavKey;
use crate::settings::FontSize;
use crate::theme::Theme;
use crate::viewer::{Destination, Viewer};

#[derive(Clone, Debug, PartialEq)]
pub enum ScriptCommand {
    GoTo(usize),
    Next,
    Prev,
    Scale(f32),
    Font(FontSize),
    Chapter(Destination),
    Slider(f64),
    DoubleTap,
    /// Two-finger pinch from one finger spread to another
    Pinch { from: f64, to: f64 },
    Key(NavKey),
    Theme(Theme),
    Resize { width: f64, height: f64 },
    Scroll(f64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptError {
    pub line: String,
    pub reason: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad command `{}`: {}", self.line, self.reason)
    }
}

impl std::error::Error for ScriptError {}

fn arg<T: FromStr>(line: &str, value: Option<&str>, what: &str) -> Result<T, ScriptError> {
    let err = |reason: String| ScriptError {
        line: line.to_string(),
        reason,
    };
    let value = value.ok_or_else(|| err(format!("missing {what}")))?;
    value
        .parse()
        .map_err(|_| err(format!("invalid {what} `{value}`")))
}

impl FromStr for ScriptCommand {
    type Err = ScriptError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();
        let command = match name.as_str() {
            "goto" | "page" => ScriptCommand::GoTo(arg(line, words.next(), "page")?),
            "next" => ScriptCommand::Next,
            "prev" => ScriptCommand::Prev,
            "scale" | "zoom" => ScriptCommand::Scale(arg(line, words.next(), "scale")?),
            "font" => {
                let size = words.next().unwrap_or_default();
                ScriptCommand::Font(size.parse().map_err(|reason| ScriptError {
                    line: line.to_string(),
                    reason,
                })?)
            }
            "chapter" => {
                let rest = line[name.len()..].trim();
                if rest.is_empty() {
                    return Err(ScriptError {
                        line: line.to_string(),
                        reason: "missing destination".into(),
                    });
                }
                ScriptCommand::Chapter(Destination::parse(rest))
            }
            "slider" => ScriptCommand::Slider(arg(line, words.next(), "slider value")?),
            "tap" => ScriptCommand::DoubleTap,
            "pinch" => ScriptCommand::Pinch {
                from: arg(line, words.next(), "start spread")?,
                to: arg(line, words.next(), "end spread")?,
            },
            "key" => {
                let key = words.next().unwrap_or_default();
                let parsed = if key.eq_ignore_ascii_case("space") {
                    Some(NavKey::Space)
                } else {
                    NavKey::from_dom_key(key)
                };
                ScriptCommand::Key(parsed.ok_or_else(|| ScriptError {
                    line: line.to_string(),
                    reason: format!("unknown key `{key}`"),
                })?)
            }
            "theme" => match words.next() {
                Some("dark") => ScriptCommand::Theme(Theme::dark()),
                Some("light") => ScriptCommand::Theme(Theme::light()),
                Some(background) => ScriptCommand::Theme(Theme::new("#000000", background)),
                None => {
                    return Err(ScriptError {
                        line: line.to_string(),
                        reason: "missing theme".into(),
                    });
                }
            },
            "resize" => ScriptCommand::Resize {
                width: arg(line, words.next(), "width")?,
                height: arg(line, words.next(), "height")?,
            },
            "scroll" => ScriptCommand::Scroll(arg(line, words.next(), "offset")?),
            _ => {
                return Err(ScriptError {
                    line: line.to_string(),
                    reason: "unknown command".into(),
                });
            }
        };
        Ok(command)
    }
}

pub fn parse_script(script: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    script
        .split([';', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::parse::<ScriptCommand>)
        .collect()
}

impl ScriptCommand {
    /// Run against `viewer` and settle. Failures are reported through the
    /// viewer's error events, so a script keeps going past them.
    pub fn execute<L: RenderLibrary>(&self, viewer: &mut Viewer<L>) {
        debug!("script: {self:?}");
        match self {
            ScriptCommand::GoTo(page) => viewer.go_to_page(*page),
            ScriptCommand::Next => viewer.next(),
            ScriptCommand::Prev => viewer.prev(),
            ScriptCommand::Scale(scale) => {
                if let Ok(false) = viewer.set_scale(*scale) {
                    warn!("Scale {scale} ignored");
                }
            }
            ScriptCommand::Font(size) => {
                if let Err(e) = viewer.set_font_size(*size) {
                    warn!("Font size change failed: {e}");
                }
            }
            ScriptCommand::Chapter(dest) => viewer.go_to_chapter(dest.clone()),
            ScriptCommand::Slider(value) => viewer.handle_slider_input(*value),
            ScriptCommand::DoubleTap => {
                let _ = viewer.handle_double_tap();
            }
            ScriptCommand::Pinch { from, to } => {
                let spread = |d: f64| [TouchPoint::new(0.0, 0.0), TouchPoint::new(d, 0.0)];
                viewer.handle_touch_start(&spread(*from));
                viewer.handle_touch_move(&spread(*to));
                viewer.handle_touch_end();
            }
            ScriptCommand::Key(key) => {
                viewer.handle_key(*key);
            }
            ScriptCommand::Theme(theme) => viewer.set_theme(theme),
            ScriptCommand::Resize { width, height } => viewer.resize(*width, *height),
            ScriptCommand::Scroll(top) => viewer.scroll_to(*top),
        }
        viewer.settle();
    }
}
