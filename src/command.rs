//! Terminal commands and how they map onto controller setters.

use std::path::PathBuf;
use std::str::FromStr;

use crate::{
    color::Channel,
    error::Result,
    generator::{ColorTarget, GenerationController},
    models::TextAlign,
};

pub const HELP: &str = "\
commands:
  text <text>               set the emoji text (empty clears the preview)
  font <id>                 select a typeface
  fonts                     list available typefaces
  color <text|bg> <hex>     set a color (#rgb, #rgba, #rrggbb, #rrggbbaa)
  preset <text|bg> <hex>    apply a swatch, keeping the current alpha
  channel <text|bg> <r|g|b|a> <value>
                            set one color channel
  bg <on|off>               toggle the background color
  align <left|center|right> set the text alignment
  fixed <on|off>            fixed text size
  stretch <on|off>          disable stretching
  show                      print the current settings and preview
  save [dir]                write the current image to disk
  help                      show this help
  quit                      exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Text(String),
    Font(String),
    Fonts,
    Color(ColorTarget, String),
    Preset(ColorTarget, String),
    Channel(ColorTarget, Channel, f64),
    Background(bool),
    Align(TextAlign),
    SizeFixed(bool),
    StretchDisabled(bool),
    Show,
    Save(Option<PathBuf>),
    Help,
    Quit,
}

fn parse_switch(value: &str) -> std::result::Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(format!("expected on/off, got '{}'", other)),
    }
}

fn required<'a>(arg: Option<&'a str>, what: &str) -> std::result::Result<&'a str, String> {
    arg.map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| format!("missing {}", what))
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let line = line.trim_start();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim_start())),
            None => (line.trim_end(), None),
        };
        let mut args = rest.unwrap_or("").split_whitespace();

        let command = match name.to_ascii_lowercase().as_str() {
            // Text keeps inner spaces; a bare `text` clears it.
            "text" => Command::Text(rest.unwrap_or("").to_string()),
            "font" => Command::Font(required(args.next(), "font id")?.to_string()),
            "fonts" => Command::Fonts,
            "color" => Command::Color(
                required(args.next(), "color target")?.parse()?,
                required(args.next(), "hex color")?.to_string(),
            ),
            "preset" => Command::Preset(
                required(args.next(), "color target")?.parse()?,
                required(args.next(), "hex color")?.to_string(),
            ),
            "channel" | "alpha" => {
                let target = required(args.next(), "color target")?.parse()?;
                let channel = if name.eq_ignore_ascii_case("alpha") {
                    Channel::A
                } else {
                    required(args.next(), "channel")?.parse()?
                };
                let raw = required(args.next(), "value")?;
                let value = raw
                    .parse::<f64>()
                    .map_err(|_| format!("'{}' is not a number", raw))?;
                Command::Channel(target, channel, value)
            }
            "bg" => Command::Background(parse_switch(required(args.next(), "on/off")?)?),
            "align" => Command::Align(required(args.next(), "alignment")?.parse()?),
            "fixed" => Command::SizeFixed(parse_switch(required(args.next(), "on/off")?)?),
            "stretch" => Command::StretchDisabled(parse_switch(required(args.next(), "on/off")?)?),
            "show" | "" => Command::Show,
            "save" => Command::Save(args.next().map(PathBuf::from)),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(command)
    }
}

impl Command {
    /// Applies an editing command. Returns `Ok(None)` for commands the
    /// front end handles itself, otherwise whether the state changed.
    pub fn apply(&self, controller: &GenerationController) -> Result<Option<bool>> {
        let changed = match self {
            Command::Text(text) => controller.set_text(text),
            Command::Font(font) => controller.set_typeface(font),
            Command::Color(target, hex) => controller.set_color(*target, hex)?,
            Command::Preset(target, hex) => controller.apply_preset(*target, hex)?,
            Command::Channel(target, channel, value) => {
                controller.set_channel(*target, *channel, *value)
            }
            Command::Background(enabled) => controller.set_background_enabled(*enabled),
            Command::Align(align) => controller.set_align(*align),
            Command::SizeFixed(fixed) => controller.set_size_fixed(*fixed),
            Command::StretchDisabled(disabled) => controller.set_stretch_disabled(*disabled),
            Command::Fonts | Command::Show | Command::Save(_) | Command::Help | Command::Quit => {
                return Ok(None)
            }
        };
        Ok(Some(changed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        line.parse().unwrap()
    }

    #[test]
    fn test_parse_editing_commands() {
        assert_eq!(parse("text hello world"), Command::Text("hello world".into()));
        assert_eq!(parse("text"), Command::Text(String::new()));
        assert_eq!(parse("font mplus-bold"), Command::Font("mplus-bold".into()));
        assert_eq!(
            parse("color bg #ff000080"),
            Command::Color(ColorTarget::Background, "#ff000080".into())
        );
        assert_eq!(
            parse("preset text #EF4444"),
            Command::Preset(ColorTarget::Text, "#EF4444".into())
        );
        assert_eq!(
            parse("channel text r 128"),
            Command::Channel(ColorTarget::Text, Channel::R, 128.0)
        );
        assert_eq!(
            parse("alpha bg 0.5"),
            Command::Channel(ColorTarget::Background, Channel::A, 0.5)
        );
        assert_eq!(parse("bg on"), Command::Background(true));
        assert_eq!(parse("align RIGHT"), Command::Align(TextAlign::Right));
        assert_eq!(parse("fixed off"), Command::SizeFixed(false));
        assert_eq!(parse("stretch yes"), Command::StretchDisabled(true));
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        assert_eq!(parse("text  hi there"), Command::Text("hi there".into()));
        assert_eq!(parse("text\thi"), Command::Text("hi".into()));
        assert_eq!(parse("  font\t mplus"), Command::Font("mplus".into()));
        assert_eq!(parse("align\tleft\r\n"), Command::Align(TextAlign::Left));
    }

    #[test]
    fn test_parse_front_end_commands() {
        assert_eq!(parse("save"), Command::Save(None));
        assert_eq!(parse("save out"), Command::Save(Some(PathBuf::from("out"))));
        assert_eq!(parse(""), Command::Show);
        assert_eq!(parse("q"), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!("dance".parse::<Command>().is_err());
        assert!("font".parse::<Command>().is_err());
        assert!("align middle".parse::<Command>().is_err());
        assert!("channel text x 1".parse::<Command>().is_err());
        assert!("alpha text lots".parse::<Command>().is_err());
        assert!("bg maybe".parse::<Command>().is_err());
    }
}
