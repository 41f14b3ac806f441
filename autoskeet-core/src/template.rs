//! Message template rendering.
//!
//! Templates use `{name}` placeholders. `{{` and `}}` produce literal braces.
//! Only `title` and `link` are known; anything else is rejected when the
//! template is rendered, not when it is configured.
//!
//! A placeholder may carry a conversion and a string format spec, as in
//! `{title!r}` or `{link:>40}`: `!s`, `!r` and `!a`, then
//! `[[fill]align][0][width][.precision][s]` with `<`, `>` or `^` alignment.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder '{{{0}}}'")]
    UnknownPlaceholder(String),

    #[error("single '{{' encountered in template at byte {0}")]
    UnclosedBrace(usize),

    #[error("single '}}' encountered in template at byte {0}")]
    UnmatchedClosingBrace(usize),

    #[error("invalid conversion in '{{{0}}}'")]
    InvalidConversion(String),

    #[error("invalid format spec '{0}'")]
    InvalidFormatSpec(String),
}

pub fn render_template(template: &str, title: &str, link: &str) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + title.len() + link.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, next)| next == '{').is_some() {
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) | None => return Err(TemplateError::UnclosedBrace(pos)),
                        Some((_, ch)) => name.push(ch),
                    }
                }
                out.push_str(&render_field(&name, title, link)?);
            }
            '}' => {
                if chars.next_if(|&(_, next)| next == '}').is_none() {
                    return Err(TemplateError::UnmatchedClosingBrace(pos));
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Renders one `name[!conversion][:spec]` field.
fn render_field(field: &str, title: &str, link: &str) -> Result<String, TemplateError> {
    let name_end = field.find(&['!', ':'][..]).unwrap_or(field.len());
    let (name, rest) = field.split_at(name_end);

    let value = match name {
        "title" => title,
        "link" => link,
        _ => return Err(TemplateError::UnknownPlaceholder(name.to_string())),
    };

    let (conversion, spec) = match rest.strip_prefix('!') {
        Some(after) => {
            let mut chars = after.chars();
            let conversion = chars.next();
            let remainder = chars.as_str();
            let spec = match remainder.strip_prefix(':') {
                Some(spec) => spec,
                None if remainder.is_empty() => "",
                None => return Err(TemplateError::InvalidConversion(field.to_string())),
            };
            (conversion, spec)
        }
        None => (None, rest.strip_prefix(':').unwrap_or_default()),
    };

    let converted = match conversion {
        None | Some('s') => value.to_string(),
        Some('r') => quote(value, false),
        Some('a') => quote(value, true),
        Some(_) => return Err(TemplateError::InvalidConversion(field.to_string())),
    };

    apply_format_spec(&converted, spec)
}

/// Single-quoted literal form of `value`, switching to double quotes when the
/// value contains `'` but no `"`. With `ascii_only`, non-ASCII characters are
/// written as `\x`, `\u` or `\U` escapes.
fn quote(value: &str, ascii_only: bool) -> String {
    let delim = if value.contains('\'') && !value.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(delim);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c if ascii_only && !c.is_ascii() => {
                let code = c as u32;
                if code <= 0xff {
                    out.push_str(&format!("\\x{:02x}", code));
                } else if code <= 0xffff {
                    out.push_str(&format!("\\u{:04x}", code));
                } else {
                    out.push_str(&format!("\\U{:08x}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

fn apply_format_spec(value: &str, spec: &str) -> Result<String, TemplateError> {
    if spec.is_empty() {
        return Ok(value.to_string());
    }

    let invalid = || TemplateError::InvalidFormatSpec(spec.to_string());
    let chars: Vec<char> = spec.chars().collect();
    let is_align = |c: char| matches!(c, '<' | '>' | '^');

    let mut i = 0;
    let mut fill = ' ';
    let mut align = '<';
    if chars.len() >= 2 && is_align(chars[1]) {
        fill = chars[0];
        align = chars[1];
        i = 2;
    } else if is_align(chars[0]) {
        align = chars[0];
        i = 1;
    } else if chars[0] == '0' {
        fill = '0';
    }

    let width = take_number(&chars, &mut i);
    let precision = if chars.get(i) == Some(&'.') {
        i += 1;
        Some(take_number(&chars, &mut i).ok_or_else(invalid)?)
    } else {
        None
    };
    if chars.get(i) == Some(&'s') {
        i += 1;
    }
    if i != chars.len() {
        return Err(invalid());
    }

    let text: String = match precision {
        Some(p) => value.chars().take(p).collect(),
        None => value.to_string(),
    };
    let len = text.chars().count();
    let pad = match width {
        Some(w) if w > len => w - len,
        _ => return Ok(text),
    };

    let (left, right) = match align {
        '>' => (pad, 0),
        '^' => (pad / 2, pad - pad / 2),
        _ => (0, pad),
    };
    let mut out = String::with_capacity(text.len() + pad * fill.len_utf8());
    out.extend(std::iter::repeat_n(fill, left));
    out.push_str(&text);
    out.extend(std::iter::repeat_n(fill, right));
    Ok(out)
}

fn take_number(chars: &[char], i: &mut usize) -> Option<usize> {
    let start = *i;
    while chars.get(*i).is_some_and(|c| c.is_ascii_digit()) {
        *i += 1;
    }
    if *i == start {
        return None;
    }
    chars[start..*i].iter().collect::<String>().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_title_and_link() {
        let text = render_template("{title} - {link}", "Live on YouTube!", "https://youtube.com/x").unwrap();
        assert_eq!(text, "Live on YouTube! - https://youtube.com/x");
    }

    #[test]
    fn test_default_style_template() {
        let text = render_template(
            "hey cuties, i'm 🔴 live now! 🔴 | {title} - come hang out: {link}",
            "Live on Twitch!",
            "https://twitch.tv/x",
        )
        .unwrap();
        assert_eq!(
            text,
            "hey cuties, i'm 🔴 live now! 🔴 | Live on Twitch! - come hang out: https://twitch.tv/x"
        );
    }

    #[test]
    fn test_repeated_and_missing_placeholders() {
        assert_eq!(render_template("{link} {link}", "t", "l").unwrap(), "l l");
        assert_eq!(render_template("going live", "t", "l").unwrap(), "going live");
        assert_eq!(render_template("", "t", "l").unwrap(), "");
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(render_template("{{{title}}}", "t", "l").unwrap(), "{t}");
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            render_template("{game}", "t", "l"),
            Err(TemplateError::UnknownPlaceholder("game".into()))
        );
        assert_eq!(render_template("oops {title", "t", "l"), Err(TemplateError::UnclosedBrace(5)));
        assert_eq!(render_template("a } b", "t", "l"), Err(TemplateError::UnmatchedClosingBrace(2)));
    }

    #[test]
    fn test_conversions_and_format_specs() {
        assert_eq!(render_template("{title!s} {link:>3}", "t", "l").unwrap(), "t   l");
        assert_eq!(render_template("[{title:^7}]", "live", "l").unwrap(), "[ live  ]");
        assert_eq!(render_template("[{title:*<6}]", "live", "l").unwrap(), "[live**]");
        assert_eq!(render_template("{title:.4}", "Live on Twitch!", "l").unwrap(), "Live");
        assert_eq!(render_template("{title:05s}", "ab", "l").unwrap(), "ab000");
        assert_eq!(render_template("{title:2}", "long", "l").unwrap(), "long");
        assert_eq!(render_template("{title!r:}", "it's", "l").unwrap(), "\"it's\"");
        assert_eq!(render_template("{title!r}", "live", "l").unwrap(), "'live'");
        assert_eq!(render_template("{title!a}", "🔴", "l").unwrap(), "'\\U0001f534'");
    }

    #[test]
    fn test_bad_conversions_and_specs() {
        assert_eq!(
            render_template("{title!x}", "t", "l"),
            Err(TemplateError::InvalidConversion("title!x".into()))
        );
        assert_eq!(
            render_template("{title!sx}", "t", "l"),
            Err(TemplateError::InvalidConversion("title!sx".into()))
        );
        assert_eq!(
            render_template("{link:+5}", "t", "l"),
            Err(TemplateError::InvalidFormatSpec("+5".into()))
        );
        assert_eq!(
            render_template("{game!s}", "t", "l"),
            Err(TemplateError::UnknownPlaceholder("game".into()))
        );
    }
}
