//! Parsing of the follow-up text the administrator sends in the add/remove flows.

use url::Url;

/// Separators accepted between the fields of an add-channel message
const FIELD_SEPARATORS: [char; 2] = ['|', '\n'];

/// Parsed add-channel input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInput {
    pub name: String,
    pub link: String,
    pub thumbnail: Option<String>,
}

fn parse_web_url(raw: &str, field: &str) -> Result<String, String> {
    let url = Url::parse(raw).map_err(|_| format!("{} is not a valid URL", field))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(format!("{} must be an http(s) URL", field));
    }
    Ok(raw.to_string())
}

/// Parses `name | link | thumbnail` (thumbnail optional).
///
/// Newlines work as separators too, so each field may go on its own line.
/// Returns a human-readable reason on failure.
pub fn parse_channel_input(text: &str) -> Result<ChannelInput, String> {
    let mut fields: Vec<&str> = text.split(FIELD_SEPARATORS).map(str::trim).collect();
    while fields.len() > 2 && fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }

    let (name, link, thumbnail) = match fields.as_slice() {
        [name, link] => (*name, *link, None),
        [name, link, thumbnail] => (*name, *link, Some(*thumbnail)),
        [] | [_] => return Err("expected a name and a link".to_string()),
        _ => return Err("too many fields, expected at most name, link and thumbnail".to_string()),
    };

    channel_input_from_fields(name, link, thumbnail)
}

/// Validates already separated fields. Shared with the offline CLI.
pub fn channel_input_from_fields(name: &str, link: &str, thumbnail: Option<&str>) -> Result<ChannelInput, String> {
    let name = name.trim();
    let link = link.trim();
    if name.is_empty() {
        return Err("name is empty".to_string());
    }
    if link.is_empty() {
        return Err("link is empty".to_string());
    }
    let link = parse_web_url(link, "link")?;
    let thumbnail = match thumbnail.map(str::trim).filter(|t| !t.is_empty()) {
        Some(raw) => Some(parse_web_url(raw, "thumbnail")?),
        None => None,
    };

    Ok(ChannelInput {
        name: name.to_string(),
        link,
        thumbnail,
    })
}

/// Parses a channel id typed by the administrator. A leading `#` is allowed.
pub fn parse_channel_id(text: &str) -> Result<i64, String> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    match digits.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("{:?} is not a channel id", trimmed)),
    }
}
