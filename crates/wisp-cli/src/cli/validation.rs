use crate::cli::enums::SourcemapSetting;

/// Parse a `--sourcemap` value.
///
/// `inline` and `none` are taken literally; anything else means linked.
pub fn parse_sourcemap(s: &str) -> Result<SourcemapSetting, String> {
    Ok(match s {
        "inline" => SourcemapSetting::Inline,
        "none" => SourcemapSetting::None,
        _ => SourcemapSetting::Linked,
    })
}

/// Parse a `--env KEY=VALUE` pair.
///
/// The value may be empty or contain further `=` signs; the key must be a valid
/// identifier so that `process.env.KEY` is a valid member expression.
pub fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    let Some((key, value)) = s.split_once('=') else {
        return Err(format!("Expected KEY=VALUE, got '{}'", s));
    };

    if !is_env_key(key) {
        return Err(format!(
            "Environment key must start with a letter or underscore and contain only letters, numbers or underscores: '{}'",
            key
        ));
    }

    Ok((key.to_string(), value.to_string()))
}

/// `true` for keys usable as `process.env.<key>`.
pub(crate) fn is_env_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
