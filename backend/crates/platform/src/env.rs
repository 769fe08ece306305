//! Environment variable parsing

use std::error::Error;
use std::str::FromStr;
use thiserror::Error;

/// A variable was set but could not be parsed
#[derive(Debug, Error)]
#[error("invalid {name}: {raw:?}")]
pub struct InvalidEnvVar {
    pub name: String,
    pub raw: String,
    #[source]
    source: Box<dyn Error + Send + Sync>,
}

/// Parse `name` via `lookup`, falling back to `default` when unset or blank
pub fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, InvalidEnvVar>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|e| InvalidEnvVar {
                name: name.to_string(),
                raw: raw.clone(),
                source: Box::new(e),
            })
        }
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(value: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |_| value.map(str::to_string)
    }

    #[test]
    fn test_parse_or_default_when_unset_or_blank() {
        assert_eq!(parse_or(&lookup(None), "PORT", 8081u16).unwrap(), 8081);
        assert_eq!(parse_or(&lookup(Some("  ")), "PORT", 8081u16).unwrap(), 8081);
    }

    #[test]
    fn test_parse_or_trims_value() {
        assert_eq!(parse_or(&lookup(Some(" 9000 ")), "PORT", 8081u16).unwrap(), 9000);
    }

    #[test]
    fn test_parse_or_reports_variable() {
        let err = parse_or(&lookup(Some("eighty")), "PORT", 8081u16).unwrap_err();
        assert_eq!(err.name, "PORT");
        assert_eq!(err.raw, "eighty");
        assert!(err.source().is_some());
    }
}
