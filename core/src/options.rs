//! Query-string options shared by several endpoints.

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::Error;

/// Options for endpoints with localized responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct I18nOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl I18nOptions {
    pub fn language(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
        }
    }
}

/// Replace the query string of `path` with the fields of `opts`.
///
/// `opts` must serialize to a flat object. Null fields are skipped, arrays
/// repeat their key, and keys are emitted in sorted order. `None` leaves the
/// path unchanged.
pub fn add_options<O>(path: &str, opts: Option<&O>) -> Result<String, Error>
where
    O: Serialize + ?Sized,
{
    let Some(opts) = opts else {
        return Ok(path.to_string());
    };

    check_percent_encoding(path)?;

    let fields = match serde_json::to_value(opts).map_err(|e| Error::Options(e.to_string()))? {
        Value::Object(fields) => fields,
        other => {
            return Err(Error::Options(format!(
                "expected an object of options, got {other}"
            )))
        }
    };

    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &fields {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(item) = scalar(key, item)? {
                        query.append_pair(key, &item);
                    }
                }
            }
            value => {
                if let Some(value) = scalar(key, value)? {
                    query.append_pair(key, &value);
                }
            }
        }
    }
    let query = query.finish();

    let (base, fragment) = match path.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (path, None),
    };
    let base = base.split_once('?').map_or(base, |(base, _)| base);

    let mut out = base.to_string();
    if !query.is_empty() {
        out.push('?');
        out.push_str(&query);
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    Ok(out)
}

fn scalar(key: &str, value: &Value) -> Result<Option<String>, Error> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => {
            Err(Error::Options(format!("option {key:?} is not a scalar")))
        }
    }
}

fn check_percent_encoding(path: &str) -> Result<(), Error> {
    let bytes = path.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|e| e.iter().all(u8::is_ascii_hexdigit)) {
                return Err(Error::Options(format!(
                    "invalid percent-encoding in {path:?}"
                )));
            }
        }
    }
    Ok(())
}
