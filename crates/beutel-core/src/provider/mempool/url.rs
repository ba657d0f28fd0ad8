use reqwest::Url;

use crate::error::CoreError;

pub(super) fn parse_base_url(base_url: &str) -> Result<Url, CoreError> {
    let parsed = Url::parse(base_url).map_err(|e| {
        CoreError::Validation(format!(
            "invalid upstream url `{base_url}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(CoreError::Validation(format!(
            "unsupported upstream url scheme `{other}`; expected http or https"
        ))),
    }
}

/// Append `segments` to the base URL's path, percent-encoding each one so a
/// caller-supplied address can never reach a different endpoint.
pub(super) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, CoreError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| CoreError::Validation(format!("upstream url `{base}` cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
