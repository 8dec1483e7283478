//! URL builder

use std::collections::BTreeMap;

use reqwest::Url;

use crate::error::{EncodingError, WechatError};

/// Merge `params` into the query string of `base`.
///
/// A key present in `params` replaces every existing occurrence of that key
/// in `base`. The merged query is form-urlencoded with keys in sorted order.
///
/// # Errors
/// Returns [`EncodingError::MalformedUrl`] if `base` is not an absolute URL.
pub fn merge_query(base: &str, params: &[(String, String)]) -> Result<String, WechatError> {
    let mut url = Url::parse(base).map_err(|e| EncodingError::MalformedUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;

    let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in url.query_pairs() {
        merged
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    for (key, value) in params {
        merged.insert(key.clone(), vec![value.clone()]);
    }

    if merged.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(
            merged
                .iter()
                .flat_map(|(key, values)| values.iter().map(move |v| (key.as_str(), v.as_str()))),
        );
    }

    Ok(url.into())
}
