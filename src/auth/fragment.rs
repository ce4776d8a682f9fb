//INFO: Parsing of the OAuth redirect fragment
//NOTE: Pure functions, safe to run on every load

use url::{form_urlencoded, Url};

//INFO: Extracts `access_token` from a raw fragment (without the leading `#`)
//NOTE: First occurrence wins and an empty value counts as absent
pub fn access_token_from_fragment(fragment: &str) -> Option<String> {
    form_urlencoded::parse(fragment.as_bytes())
        .find(|(key, _)| key == "access_token")
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}

//INFO: Extracts `access_token` from a full location URL
pub fn access_token_from_url(location: &Url) -> Option<String> {
    location.fragment().and_then(access_token_from_fragment)
}

//INFO: The same location with the fragment removed
pub fn without_fragment(location: &Url) -> Url {
    let mut cleaned = location.clone();
    cleaned.set_fragment(None);
    cleaned
}
