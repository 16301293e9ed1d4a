use std::borrow::Cow;

/// Returns the decoded value of the first query parameter whose decoded name
/// is `name`.
///
/// The URL must contain exactly one `?`. A parameter without `=` has an empty
/// value, and only the text up to a second `=` counts as the value. `+` is not
/// treated as a space.
pub fn get_request_param<S: AsRef<str>>(url: &str, name: S) -> Option<String> {
    let parts = url.split('?').collect::<Vec<_>>();
    if parts.len() != 2 {
        return None;
    }

    parts[1]
        .split('&')
        .map(|pair| {
            let mut pieces = pair.split('=');
            (pieces.next().unwrap_or(""), pieces.next().unwrap_or(""))
        })
        .find(|(key, _)| decode(key) == name.as_ref())
        .map(|(_, value)| decode(value).into_owned())
}

fn decode(component: &str) -> Cow<'_, str> {
    match urlencoding::decode_binary(component.as_bytes()) {
        Cow::Borrowed(_) => Cow::Borrowed(component),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    }
}
