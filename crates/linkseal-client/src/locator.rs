//! Share-link construction and fragment extraction.

use crate::store::MessageId;

/// Location of a stored message: `<base>/message/<id>`.
///
/// The decryption key is appended as a URL fragment by
/// [`MessageLocator::share_url`] and ONLY there. Fetching goes through
/// [`FetchRequest`](crate::FetchRequest), which has no key field, so the
/// fragment structurally cannot reach the storage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLocator {
    base: String,
    id: MessageId,
}

impl MessageLocator {
    /// Create a locator under the given base URL (trailing `/` tolerated).
    pub fn new(base: impl Into<String>, id: MessageId) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base, id }
    }

    /// Message id within the store.
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Plain message URL, without any key: `<base>/message/<id>`.
    pub fn url(&self) -> String {
        format!("{}/message/{}", self.base, self.id)
    }

    /// Shareable URL with the key in the fragment:
    /// `<base>/message/<id>#<key>`.
    pub fn share_url(&self, key_str: &str) -> String {
        format!("{}#{}", self.url(), key_str)
    }
}

/// Extract the fragment from a URL, if present and non-empty.
///
/// The receiving side reads its decryption key from here. Returns `None`
/// for URLs without a fragment or with an empty one, which selects the
/// server-side decryption path.
pub fn fragment_of(url: &str) -> Option<&str> {
    match url.split_once('#') {
        Some((_, fragment)) if !fragment.is_empty() => Some(fragment),
        _ => None,
    }
}

/// Parse a message URL into its id and optional fragment key.
///
/// Accepts both the plain and the share form of a locator URL. Returns
/// `None` if the path does not end in `message/<uuid>`.
pub fn parse_share_url(url: &str) -> Option<(MessageId, Option<&str>)> {
    let (location, fragment) = match url.split_once('#') {
        Some((location, fragment)) if !fragment.is_empty() => (location, Some(fragment)),
        Some((location, _)) => (location, None),
        None => (url, None),
    };

    let mut segments = location.trim_end_matches('/').rsplit('/');
    let id = MessageId::parse_str(segments.next()?).ok()?;
    if segments.next() != Some("message") {
        return None;
    }
    Some((id, fragment))
}
