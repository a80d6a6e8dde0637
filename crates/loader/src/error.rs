use formats::AttributeError;
use runtime::event_bus::Severity;

/// A fragment could not be retrieved.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchError {
    pub url: String,
    pub message: String,
}

impl FetchError {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to fetch {}: {}", self.url, self.message)
    }
}

impl std::error::Error for FetchError {}

/// A problem confined to one fragment or element. Never propagated: the
/// loader records it and carries on with the rest of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The fragment has no `<world>` element; its subtree is abandoned.
    MissingRootWorld { url: String },
    /// A nested `<world>` without `src`; the element is skipped.
    MissingEmbedSource { parent_url: String },
    /// A nested `<world>` whose `src` is already being loaded further up the
    /// tree.
    CyclicEmbed { url: String },
    Fetch(FetchError),
    UnknownExtension { name: String, url: String },
    ExtensionFailed {
        name: String,
        url: String,
        message: String,
    },
    /// Malformed `xy`, `angle` or `size`; the element is skipped.
    InvalidAttribute {
        url: String,
        tag: String,
        source: AttributeError,
    },
}

impl LoadError {
    /// Event kind recorded on the session's event bus.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::MissingRootWorld { .. } => "missing_root_world",
            LoadError::MissingEmbedSource { .. } => "missing_embed_source",
            LoadError::CyclicEmbed { .. } => "cyclic_embed",
            LoadError::Fetch(_) => "fetch_failed",
            LoadError::UnknownExtension { .. } => "unknown_extension",
            LoadError::ExtensionFailed { .. } => "extension_failed",
            LoadError::InvalidAttribute { .. } => "invalid_attribute",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            LoadError::Fetch(_) | LoadError::ExtensionFailed { .. } => Severity::Error,
            _ => Severity::Warn,
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::MissingRootWorld { url } => write!(f, "{url} has no <world> element"),
            LoadError::MissingEmbedSource { parent_url } => {
                write!(f, "<world> without src in {parent_url}")
            }
            LoadError::CyclicEmbed { url } => write!(f, "{url} embeds itself; skipped"),
            LoadError::Fetch(err) => err.fmt(f),
            LoadError::UnknownExtension { name, url } => {
                write!(f, "unknown extension '{name}' in {url}")
            }
            LoadError::ExtensionFailed { name, url, message } => {
                write!(f, "extension '{name}' in {url} failed: {message}")
            }
            LoadError::InvalidAttribute { url, tag, source } => {
                write!(f, "<{tag}> in {url}: {source}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Fetch(err) => Some(err),
            LoadError::InvalidAttribute { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FetchError> for LoadError {
    fn from(err: FetchError) -> Self {
        LoadError::Fetch(err)
    }
}
