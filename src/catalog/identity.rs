use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const CATEGORY_ID_PREFIX: &str = "cat-";

/// Identifier assigned to a category at construction time (e.g., `cat-0`).
///
/// Ids are positional: inserting or reordering categories shifts them, so
/// consumers must not persist them across catalog edits.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    /// Id for the category declared at `position` (0-based).
    pub fn for_position(position: usize) -> Self {
        Self(format!("{CATEGORY_ID_PREFIX}{position}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content type of a document, selecting the external viewer.
///
/// The set is closed: the wire tags are `md`, `pdf` and `excel`, and any
/// other tag is rejected instead of being carried through.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DocumentKind {
    Markdown,
    Pdf,
    Excel,
}

/// Page of the site that displays a document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ViewerPage {
    #[serde(rename = "note.html")]
    Note,
    #[serde(rename = "excel.html")]
    Excel,
}

/// What the viewer offers for download.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadMode {
    /// The document folder (index file plus assets) packaged as an archive.
    FolderArchive,
    RawFile,
}

/// Routing data handed to the external viewer for one document kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ViewerRoute {
    pub page: ViewerPage,
    pub download: DownloadMode,
}

impl ViewerPage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerPage::Note => "note.html",
            ViewerPage::Excel => "excel.html",
        }
    }
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Markdown,
        DocumentKind::Pdf,
        DocumentKind::Excel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Markdown => "md",
            DocumentKind::Pdf => "pdf",
            DocumentKind::Excel => "excel",
        }
    }

    /// Parse a wire tag. Tags are case-sensitive.
    pub fn from_tag(value: &str) -> Option<Self> {
        match value {
            "md" => Some(DocumentKind::Markdown),
            "pdf" => Some(DocumentKind::Pdf),
            "excel" => Some(DocumentKind::Excel),
            _ => None,
        }
    }

    /// File the viewer opens inside a document folder; `None` when the
    /// document name already is the file.
    pub fn index_file(&self) -> Option<&'static str> {
        match self {
            DocumentKind::Markdown => Some("index.md"),
            DocumentKind::Pdf => Some("index.pdf"),
            DocumentKind::Excel => None,
        }
    }

    pub fn viewer(&self) -> ViewerRoute {
        match self {
            DocumentKind::Markdown => ViewerRoute {
                page: ViewerPage::Note,
                download: DownloadMode::FolderArchive,
            },
            DocumentKind::Pdf => ViewerRoute {
                page: ViewerPage::Note,
                download: DownloadMode::RawFile,
            },
            DocumentKind::Excel => ViewerRoute {
                page: ViewerPage::Excel,
                download: DownloadMode::RawFile,
            },
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DocumentKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DocumentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_tag(&value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unknown document type '{value}' (expected md|pdf|excel)"
            ))
        })
    }
}
