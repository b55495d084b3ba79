use crate::media_type::MediaKind;
use uuid::Uuid;

/// Strongly typed ID for catalog entries
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CatalogId(pub Uuid);

impl Default for CatalogId {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogId {
    pub fn new() -> Self {
        CatalogId(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for CatalogId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for CatalogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a record in the external metadata catalog.
///
/// Provider ids are only unique per kind, so the kind travels with the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalId {
    pub kind: MediaKind,
    pub id: u64,
}

impl ExternalId {
    pub fn new(kind: MediaKind, id: u64) -> Self {
        Self { kind, id }
    }

    pub fn movie(id: u64) -> Self {
        Self::new(MediaKind::Movie, id)
    }

    pub fn series(id: u64) -> Self {
        Self::new(MediaKind::Series, id)
    }
}

impl std::fmt::Display for ExternalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}
