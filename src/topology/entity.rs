//! Topological entity kinds that DOFs attach to.

use std::fmt;

/// The four topological levels a DOF can live on.
///
/// The declaration order is the numbering order: node DOFs come first, then
/// edge, face and finally cell-interior ("void") DOFs.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Mesh vertex.
    Node,
    /// Edge shared between cells.
    Edge,
    /// Face shared between (3D) cells.
    Face,
    /// Cell interior; never shared.
    Void,
}

impl EntityKind {
    /// All kinds in numbering order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Node,
        EntityKind::Edge,
        EntityKind::Face,
        EntityKind::Void,
    ];

    /// Whether distinct cells may share an entity of this kind.
    #[inline]
    pub const fn is_shared(self) -> bool {
        !matches!(self, EntityKind::Void)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Node => "node",
            EntityKind::Edge => "edge",
            EntityKind::Face => "face",
            EntityKind::Void => "cell interior",
        };
        f.write_str(name)
    }
}

/// A value per entity kind, indexed by [`EntityKind`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PerKind<T> {
    pub node: T,
    pub edge: T,
    pub face: T,
    #[serde(alias = "interior")]
    pub void: T,
}

impl<T> PerKind<T> {
    pub const fn new(node: T, edge: T, face: T, void: T) -> Self {
        Self {
            node,
            edge,
            face,
            void,
        }
    }

    #[inline]
    pub fn get(&self, kind: EntityKind) -> &T {
        match kind {
            EntityKind::Node => &self.node,
            EntityKind::Edge => &self.edge,
            EntityKind::Face => &self.face,
            EntityKind::Void => &self.void,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, kind: EntityKind) -> &mut T {
        match kind {
            EntityKind::Node => &mut self.node,
            EntityKind::Edge => &mut self.edge,
            EntityKind::Face => &mut self.face,
            EntityKind::Void => &mut self.void,
        }
    }

    /// Iterate `(kind, value)` pairs in numbering order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &T)> {
        EntityKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}
