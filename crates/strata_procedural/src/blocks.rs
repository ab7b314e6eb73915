//! # Block Table
//!
//! Maps block names to integer identifiers.
//!
//! Identifiers are positive. Zero is air, and a negated identifier marks the
//! background variant of a block (cave walls are `-stone`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{WorldError, WorldResult};

/// Block type identifier stored in chunk cells.
pub type BlockId = i32;

/// Identifier of an empty cell.
pub const AIR: BlockId = 0;

/// Name → identifier mapping supplied by the asset layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockTable {
    ids: BTreeMap<String, BlockId>,
}

impl BlockTable {
    /// Block names the terrain generator needs.
    pub const REQUIRED: [&'static str; 3] = ["grass", "dirt", "stone"];

    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table assigning identifiers `1, 2, 3, ...` in iteration order.
    ///
    /// This matches texture atlas enumeration, shifted by one so that zero
    /// stays free for air.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_procedural::BlockTable;
    ///
    /// let table = BlockTable::from_names(["grass", "dirt", "stone"]);
    /// assert_eq!(table.get("dirt"), Some(2));
    /// ```
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        let mut next: BlockId = 1;
        for name in names {
            let name = name.into();
            if table.ids.contains_key(&name) {
                continue;
            }
            table.ids.insert(name, next);
            next += 1;
        }
        table
    }

    /// The table used when no asset layer provides one.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_names(Self::REQUIRED)
    }

    /// Registers `name` under `id`, returning the previous identifier.
    pub fn insert(&mut self, name: impl Into<String>, id: BlockId) -> Option<BlockId> {
        self.ids.insert(name.into(), id)
    }

    /// Looks up the identifier of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<BlockId> {
        self.ids.get(name).copied()
    }

    /// Finds the name of a block identifier, ignoring the variant sign.
    #[must_use]
    pub fn name_of(&self, id: BlockId) -> Option<&str> {
        if id == AIR {
            return None;
        }
        let base = id.checked_abs()?;
        self.ids
            .iter()
            .find(|(_, &candidate)| candidate == base)
            .map(|(name, _)| name.as_str())
    }

    /// Number of registered blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if no blocks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates over `(name, id)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, BlockId)> {
        self.ids.iter().map(|(name, &id)| (name.as_str(), id))
    }

    /// Checks that every identifier is positive and unique.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidBlockId`] or [`WorldError::DuplicateBlockId`].
    pub fn validate(&self) -> WorldResult<()> {
        let mut seen: BTreeMap<BlockId, &str> = BTreeMap::new();
        for (name, id) in self.iter() {
            if id <= AIR {
                return Err(WorldError::InvalidBlockId {
                    name: name.to_owned(),
                    id,
                });
            }
            if let Some(first) = seen.insert(id, name) {
                return Err(WorldError::DuplicateBlockId {
                    first: first.to_owned(),
                    second: name.to_owned(),
                    id,
                });
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, BlockId)> for BlockTable {
    fn from_iter<I: IntoIterator<Item = (S, BlockId)>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(|(name, id)| (name.into(), id)).collect(),
        }
    }
}

/// The identifiers terrain generation writes, resolved once per world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainPalette {
    /// Surface block with open air directly above.
    pub grass: BlockId,
    /// Shallow subsurface block.
    pub dirt: BlockId,
    /// Deep solid block.
    pub stone: BlockId,
}

impl TerrainPalette {
    /// Resolves the palette from a validated table.
    ///
    /// # Errors
    ///
    /// Fails if the table is invalid or lacks `grass`, `dirt` or `stone`.
    pub fn resolve(table: &BlockTable) -> WorldResult<Self> {
        table.validate()?;
        let lookup = |name: &'static str| table.get(name).ok_or(WorldError::MissingBlock(name));
        Ok(Self {
            grass: lookup("grass")?,
            dirt: lookup("dirt")?,
            stone: lookup("stone")?,
        })
    }

    /// Background stone, drawn behind caves.
    #[inline]
    #[must_use]
    pub const fn background_stone(self) -> BlockId {
        -self.stone
    }
}
