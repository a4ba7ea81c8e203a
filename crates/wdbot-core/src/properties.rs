//! Static table of the properties and instance types the rules refer to

use crate::id::{ItemId, PropertyId};
use std::fmt;

/// Whether a property holds one value or may legitimately hold several
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Scalar,
    Multi,
}

/// A property id paired with its human-readable name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    pub id: PropertyId,
    pub name: &'static str,
    pub cardinality: Cardinality,
}

impl Property {
    const fn scalar(id: u32, name: &'static str) -> Self {
        Self {
            id: PropertyId::from_raw(id),
            name,
            cardinality: Cardinality::Scalar,
        }
    }

    const fn multi(id: u32, name: &'static str) -> Self {
        Self {
            id: PropertyId::from_raw(id),
            name,
            cardinality: Cardinality::Multi,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.cardinality == Cardinality::Scalar
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.name)
    }
}

pub const INSTANCE_OF: Property = Property::multi(31, "instance of");
pub const TITLE: Property = Property::scalar(1476, "title");
pub const PART_OF_THE_SERIES: Property = Property::scalar(179, "part of the series");
pub const ORIGINAL_NETWORK: Property = Property::multi(449, "original broadcaster");
pub const COUNTRY_OF_ORIGIN: Property = Property::multi(495, "country of origin");
pub const ORIGINAL_LANGUAGE: Property = Property::multi(364, "original language of film or TV show");
pub const PRODUCTION_COMPANY: Property = Property::multi(272, "production company");
pub const PUBLICATION_DATE: Property = Property::scalar(577, "publication date");
pub const DIRECTOR: Property = Property::multi(57, "director");
pub const SEASON: Property = Property::scalar(4908, "season");
pub const NUMBER_OF_EPISODES: Property = Property::scalar(1113, "number of episodes");
pub const HAS_PART: Property = Property::multi(527, "has part");
pub const DURATION: Property = Property::scalar(2047, "duration");
pub const FOLLOWS: Property = Property::scalar(155, "follows");
pub const FOLLOWED_BY: Property = Property::scalar(156, "followed by");
pub const SERIES_ORDINAL: Property = Property::scalar(1545, "series ordinal");
pub const LANGUAGE_OF_WORK: Property = Property::multi(407, "language of work or name");

// Identifiers
pub const IMDB_ID: Property = Property::scalar(345, "IMDb ID");
pub const TV_COM_ID: Property = Property::scalar(2638, "TV.com ID");
pub const BOARD_GAME_GEEK_ID: Property = Property::scalar(2339, "BoardGameGeek ID");

/// Every property known by name
pub const ALL: &[Property] = &[
    INSTANCE_OF,
    TITLE,
    PART_OF_THE_SERIES,
    ORIGINAL_NETWORK,
    COUNTRY_OF_ORIGIN,
    ORIGINAL_LANGUAGE,
    PRODUCTION_COMPANY,
    PUBLICATION_DATE,
    DIRECTOR,
    SEASON,
    NUMBER_OF_EPISODES,
    HAS_PART,
    DURATION,
    FOLLOWS,
    FOLLOWED_BY,
    SERIES_ORDINAL,
    LANGUAGE_OF_WORK,
    IMDB_ID,
    TV_COM_ID,
    BOARD_GAME_GEEK_ID,
];

/// 'instance of' values
pub mod instance {
    use super::ItemId;

    pub const TELEVISION_SERIES_EPISODE: ItemId = ItemId::from_raw(21191270);
    pub const TELEVISION_SERIES_SEASON: ItemId = ItemId::from_raw(3464665);
    pub const TELEVISION_SERIES: ItemId = ItemId::from_raw(5398426);
    pub const ANIMATED_SERIES: ItemId = ItemId::from_raw(581714);
    pub const MINISERIES: ItemId = ItemId::from_raw(1259759);
    pub const BOARD_GAME: ItemId = ItemId::from_raw(131436);
}

/// Language items
pub const ENGLISH: ItemId = ItemId::from_raw(1860);

/// Look up a property by id.
///
/// Ids missing from the table resolve to a multi-valued property named
/// "unnamed property", so rules loaded from files can still reference them.
pub fn lookup(id: PropertyId) -> Property {
    ALL.iter().copied().find(|p| p.id == id).unwrap_or(Property {
        id,
        name: "unnamed property",
        cardinality: Cardinality::Multi,
    })
}
