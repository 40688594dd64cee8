//! The server-side collections this front end administers.

use std::fmt;
use std::str::FromStr;

/// A REST collection exposed by the zoo records API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Species,
    Habitats,
    Diets,
    Classifications,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Species,
        Resource::Habitats,
        Resource::Diets,
        Resource::Classifications,
    ];

    /// Path segment of the collection endpoint.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Species => "species",
            Resource::Habitats => "habitats",
            Resource::Diets => "diets",
            Resource::Classifications => "classifications",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Resource::Species => "species",
            Resource::Habitats => "habitat",
            Resource::Diets => "diet",
            Resource::Classifications => "classification",
        }
    }

    /// Primary-key column in records of this collection.
    pub fn id_field(self) -> &'static str {
        match self {
            Resource::Species => "species_id",
            Resource::Habitats => "habitat_id",
            Resource::Diets => "diet_id",
            Resource::Classifications => "classification_id",
        }
    }

    /// Two-letter prefix of the `XX-###` identifier format.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Resource::Species => "SP",
            Resource::Habitats => "HA",
            Resource::Diets => "DI",
            Resource::Classifications => "CL",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "species" => Ok(Resource::Species),
            "habitat" | "habitats" => Ok(Resource::Habitats),
            "diet" | "diets" => Ok(Resource::Diets),
            "classification" | "classifications" => Ok(Resource::Classifications),
            other => Err(format!(
                "unknown resource `{other}`, expected species, habitats, diets or classifications"
            )),
        }
    }
}
