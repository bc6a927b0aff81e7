use serde::{Deserialize, Deserializer};

pub const BASE_MAP_SRC: &str = "/style/maps/osu/osu-base.svg";
pub const BUILDINGS_DATA_SRC: &str = "buildings.json";
pub const NO_IMAGE_SRC: &str = "style/images/buildings/no-image.jpg";

const OVERLAY_DIR: &str = "/style/maps/osu/buildings";
const PHOTO_DIR: &str = "style/images/buildings";
const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/";
const MAP_SEARCH_SUFFIX: &str = ", corvallis Oregon";

/// One building record from the campus dataset.
///
/// Field names on the wire follow the dataset file; every text field is
/// optional and an absent or `null` value reads as the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Building {
    #[serde(rename = "files")]
    pub id: String,
    #[serde(rename = "building", default, deserialize_with = "null_as_empty")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(rename = "info", default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub accessibility: String,
    #[serde(rename = "brInfo", default, deserialize_with = "null_as_empty")]
    pub secondary_info: String,
}

impl Building {
    /// Vector overlay drawn on the map at the building's local origin.
    pub fn overlay_src(&self) -> String {
        format!("{OVERLAY_DIR}/{}.svg", self.id)
    }

    /// Raster photo shown in the info panel.
    pub fn photo_src(&self) -> String {
        format!("{PHOTO_DIR}/{}.jpg", self.id)
    }
}

/// External map search link for an address.
pub fn map_search_url(address: &str) -> String {
    format!("{MAP_SEARCH_URL}{address}{MAP_SEARCH_SUFFIX}")
}

pub fn parse_buildings(json: &str) -> Result<Vec<Building>, serde_json::Error> {
    serde_json::from_str(json)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
