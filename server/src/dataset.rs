use std::fmt;
use std::path::{Path, PathBuf};

use campus_map_shared::Building;
use campus_map_shared::building::BUILDINGS_DATA_SRC;

#[derive(Debug)]
pub enum DatasetError {
    Read(PathBuf, std::io::Error),
    Parse(PathBuf, serde_json::Error),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(path, e) => write!(f, "cannot read {}: {e}", path.display()),
            Self::Parse(path, e) => write!(f, "invalid building data in {}: {e}", path.display()),
        }
    }
}

impl std::error::Error for DatasetError {}

/// Result of checking the building dataset against the public directory.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub buildings: usize,
    /// Records with an empty asset stem; the client cannot load anything for them.
    pub unnamed: usize,
    /// Ids whose overlay SVG is absent; the client will leave them off the map.
    pub missing_overlays: Vec<String>,
}

/// Parse the dataset served to the client and check that each overlay exists.
pub async fn validate(public_dir: &Path) -> Result<DatasetSummary, DatasetError> {
    let path = public_dir.join(BUILDINGS_DATA_SRC);
    let json = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| DatasetError::Read(path.clone(), e))?;
    let buildings =
        campus_map_shared::parse_buildings(&json).map_err(|e| DatasetError::Parse(path, e))?;

    let mut summary = DatasetSummary {
        buildings: buildings.len(),
        ..DatasetSummary::default()
    };
    for building in &buildings {
        if building.id.is_empty() {
            summary.unnamed += 1;
            continue;
        }
        let overlay = overlay_path(public_dir, building);
        if !tokio::fs::try_exists(&overlay).await.unwrap_or(false) {
            summary.missing_overlays.push(building.id.clone());
        }
    }
    Ok(summary)
}

fn overlay_path(public_dir: &Path, building: &Building) -> PathBuf {
    public_dir.join(building.overlay_src().trim_start_matches('/'))
}
