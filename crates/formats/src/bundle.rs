use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::basemap::BaseMap;
use crate::dataset::CountryDataset;
use crate::error::AssetError;
use crate::regions::RegionSet;
use crate::theme::ThemeTokens;

/// File names of an asset directory. `assets.json` may override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub basemap: String,
    pub countries: String,
    pub regions: String,
    pub theme: Option<String>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            basemap: "basemap.geojson".to_string(),
            countries: "countries.json".to_string(),
            regions: "regions.json".to_string(),
            theme: Some("theme.json".to_string()),
        }
    }
}

pub const MANIFEST_FILE: &str = "assets.json";

/// Everything the globe needs at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetBundle {
    pub basemap: BaseMap,
    pub dataset: CountryDataset,
    pub regions: RegionSet,
    pub theme: ThemeTokens,
}

impl AssetBundle {
    pub fn from_strs(
        basemap: &str,
        countries: &str,
        regions: &str,
        theme: Option<&str>,
    ) -> Result<Self, AssetError> {
        Ok(Self {
            basemap: BaseMap::from_geojson_str(basemap)?,
            dataset: CountryDataset::from_json_str(countries)?,
            regions: RegionSet::from_json_str(regions)?,
            theme: match theme {
                Some(t) => ThemeTokens::from_json_str(t)?,
                None => ThemeTokens::default(),
            },
        })
    }

    /// Blocking load of an asset directory. Any failure aborts the whole load.
    pub fn load_dir(root: impl AsRef<Path>) -> Result<Self, AssetError> {
        let root = root.as_ref();
        let manifest_path = root.join(MANIFEST_FILE);
        let manifest = if manifest_path.exists() {
            serde_json::from_str(&read(&manifest_path)?)
                .map_err(AssetError::json("asset manifest"))?
        } else {
            AssetManifest::default()
        };

        let theme = match &manifest.theme {
            Some(name) if root.join(name).exists() => Some(read(&root.join(name))?),
            _ => None,
        };
        let bundle = Self::from_strs(
            &read(&root.join(&manifest.basemap))?,
            &read(&root.join(&manifest.countries))?,
            &read(&root.join(&manifest.regions))?,
            theme.as_deref(),
        )?;
        info!(
            root = %root.display(),
            countries = bundle.basemap.countries.len(),
            regions = bundle.regions.regions.len(),
            "assets loaded"
        );
        Ok(bundle)
    }
}

fn read(path: &PathBuf) -> Result<String, AssetError> {
    fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.clone(),
        source,
    })
}
