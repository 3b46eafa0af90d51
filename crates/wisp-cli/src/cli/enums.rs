use serde::{Deserialize, Serialize};
use wisp_bundler::SourceMapMode;

/// Source map generation mode
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcemapSetting {
    /// No source maps
    #[default]
    None,

    /// Source map embedded as a data URL in the output file
    Inline,

    /// Separate .map file referenced from the output
    Linked,
}

impl From<SourcemapSetting> for SourceMapMode {
    fn from(setting: SourcemapSetting) -> Self {
        match setting {
            SourcemapSetting::None => SourceMapMode::None,
            SourcemapSetting::Inline => SourceMapMode::Inline,
            SourcemapSetting::Linked => SourceMapMode::Linked,
        }
    }
}
