//! Pre-rendered charts and the home-page illustration.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::ImageOutputFormat;

use super::AssetError;

/// Fixed display size of the illustration.
pub const ILLUSTRATION_WIDTH: u32 = 500;
pub const ILLUSTRATION_HEIGHT: u32 = 300;
pub const ILLUSTRATION_CAPTION: &str = "Cardiovascular Disease";

/// Chart headings, in display order. The n-th title goes with the n-th
/// chart file produced by the analysis notebook.
pub const CHART_TITLES: [&str; 5] = [
    "Correlation Heatmap",
    "Cholesterol Level Distribution",
    "Activity Level Distribution",
    "Glucose Level Distribution",
    "Cholesterol Level Distribution Over Age",
];

/// A chart served byte-for-byte as supplied.
#[derive(Debug)]
pub struct Chart {
    pub title: &'static str,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct ChartGallery {
    charts: Vec<Chart>,
}

impl ChartGallery {
    /// Load every chart; `path_for(i)` names the file of chart `i`.
    pub fn load<F>(path_for: F) -> Result<Self, AssetError>
    where
        F: Fn(usize) -> PathBuf,
    {
        let mut charts = Vec::with_capacity(CHART_TITLES.len());
        for (i, title) in CHART_TITLES.iter().enumerate() {
            let path = path_for(i);
            let bytes = super::read_asset(&path)?;
            // Not re-encoded, only checked to be a known image format.
            image::guess_format(&bytes).map_err(|e| AssetError::Image {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            charts.push(Chart {
                title,
                content_type: mime_guess::from_path(&path)
                    .first_or_octet_stream()
                    .to_string(),
                bytes,
            });
        }
        tracing::info!(count = charts.len(), "Charts loaded");
        Ok(Self { charts })
    }

    pub fn get(&self, index: usize) -> Option<&Chart> {
        self.charts.get(index)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chart> {
        self.charts.iter()
    }
}

/// The illustration, resized once at load and kept as PNG.
#[derive(Debug)]
pub struct Illustration {
    pub width: u32,
    pub height: u32,
    pub caption: &'static str,
    pub png: Vec<u8>,
}

impl Illustration {
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let bytes = super::read_asset(path)?;
        Self::from_bytes(path, &bytes)
    }

    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Result<Self, AssetError> {
        let image_error = |reason: String| AssetError::Image {
            path: path.to_path_buf(),
            reason,
        };

        let decoded = image::load_from_memory(bytes).map_err(|e| image_error(e.to_string()))?;
        let resized = decoded.resize_exact(
            ILLUSTRATION_WIDTH,
            ILLUSTRATION_HEIGHT,
            FilterType::CatmullRom,
        );

        let mut cursor = Cursor::new(Vec::new());
        resized
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .map_err(|e| image_error(format!("PNG encoding failed: {e}")))?;

        Ok(Self {
            width: ILLUSTRATION_WIDTH,
            height: ILLUSTRATION_HEIGHT,
            caption: ILLUSTRATION_CAPTION,
            png: cursor.into_inner(),
        })
    }
}
