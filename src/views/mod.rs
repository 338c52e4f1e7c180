//! Dashboard views and per-session navigation state.

pub mod content;
pub mod render;
pub mod session;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use session::{SessionId, SessionStore, ViewSession};

/// The fixed set of views. Every view is reachable from every other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewId {
    #[default]
    Home,
    Prediction,
    Visualizations,
    DataOverview,
    About,
}

impl ViewId {
    /// Sidebar order.
    pub const ALL: [ViewId; 5] = [
        ViewId::Home,
        ViewId::Prediction,
        ViewId::Visualizations,
        ViewId::DataOverview,
        ViewId::About,
    ];

    /// URL segment under `/view/`.
    pub fn slug(self) -> &'static str {
        match self {
            ViewId::Home => "home",
            ViewId::Prediction => "prediction",
            ViewId::Visualizations => "visualizations",
            ViewId::DataOverview => "data-overview",
            ViewId::About => "about",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewId::Home => "Home",
            ViewId::Prediction => "Prediction",
            ViewId::Visualizations => "Visualizations",
            ViewId::DataOverview => "Data Overview",
            ViewId::About => "About",
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown view: {0}")]
pub struct UnknownView(pub String);

impl FromStr for ViewId {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewId::ALL
            .into_iter()
            .find(|v| v.slug() == s)
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}
