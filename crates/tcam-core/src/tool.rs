use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A cutting tool definition. All dimensions are in the job's native unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Slot number in the machine's tool table (T1, T2, etc.)
    pub number: u32,

    /// Human-readable name.
    pub name: String,

    pub kind: ToolKind,

    /// Cutting diameter. Must be strictly positive.
    pub diameter: f64,

    #[serde(default = "default_flute_count")]
    pub flute_count: u32,

    #[serde(default)]
    pub flute_length: f64,

    #[serde(default)]
    pub overall_length: f64,

    #[serde(default)]
    pub default_rpm: u32,

    #[serde(default)]
    pub default_feed_xy: f64,

    #[serde(default)]
    pub default_feed_z: f64,
}

fn default_flute_count() -> u32 {
    2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    FlatEndmill,
    BallEndmill,
    Drill,
    FaceMill,
}

impl Tool {
    /// Construct a tool, rejecting a non-positive diameter.
    pub fn new(
        number: u32,
        name: impl Into<String>,
        kind: ToolKind,
        diameter: f64,
    ) -> Result<Self, Error> {
        if diameter <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "tool diameter must be positive, got {diameter}"
            )));
        }
        Ok(Self {
            number,
            name: name.into(),
            kind,
            diameter,
            flute_count: default_flute_count(),
            flute_length: 0.0,
            overall_length: 0.0,
            default_rpm: 0,
            default_feed_xy: 0.0,
            default_feed_z: 0.0,
        })
    }

    /// A standard 1/4" 2-flute upcut endmill.
    pub fn quarter_inch_endmill() -> Self {
        Self {
            number: 1,
            name: "1/4\" 2-flute upcut endmill".into(),
            kind: ToolKind::FlatEndmill,
            diameter: 0.25,
            flute_count: 2,
            flute_length: 1.0,
            overall_length: 2.5,
            default_rpm: 10000,
            default_feed_xy: 40.0,
            default_feed_z: 10.0,
        }
    }

    /// Tool radius (half diameter).
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }
}

/// A mapping from tool slot number to `Tool`, persisted as TOML.
#[derive(Debug, Clone, Default)]
pub struct ToolLibrary {
    tools: BTreeMap<u32, Tool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ToolLibraryFile {
    tool: Vec<Tool>,
}

impl ToolLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tool: Tool) {
        self.tools.insert(tool.number, tool);
    }

    pub fn remove(&mut self, number: u32) -> Option<Tool> {
        self.tools.remove(&number)
    }

    pub fn get(&self, number: u32) -> Option<&Tool> {
        self.tools.get(&number)
    }

    /// Tools sorted by slot number.
    pub fn list_tools(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    pub fn to_toml(&self) -> Result<String, Error> {
        let file = ToolLibraryFile {
            tool: self.tools.values().cloned().collect(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }

    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let file: ToolLibraryFile = toml::from_str(text)?;
        let mut library = Self::new();
        for tool in file.tool {
            library.add(tool);
        }
        Ok(library)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}
