//! Recognized File Names
//!
//! The playground edits a closed set of files. Everything inside the crate
//! addresses them through [`FileName`], so an unknown name can only appear
//! at the input boundary where it is parsed.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

/// One of the files the playground knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileName {
    /// The HTML entry document (`index.html`)
    #[serde(rename = "index.html")]
    Html,
    /// The stylesheet (`styles.css`)
    #[serde(rename = "styles.css")]
    Stylesheet,
    /// The script (`script.js`)
    #[serde(rename = "script.js")]
    Script,
}

impl FileName {
    /// All recognized names, in tab order
    pub const ALL: [FileName; 3] = [FileName::Html, FileName::Stylesheet, FileName::Script];

    pub fn as_str(self) -> &'static str {
        match self {
            FileName::Html => "index.html",
            FileName::Stylesheet => "styles.css",
            FileName::Script => "script.js",
        }
    }

    /// Media type used when the file is exported
    pub fn mime(self) -> &'static str {
        match self {
            FileName::Html => "text/html",
            FileName::Stylesheet => "text/css",
            FileName::Script => "text/javascript",
        }
    }

    /// Position of the file in [`FileName::ALL`]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        FileName::ALL
            .into_iter()
            .find(|file| file.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                anyhow!(
                    "Unknown file '{}' (expected one of: {})",
                    name,
                    FileName::ALL.map(FileName::as_str).join(", ")
                )
            })
    }
}
