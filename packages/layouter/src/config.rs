//! Configuration constants and validation functions for the layouter.

use crate::error::{LayoutError, Result};

/// XML declaration written in front of the document root.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// One level of indentation in serialized XML.
pub const INDENT_UNIT: &str = "    ";

/// Default maximum element nesting depth.
///
/// GeoGebra documents rarely nest deeper than six levels; 64 leaves ample
/// headroom while still rejecting pathological inputs before the stack does.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Upper bound accepted for a user-supplied nesting depth.
pub const MAX_ALLOWED_DEPTH: usize = 4096;

/// Caption text GeoGebra substitutes with the object name.
pub const DEFAULT_CAPTION: &str = "%n";

/// TeX command used for bold captions.
pub const BOLD_COMMAND: &str = "boldsymbol";

/// Suffix appended to the input file stem for the default output path.
pub const OUTPUT_SUFFIX: &str = "_layouted";

/// Name of the XML file inside a GeoGebra archive.
pub const GEOGEBRA_XML_NAME: &str = "geogebra.xml";

/// Validate a user-supplied nesting depth limit.
///
/// # Examples
/// ```
/// use ggb_layouter::config::validate_max_depth;
///
/// assert_eq!(validate_max_depth(32).unwrap(), 32);
/// assert!(validate_max_depth(0).is_err());
/// ```
pub fn validate_max_depth(depth: usize) -> Result<usize> {
    if depth == 0 || depth > MAX_ALLOWED_DEPTH {
        return Err(LayoutError::MalformedValue(format!(
            "max depth must be between 1 and {MAX_ALLOWED_DEPTH}, got {depth}"
        )));
    }
    Ok(depth)
}

/// Options shared by the generic parse and specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum element nesting depth (root is depth 1).
    pub max_depth: usize,
}

impl ParseOptions {
    /// Set the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
