//! Picks the parser registered for a spec name.

use hostfacts_core::{FactParser, ParseError, Result};
use serde::Serialize;

#[allow(deprecated)]
use crate::facts::VirtUuidFacts;
use crate::gluster::{VolumeInfo, VolumeStatus};

/// Output of whichever parser handled a spec.
#[allow(deprecated)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedFacts {
    GlusterVolumeInfo(VolumeInfo),
    GlusterVolumeStatus(VolumeStatus),
    VirtUuidFacts(VirtUuidFacts),
}

impl ParsedFacts {
    /// Spec name of the parser that produced these facts.
    #[allow(deprecated)]
    pub fn spec(&self) -> &'static str {
        match self {
            Self::GlusterVolumeInfo(_) => VolumeInfo::SPEC,
            Self::GlusterVolumeStatus(_) => VolumeStatus::SPEC,
            Self::VirtUuidFacts(_) => VirtUuidFacts::SPEC,
        }
    }
}

/// Spec names that have a parser.
#[allow(deprecated)]
pub fn supported_specs() -> [&'static str; 3] {
    [VolumeInfo::SPEC, VolumeStatus::SPEC, VirtUuidFacts::SPEC]
}

/// Returns `true` if [`parse_spec`] can handle `spec`.
pub fn is_supported(spec: &str) -> bool {
    supported_specs().contains(&spec)
}

/// Parses `content` collected for `spec`.
///
/// # Errors
///
/// [`ParseError::UnsupportedSpec`] when no parser consumes `spec`, otherwise
/// whatever the selected parser reports.
///
/// # Examples
///
/// ```
/// use hostfacts_parsers::{ParsedFacts, parse_spec};
///
/// let parsed = parse_spec("gluster_v_info", "Volume Name: v\nType: Distribute\n").unwrap();
/// assert!(matches!(parsed, ParsedFacts::GlusterVolumeInfo(_)));
/// assert!(parse_spec("uptime", "up 3 days").is_err());
/// ```
#[allow(deprecated)]
pub fn parse_spec(spec: &str, content: &str) -> Result<ParsedFacts> {
    if spec == VolumeInfo::SPEC {
        VolumeInfo::parse_str(content).map(ParsedFacts::GlusterVolumeInfo)
    } else if spec == VolumeStatus::SPEC {
        VolumeStatus::parse_str(content).map(ParsedFacts::GlusterVolumeStatus)
    } else if spec == VirtUuidFacts::SPEC {
        VirtUuidFacts::parse_str(content).map(ParsedFacts::VirtUuidFacts)
    } else {
        Err(ParseError::UnsupportedSpec(spec.to_string()))
    }
}
