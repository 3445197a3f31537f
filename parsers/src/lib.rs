//! Parsers for captured host command output and fact files.
//!
//! Each parser implements [`FactParser`](hostfacts_core::FactParser) and is
//! tied to the registry name of the spec it consumes:
//!
//! | Spec               | Parser                        |
//! |--------------------|-------------------------------|
//! | `gluster_v_info`   | [`gluster::VolumeInfo`]       |
//! | `gluster_v_status` | [`gluster::VolumeStatus`]     |
//! | `virt_uuid_facts`  | `facts::VirtUuidFacts` (deprecated) |
//!
//! [`parse_spec`] selects the parser by spec name, which is how collectors
//! that only know a spec name and its content hand data over.
//!
//! # Example
//!
//! ```
//! use hostfacts_core::FactParser;
//! use hostfacts_parsers::gluster::VolumeInfo;
//!
//! let output = "\
//! Volume Name: test_vol
//! Type: Replicate
//! Status: Started
//! Number of Bricks: 1 x 3 = 3
//! ";
//!
//! let info = VolumeInfo::parse_str(output).unwrap();
//! assert!(info.contains("test_vol"));
//! assert_eq!(info["test_vol"]["Number of Bricks"], "1 x 3 = 3");
//! ```

pub mod facts;
pub mod gluster;

mod dispatch;

pub use dispatch::{ParsedFacts, is_supported, parse_spec, supported_specs};
