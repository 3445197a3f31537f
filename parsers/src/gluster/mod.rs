//! Parsers for GlusterFS CLI output.
//!
//! - [`VolumeInfo`]: `gluster volume info`, one attribute record per volume.
//! - [`VolumeStatus`]: `gluster volume status`, one process table per volume.

mod info;
mod status;

pub use info::{VolumeInfo, VolumeRecord};
pub use status::{
    DIRECTORY_COLUMN, HOST_COLUMN, IP_COLUMN, ONLINE_COLUMN, PID_COLUMN, PROCESS_COLUMN,
    ProcessKind, ProcessRow, RDMA_PORT_COLUMN, TCP_PORT_COLUMN, VolumeStatus,
};
