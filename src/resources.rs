//! Point-in-time CPU, memory and disk utilization.

use std::fmt;
use std::path::{Path, PathBuf};
use sysinfo::{Disks, System};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ResourceSample {
    /// Global CPU usage since the previous sample
    pub cpu_percent: f64,
    pub ram_percent: f64,
    /// Usage of the filesystem holding the sampler's `disk_path`
    pub disk_percent: f64,
}

/// `after - before`, field by field.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ResourceDelta {
    pub cpu_percent: f64,
    pub ram_percent: f64,
    pub disk_percent: f64,
}

impl ResourceDelta {
    pub fn between(before: ResourceSample, after: ResourceSample) -> ResourceDelta {
        ResourceDelta {
            cpu_percent: after.cpu_percent - before.cpu_percent,
            ram_percent: after.ram_percent - before.ram_percent,
            disk_percent: after.disk_percent - before.disk_percent,
        }
    }
}

pub struct Sampler {
    sys: System,
    disk_path: PathBuf,
}

impl Sampler {
    /// `disk_path` may be relative; it's resolved here, so it must exist.
    pub fn new(disk_path: impl AsRef<Path>) -> Result<Sampler, Error> {
        let disk_path = disk_path.as_ref();
        let disk_path = std::fs::canonicalize(disk_path).map_err(|source| Error::BadPath {
            path: disk_path.to_path_buf(),
            source,
        })?;
        let mut sys = System::new();
        // CPU usage is measured between refreshes, so the first sample needs
        // something to compare against
        sys.refresh_cpu_usage();
        Ok(Sampler { sys, disk_path })
    }

    pub fn sample(&mut self) -> Result<ResourceSample, Error> {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        let total_mem = self.sys.total_memory();
        if total_mem == 0 {
            return Err(Error::NoMemoryInfo);
        }
        let used_mem = total_mem.saturating_sub(self.sys.available_memory());

        let disks = Disks::new_with_refreshed_list();
        let disk = disks
            .list()
            .iter()
            .filter(|d| self.disk_path.starts_with(d.mount_point()))
            .max_by_key(|d| d.mount_point().as_os_str().len())
            .ok_or_else(|| Error::NoDisk {
                path: self.disk_path.clone(),
            })?;
        if disk.total_space() == 0 {
            return Err(Error::EmptyDisk {
                mount_point: disk.mount_point().to_path_buf(),
            });
        }
        let used_disk = disk.total_space().saturating_sub(disk.available_space());

        Ok(ResourceSample {
            cpu_percent: f64::from(self.sys.global_cpu_usage()),
            ram_percent: percent(used_mem, total_mem),
            disk_percent: percent(used_disk, disk.total_space()),
        })
    }

    pub fn disk_path(&self) -> &Path {
        &self.disk_path
    }
}

fn percent(part: u64, total: u64) -> f64 {
    part as f64 / total as f64 * 100.
}

#[derive(Debug)]
pub enum Error {
    BadPath { path: PathBuf, source: std::io::Error },
    NoMemoryInfo,
    NoDisk { path: PathBuf },
    EmptyDisk { mount_point: PathBuf },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::BadPath { path, .. } => write!(f, "Couldn't resolve {}", path.display()),
            Error::NoMemoryInfo => f.write_str("Couldn't read the amount of system memory"),
            Error::NoDisk { path } => write!(f, "No mounted disk holds {}", path.display()),
            Error::EmptyDisk { mount_point } => {
                write!(f, "The disk mounted at {} has no space", mount_point.display())
            }
        }
    }
}
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::BadPath { source, .. } => Some(source),
            _ => None,
        }
    }
}
