use std::path::Path;
use crate::{prelude::{Context, Device, CommandQueue, CommandQueueProps, Program, Result}, utils::{get_context, get_device, platform_name, device_name, add_sources}};

pub mod multadd;
pub mod outer_sum;

/// Everything a workload needs from the selected device: its context, a profiling queue and names for display.
pub struct Session {
    pub platform_name: String,
    pub device_name: String,
    pub context: Context,
    pub device: Device,
    pub queue: CommandQueue
}

impl Session {
    /// Opens a context on device `device_id` of platform `platform_id` with a profiling-enabled queue.
    pub fn open (platform_id: usize, device_id: usize) -> Result<Self> {
        let context = get_context(platform_id, device_id)?;
        let device = get_device(platform_id, device_id)?;
        let queue = CommandQueue::new(&context, &device, CommandQueueProps::PROFILING_ENABLE)?;

        Ok(Self {
            platform_name: platform_name(platform_id)?,
            device_name: device_name(platform_id, device_id)?,
            context,
            device,
            queue
        })
    }

    /// Loads and builds the kernel file at `path`.
    /// On failure the build status, options and log of the context's first device are printed before returning the error.
    pub fn build_program (&self, path: impl AsRef<Path>) -> Result<Program> {
        let mut sources = Vec::new();
        add_sources(&mut sources, path)?;

        let program = Program::from_sources(&self.context, &sources)?;
        if let Err(e) = program.build(&[], "") {
            self.print_build_diagnostics(&program);
            return Err(e);
        }

        tracing::debug!(device = %self.device_name, "program built");
        Ok(program)
    }

    fn print_build_diagnostics (&self, program: &Program) {
        let device = match self.context.devices() {
            Ok(devices) => devices.first().copied().unwrap_or(self.device),
            Err(e) => {
                tracing::warn!(error = ?e, "failed to query context devices");
                self.device
            }
        };

        let diagnostics = (|| -> Result<_> {
            Ok((program.build_status(&device)?, program.build_options(&device)?, program.build_log(&device)?))
        })();

        match diagnostics {
            Ok((status, options, log)) => {
                println!("Build Status: {status}");
                println!("Build Options:\t{options}");
                println!("Build Log:\t {log}");
            },
            Err(e) => tracing::warn!(error = ?e, "failed to query build diagnostics")
        }
    }
}

/// Compares a device result with its host reference, logging the outcome. Returns the number of differing elements.
pub fn verify (label: &str, device: &[i32], host: &[i32]) -> usize {
    let mismatches = device.iter()
        .zip(host)
        .filter(|(d, h)| d != h)
        .count() + device.len().abs_diff(host.len());

    match mismatches {
        0 => tracing::info!(label, len = device.len(), "device result matches host reference"),
        _ => tracing::warn!(label, mismatches, "device result differs from host reference")
    }

    mismatches
}

#[cfg(test)]
mod tests {
    use super::verify;

    #[test]
    fn verify_counts_differences () {
        assert_eq!(verify("same", &[1, 2, 3], &[1, 2, 3]), 0);
        assert_eq!(verify("one", &[1, 0, 3], &[1, 2, 3]), 1);
        assert_eq!(verify("short", &[1, 2], &[1, 2, 3]), 1);
    }
}
