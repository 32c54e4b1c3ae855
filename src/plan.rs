//! Installation plans and the step driver
//!
//! A plan is an ordered list of named steps, each a list of shell
//! commands. The driver shows `[i/n] <name>` on the status row for each
//! step and sends all command output through the display's capturing
//! writer.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::display::DisplayController;
use crate::error::Result;
use crate::runner::run_command;

/// One named installation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    #[serde(default)]
    pub commands: Vec<String>,
}

impl Step {
    pub fn new(name: &str, commands: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            commands: commands.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Ordered installation steps
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<Step>,
}

impl Plan {
    /// Load a plan from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read plan from {:?}", path.as_ref()))?;
        let plan: Self = serde_json::from_str(&content).context("Failed to parse plan JSON")?;
        Ok(plan)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.steps.is_empty() {
            anyhow::bail!("Plan has no steps");
        }
        if let Some(pos) = self.steps.iter().position(|s| s.name.trim().is_empty()) {
            anyhow::bail!("Step {} has no name", pos + 1);
        }
        Ok(())
    }

    /// Built-in walkthrough of a full encrypted btrfs install, for dry runs.
    pub fn preview() -> Self {
        let mount = "mount -o X-mount.mkdir,compress=zstd,noatime,subvol=@";
        let mount_root = format!("{mount} /dev/mapper/kickstart /mnt");
        let mount_home = format!("{mount}home /dev/mapper/kickstart /mnt/home");
        Self {
            steps: vec![
                Step::new("Settings", &[]),
                Step::new(
                    "Disk Setup",
                    &[
                        "wipefs -af /dev/sda",
                        "sgdisk -Zo /dev/sda",
                        "parted -s /dev/sda mklabel gpt",
                        "parted -s /dev/sda mkpart ESP fat32 1MiB 513MiB",
                        "parted -s /dev/sda mkpart ENCRYPTED 513MiB 100%",
                        "parted -s /dev/sda set 1 esp on",
                        "partprobe /dev/sda",
                        "mkfs.vfat -F32 -n ESP /dev/disk/by-partlabel/ESP",
                        "cryptsetup luksOpen /dev/disk/by-partlabel/ENCRYPTED kickstart -d -",
                        "mkfs.btrfs -L kickstart /dev/mapper/kickstart",
                        mount_root.as_str(),
                        mount_home.as_str(),
                        "mount /dev/disk/by-partlabel/ESP /mnt/boot/efi",
                    ],
                ),
                Step::new(
                    "System Bootstrap",
                    &[
                        "mkdir -p /mnt/var/db/xbps/keys",
                        "cp /var/db/xbps/keys/* /mnt/var/db/xbps/keys",
                        "xbps-install -Sy -r /mnt base-system cryptsetup grub-x86_64-efi linux",
                    ],
                ),
                Step::new(
                    "System Installation And Configuration",
                    &[
                        "cp /etc/resolv.conf /mnt/etc",
                        "mount --types sysfs none /mnt/sys",
                        "mount --types proc none /mnt/proc",
                        "mount --rbind /dev /mnt/dev",
                        "chroot /mnt /bin/bash -x /root/chroot.sh",
                    ],
                ),
                Step::new(
                    "Cleanup",
                    &["rm -rf /mnt/root/chroot.sh", "umount --recursive /mnt"],
                ),
            ],
        }
    }
}

/// Glyph shown before the status of a well-known step
pub fn step_prefix(name: &str) -> &'static str {
    match name {
        "Settings" => "* ",
        "Disk Setup" => "# ",
        "System Bootstrap" => "^ ",
        "System Installation And Configuration" => "@ ",
        "Cleanup" => "~ ",
        _ => "",
    }
}

/// Status line for step `index` (1-based) of `total`.
pub fn status_text(index: usize, total: usize, name: &str) -> String {
    format!("{}[{index}/{total}] {name}", step_prefix(name))
}

/// Run every step of `plan`, stopping at the first failing command.
pub fn run_plan(display: &DisplayController, plan: &Plan, dry_run: bool) -> Result<()> {
    let total = plan.steps.len();
    let mut out = display.writer();

    for (index, step) in plan.steps.iter().enumerate() {
        let status = status_text(index + 1, total, &step.name);
        info!("Starting step {}", status);
        display.clear_step_output()?;
        display.update_status(&status)?;

        for command in &step.commands {
            run_command(command, dry_run, &mut out)?;
        }
        out.flush()?;
    }

    writeln!(out)?;
    if dry_run {
        writeln!(out, "Dry run completed successfully!")?;
        writeln!(out, "Run without --dry to perform the actual installation.")?;
    } else {
        writeln!(out, "Installation completed successfully!")?;
    }
    out.flush()?;
    Ok(())
}
