//! Distribution logos and the header built from them

use crossterm::style::{Color, Stylize};

use crate::types::Distro;

const WORDMARK: [&str; 2] = [
    "█▄▀ █ █▀▀ █▄▀ █▀ ▀█▀ ▄▀█ █▀█ ▀█▀",
    "█░█ █ █▄▄ █░█ ▄█  █  █▀█ █▀▄  █",
];

const VOID_LOGO: &[&str] = &[
    "     _______",
    "  _ \\______ -",
    " | \\  ___  \\ |",
    " | | /   \\ | |",
    " | | \\___/ | |",
    " | \\______ \\_|",
    "  -_______\\",
];

const ARCH_LOGO: &[&str] = &[
    "       /\\",
    "      /  \\",
    "     /\\   \\",
    "    /      \\",
    "   /   ,,   \\",
    "  /   |  |  -\\",
    " /_-''    ''-_\\",
];

const LINUX_LOGO: &[&str] = &[
    "     ___",
    "    |.. |",
    "    |<> |",
    "   / __  \\",
    "  ( /  \\ /|",
    " _/\\ __)/_)",
    " \\/-____\\/",
];

impl Distro {
    pub fn logo(self) -> &'static [&'static str] {
        match self {
            Self::Void => VOID_LOGO,
            Self::Arch => ARCH_LOGO,
            Self::Linux => LINUX_LOGO,
        }
    }

    pub fn welcome(self) -> &'static str {
        match self {
            Self::Void => "Welcome to void.kickstart, a Void Linux installer.",
            Self::Arch => "Welcome to arch.kickstart, an Arch Linux installer.",
            Self::Linux => "Welcome to linux.kickstart, a Linux installer.",
        }
    }
}

/// Header lines for `distro`: logo, wordmark, welcome line and, for dry
/// runs, a banner saying nothing will be changed.
pub fn header_lines(distro: Distro, dry_run: bool) -> Vec<String> {
    let accent = distro.accent().color();
    let mut lines: Vec<String> = distro
        .logo()
        .iter()
        .copied()
        .map(|line| format!("{}", line.with(accent).bold()))
        .collect();
    lines.push(String::new());
    lines.extend(
        WORDMARK
            .iter()
            .copied()
            .map(|line| format!("{}", line.with(Color::White).bold())),
    );
    lines.push(format!("{}", distro.welcome().with(accent)));
    if dry_run {
        lines.push(format!(
            "{} - No actual changes will be made to your system",
            "DRY RUN MODE".with(Color::Yellow).bold()
        ));
    }
    lines
}

/// Status row directly below `header`.
pub fn status_row_below(header: &[String]) -> u16 {
    u16::try_from(header.len())
        .unwrap_or(u16::MAX)
        .saturating_add(1)
}
