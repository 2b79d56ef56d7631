// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Top navigation structure
//!
//! The static registry of dashboard modules (grouped the way the topbar
//! menus group them) and the unread-count badge fed by the
//! [`UnreadCountWatcher`](crate::background::UnreadCountWatcher).

use tokio::sync::watch;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ModuleSection {
    Core,
    Support,
    Admin,
}

/// One entry in the navigation menus
#[derive(Clone, Copy, Debug)]
pub struct ModuleLink {
    /// Internal module number (M1..M11); display-only, not functional.
    pub code: &'static str,
    pub title: &'static str,
    pub path: &'static str,
    pub blurb: &'static str,
    pub section: ModuleSection,
}

pub const MODULES: &[ModuleLink] = &[
    ModuleLink {
        code: "M1",
        title: "Managing Equipment",
        path: "/dashboard/equipment",
        blurb: "Manage physical assets and logical tags.",
        section: ModuleSection::Core,
    },
    ModuleLink {
        code: "M2",
        title: "Metrological Confirmation",
        path: "/dashboard/metrology",
        blurb: "Calibration campaigns and certificates.",
        section: ModuleSection::Core,
    },
    ModuleLink {
        code: "M3",
        title: "Chemical Analysis",
        path: "/dashboard/chemical",
        blurb: "Oil and gas sampling and laboratory analysis.",
        section: ModuleSection::Core,
    },
    ModuleLink {
        code: "M4",
        title: "Onshore Maintenance",
        path: "/dashboard/maintenance",
        blurb: "Kanban board for maintenance workflows.",
        section: ModuleSection::Core,
    },
    ModuleLink {
        code: "M8",
        title: "Planning",
        path: "/dashboard/planning",
        blurb: "Asset inventory and verification planning.",
        section: ModuleSection::Core,
    },
    ModuleLink {
        code: "M9",
        title: "Failure Notification",
        path: "/dashboard/failure-notification",
        blurb: "Register and track meter failures.",
        section: ModuleSection::Core,
    },
    ModuleLink {
        code: "M6",
        title: "Monitoring & Alerts",
        path: "/dashboard/monitoring",
        blurb: "Real-time thresholds and notifications.",
        section: ModuleSection::Support,
    },
    ModuleLink {
        code: "M5",
        title: "Synchronization Data",
        path: "/dashboard/sync",
        blurb: "HMI connections and data dumps.",
        section: ModuleSection::Support,
    },
    ModuleLink {
        code: "M7",
        title: "Export Data",
        path: "/dashboard/export",
        blurb: "Data extraction and XML reporting.",
        section: ModuleSection::Support,
    },
    ModuleLink {
        code: "M10",
        title: "Historical Report",
        path: "/dashboard/reports",
        blurb: "Archive of unit reports and documents.",
        section: ModuleSection::Support,
    },
    ModuleLink {
        code: "M11",
        title: "Configurations",
        path: "/dashboard/configurations",
        blurb: "Hierarchy, attribute rules, and wells.",
        section: ModuleSection::Admin,
    },
];

/// FPSOs offered by the global unit selector.
pub const FPSOS: &[&str] =
    &["SEPETIBA", "SAQUAREMA", "MARICÁ", "PARATY", "ILHABELA"];

/// Links for one section of the navigation menus.
pub fn section_links(section: ModuleSection) -> Vec<&'static ModuleLink> {
    MODULES.iter().filter(|m| m.section == section).collect()
}

/// The unread-alert badge on the topbar bell
pub struct UnreadBadge {
    rx: watch::Receiver<Option<usize>>,
}

impl UnreadBadge {
    pub fn new(rx: watch::Receiver<Option<usize>>) -> UnreadBadge {
        UnreadBadge { rx }
    }

    /// Count to display; zero until the first successful poll.
    pub fn count(&self) -> usize {
        self.rx.borrow().unwrap_or(0)
    }

    /// The badge is drawn only when there is something unread.
    pub fn is_visible(&self) -> bool {
        self.count() > 0
    }
}
