//! Vendor and board reference data.
//!
//! The catalog is an ordered list of vendors, each with an ordered list of
//! boards. Order matters only for menu numbering, so a plain `Vec` of
//! entries is enough.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One vendor and the boards it ships.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VendorEntry {
    /// Vendor directory name under `vendors/`.
    pub vendor: String,
    /// Board directory names under `vendors/<vendor>/boards/`.
    pub boards: Vec<String>,
}

impl VendorEntry {
    fn new(vendor: &str, boards: &[&str]) -> Self {
        Self {
            vendor: vendor.to_string(),
            boards: boards.iter().map(|b| b.to_string()).collect(),
        }
    }
}

/// Immutable vendor → boards mapping in menu order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCatalog {
    entries: Vec<VendorEntry>,
}

impl BoardCatalog {
    /// Builds a catalog, rejecting duplicate vendors, empty board lists and
    /// duplicate boards within a vendor.
    pub fn new(entries: Vec<VendorEntry>) -> anyhow::Result<Self> {
        if entries.is_empty() {
            bail!("board catalog has no vendors");
        }

        for (i, entry) in entries.iter().enumerate() {
            if entry.vendor.is_empty() {
                bail!("vendor #{} has an empty name", i + 1);
            }
            if entries[..i].iter().any(|e| e.vendor == entry.vendor) {
                bail!("vendor `{}` is listed twice", entry.vendor);
            }
            if entry.boards.is_empty() {
                bail!("vendor `{}` has no boards", entry.vendor);
            }
            for (j, board) in entry.boards.iter().enumerate() {
                if board.is_empty() {
                    bail!("vendor `{}` has a board with an empty name", entry.vendor);
                }
                if entry.boards[..j].contains(board) {
                    bail!("board `{board}` is listed twice for `{}`", entry.vendor);
                }
            }
        }

        Ok(Self { entries })
    }

    /// Vendors in menu order.
    pub fn entries(&self) -> &[VendorEntry] {
        &self.entries
    }

    /// Looks up a vendor's boards.
    pub fn boards(&self, vendor: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.vendor == vendor)
            .map(|e| e.boards.as_slice())
    }

    /// Returns `true` if `board` is listed under `vendor`.
    pub fn contains(&self, vendor: &str, board: &str) -> bool {
        self.boards(vendor)
            .is_some_and(|boards| boards.iter().any(|b| b == board))
    }
}

impl Default for BoardCatalog {
    fn default() -> Self {
        Self {
            entries: default_entries(),
        }
    }
}

/// The boards supported by the SDK out of the box.
pub fn default_entries() -> Vec<VendorEntry> {
    vec![
        VendorEntry::new(
            "cypress",
            &["CY8CKIT_064S0S2_4343W", "CYW943907AEVAL1F", "CYW954907AEVAL1F"],
        ),
        VendorEntry::new("espressif", &["esp32"]),
        VendorEntry::new("infineon", &["xmc4800_iotkit", "xmc4800_plus_optiga_trust_x"]),
        VendorEntry::new("marvell", &["mw300_rd"]),
        VendorEntry::new("mediatek", &["mt7697hx-dev-kit"]),
        VendorEntry::new("microchip", &["curiosity_pic32mzef", "ecc608a_plus_winsim"]),
        VendorEntry::new("nordic", &["nrf52840-dk"]),
        VendorEntry::new("nuvoton", &["numaker_iot_m487_wifi"]),
        VendorEntry::new("nxp", &["lpc54018iotmodule"]),
        VendorEntry::new("pc", &["linux", "windows"]),
        VendorEntry::new("renesas", &["rx65n-rsk"]),
        VendorEntry::new("st", &["stm32l475_discovery"]),
        VendorEntry::new("ti", &["cc3220_launchpad"]),
        VendorEntry::new("xilinx", &["microzed"]),
    ]
}

/// A vendor/board pair drawn from a [`BoardCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Vendor name.
    pub vendor: String,
    /// Board identifier.
    pub board: String,
}

impl Selection {
    /// Builds a selection from user-supplied names, refusing pairs the
    /// catalog does not list.
    pub fn from_catalog(catalog: &BoardCatalog, vendor: &str, board: &str) -> anyhow::Result<Self> {
        let Some(boards) = catalog.boards(vendor) else {
            bail!("unknown vendor `{vendor}`");
        };
        if !boards.iter().any(|b| b == board) {
            bail!(
                "vendor `{vendor}` has no board `{board}` (known: {})",
                boards.join(", ")
            );
        }
        Ok(Self {
            vendor: vendor.to_string(),
            board: board.to_string(),
        })
    }

    /// The board-choice record: `vendor,board`.
    pub fn record(&self) -> String {
        format!("{},{}", self.vendor, self.board)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.vendor, self.board)
    }
}
