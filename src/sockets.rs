//! Item sockets.
//!
//! The `Sockets:` property lists linked groups separated by spaces, with
//! the sockets of a group joined by `-` (`R-G-B B` is a 3-link plus a
//! lone socket).

use serde::{Deserialize, Serialize};

/// Socket colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketColour {
    Red,
    Green,
    Blue,
    White,
    Abyss,
    Delve,
}

impl SocketColour {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "R" => Some(SocketColour::Red),
            "G" => Some(SocketColour::Green),
            "B" => Some(SocketColour::Blue),
            "W" => Some(SocketColour::White),
            "A" => Some(SocketColour::Abyss),
            "DV" => Some(SocketColour::Delve),
            _ => None,
        }
    }
}

/// Linked socket groups of an item, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSockets {
    groups: Vec<Vec<SocketColour>>,
}

impl ItemSockets {
    /// Parse a `Sockets:` property value.
    ///
    /// Returns `None` when there is no valid socket, so items without
    /// sockets carry no socket data at all. Unknown socket codes are
    /// skipped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use itemtext::sockets::ItemSockets;
    ///
    /// let sockets = ItemSockets::parse("R-G-B B").unwrap();
    /// assert_eq!(sockets.total(), 4);
    /// assert_eq!(sockets.links(), 3);
    /// assert!(ItemSockets::parse("").is_none());
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        let groups: Vec<Vec<SocketColour>> = value
            .split_whitespace()
            .map(|group| {
                group
                    .split('-')
                    .filter_map(SocketColour::from_code)
                    .collect::<Vec<_>>()
            })
            .filter(|group| !group.is_empty())
            .collect();
        if groups.is_empty() {
            None
        } else {
            Some(Self { groups })
        }
    }

    pub fn groups(&self) -> &[Vec<SocketColour>] {
        &self.groups
    }

    /// Total number of sockets across groups.
    pub fn total(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Size of the largest linked group.
    pub fn links(&self) -> usize {
        self.groups.iter().map(Vec::len).max().unwrap_or(0)
    }
}
