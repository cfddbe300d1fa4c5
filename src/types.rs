//! Core data types for map log entries
//!
//! A map log is an ordered sequence of recorded messages. Each [`Entry`]
//! carries a [`Category`], an [`OrderKey`] and a [`Payload`]. The order key is
//! the only thing that determines replay order downstream: the mower consumes
//! areas strictly by ascending timestamp, so reordering areas means rewriting
//! order keys, never the storage position alone.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a recorded message
///
/// Only some categories are *nameable*: their payload carries a
/// human-readable label. Docking points have no name field at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// A region the mower should cut
    MowingArea,
    /// A region the mower may traverse but not cut
    NavigationArea,
    /// The charging dock location (not nameable)
    DockingPoint,
}

impl Category {
    /// Whether entries of this category carry a human-readable name
    pub fn is_nameable(&self) -> bool {
        matches!(self, Category::MowingArea | Category::NavigationArea)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::MowingArea => "mowing_area",
            Category::NavigationArea => "navigation_area",
            Category::DockingPoint => "docking_point",
        };
        write!(f, "{}", label)
    }
}

/// Absolute ordering token for a log entry
///
/// A monotonically comparable (seconds, nanoseconds) pair. It has no semantic
/// meaning beyond relative sequencing; derived `Ord` compares `secs` first,
/// then `nanos`, which matches timestamp ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct OrderKey {
    /// Whole seconds since the Unix epoch
    pub secs: i64,
    /// Sub-second nanoseconds (0..1_000_000_000)
    pub nanos: u32,
}

impl OrderKey {
    /// Create a new order key
    pub fn new(secs: i64, nanos: u32) -> Self {
        Self { secs, nanos }
    }

    /// A key `delta` whole seconds earlier, preserving the nanosecond part
    pub fn minus_secs(&self, delta: i64) -> Self {
        Self {
            secs: self.secs.saturating_sub(delta),
            nanos: self.nanos,
        }
    }

    /// A key `delta` whole seconds later, preserving the nanosecond part
    pub fn plus_secs(&self, delta: i64) -> Self {
        Self {
            secs: self.secs.saturating_add(delta),
            nanos: self.nanos,
        }
    }

    /// Convert to a UTC datetime for display purposes
    pub fn to_datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.secs, self.nanos)
            .single()
            .unwrap_or_default()
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_datetime().format("%Y-%m-%d %H:%M:%S%.6f"))
    }
}

/// Message content of a log entry
///
/// Modeled as a tagged union so name presence is resolved at the type level:
/// nameable categories carry [`Payload::Named`], everything else carries
/// [`Payload::Opaque`]. The `body` bytes are never interpreted by this crate
/// and are written back verbatim on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Payload with a human-readable name field
    Named {
        /// Operator-assigned label for the area
        name: String,
        /// Opaque serialized message content
        body: Vec<u8>,
    },
    /// Payload without a name field
    Opaque {
        /// Opaque serialized message content
        body: Vec<u8>,
    },
}

/// One record in the editable map log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Message category
    pub category: Category,
    /// Absolute ordering token
    pub order_key: OrderKey,
    /// Message content
    pub payload: Payload,
}

impl Entry {
    /// Create an entry for a nameable category
    pub fn named(category: Category, order_key: OrderKey, name: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            category,
            order_key,
            payload: Payload::Named {
                name: name.into(),
                body,
            },
        }
    }

    /// Create an entry for an un-nameable category
    pub fn opaque(category: Category, order_key: OrderKey, body: Vec<u8>) -> Self {
        Self {
            category,
            order_key,
            payload: Payload::Opaque { body },
        }
    }

    /// Whether this entry's payload carries a name field
    pub fn is_nameable(&self) -> bool {
        self.category.is_nameable()
    }

    /// The entry's name, if its category is nameable
    pub fn name(&self) -> Option<&str> {
        match &self.payload {
            Payload::Named { name, .. } => Some(name),
            Payload::Opaque { .. } => None,
        }
    }

    /// One-line description used in menus
    ///
    /// `pad_category_to` widens the category column so a list of entries
    /// lines up.
    pub fn summary(&self, pad_category_to: usize) -> String {
        let category = self.category.to_string();
        let padding = " ".repeat(pad_category_to.saturating_sub(category.len()));
        let mut line = format!(
            "Category: '{}'{}  Timestamp: {}",
            category, padding, self.order_key
        );
        if let Some(name) = self.name() {
            line.push_str(&format!("  Name: '{}'", name));
        }
        line
    }
}
