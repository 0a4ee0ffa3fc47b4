//! Strongly typed identifiers.
//!
//! Every entity crossing the storage boundary is referenced by a small
//! integer id. Wrapping them keeps a room id from being passed where a
//! timeslot id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the raw id value.
            #[inline]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            #[inline]
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of an offered course section ("opened class").
    SectionId
);
id_type!(
    /// Identifier of a room.
    RoomId
);
id_type!(
    /// Identifier of a lecturer.
    LecturerId
);
id_type!(
    /// Identifier of an academic period.
    PeriodId
);
id_type!(
    /// Identifier of a persisted timetable record.
    RecordId
);

/// Identifier of a timeslot.
///
/// Timeslot ids are densely numbered in chronological order, so `id + 1`
/// is the next slot *only if* both slots fall on the same day. Use
/// [`TimeslotId::offset`] and compare days before treating ids as
/// contiguous.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimeslotId(pub u32);

impl TimeslotId {
    /// Returns the raw id value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the id `n` positions after this one, or `None` past
    /// `u32::MAX`.
    #[inline]
    pub const fn offset(self, n: u32) -> Option<Self> {
        match self.0.checked_add(n) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Returns true if `next` immediately follows this id.
    #[inline]
    pub const fn is_followed_by(self, next: TimeslotId) -> bool {
        match self.0.checked_add(1) {
            Some(id) => id == next.0,
            None => false,
        }
    }
}

impl From<u32> for TimeslotId {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for TimeslotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
