//! The models module provides the two kinds of Petri net nodes, places and
//! transitions, along with the arena identifiers the net uses to wire them
//! together.  Transitions never own places; they refer to them by
//! `PlaceId`, an index into the place arena of the owning `Net`.

use serde::{Deserialize, Serialize};

pub mod place;
pub mod transition;

pub use self::place::Place;
pub use self::transition::{Arc, PendingCompletions, Transition};

/// Index of a place within its net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(pub usize);

/// Index of a transition within its net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionId(pub usize);
