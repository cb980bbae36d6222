//! Domain Components
//!
//! Bills, agencies, representative profiles and the social graph.

pub mod agency;
pub mod bill;
pub mod profile;
pub mod social;

pub use agency::{Agency, RosterError, COMMITTEE_SIZE};
pub use bill::{Bill, BillAnalysis};
pub use profile::PoliticianProfile;
pub use social::{InteractionType, Relationship, RepInfo, SocialGraph, SocialGraphError};
