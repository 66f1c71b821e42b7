//! Trip-level queries and seat layout provisioning.

pub mod provision;
pub mod seat_map;

pub use provision::{LayoutRequest, ProvisionReport, ProvisionService};
pub use seat_map::{SeatMap, SeatMapService, SeatView};
