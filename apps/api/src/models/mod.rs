pub mod agency;
pub mod staff;

pub use agency::{Agency, AgencyProfile};
pub use staff::StaffIdentity;
