//! Waste routing: pick a disposal container by category and capacity.

mod router;

pub use router::select_waste_container;
