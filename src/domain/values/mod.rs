pub mod risk;
pub mod sector_breakdown;
pub mod sentiment;
pub mod symbol;
