pub mod ad;
pub mod ai;
pub mod health;
pub mod offer;
