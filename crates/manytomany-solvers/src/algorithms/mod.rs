pub mod hungarian;
pub mod kmedoids;

pub use hungarian::HungarianSolver;
pub use kmedoids::BalancedKMedoids;
