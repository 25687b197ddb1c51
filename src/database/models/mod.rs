pub mod catalog;
pub mod payment;
pub mod player;

pub use catalog::LookupRow;
pub use payment::Payment;
pub use player::Player;
