pub mod account;
pub mod borrow;
pub mod repay;
pub mod supply;
pub mod withdraw;
