pub mod check;
pub mod batch;
pub mod evaluate;
