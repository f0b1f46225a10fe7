//! 파이프라인 전반에서 사용되는 공통 타입.

mod cell;
pub mod field;
mod side;
mod smoothing;
mod weekday;

pub use cell::*;
pub use side::*;
pub use smoothing::*;
pub use weekday::*;
