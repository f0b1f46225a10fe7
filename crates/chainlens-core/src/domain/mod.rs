//! 파이프라인 도메인 모델.

mod quote;
mod signal;
mod summary;
mod table;

pub use quote::*;
pub use signal::*;
pub use summary::*;
pub use table::*;
