pub mod analysis;
pub mod files;
pub mod transforms;
pub mod view;

pub use analysis::*;
pub use files::*;
pub use transforms::*;
pub use view::*;
