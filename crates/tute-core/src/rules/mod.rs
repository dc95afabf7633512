pub mod declarations;
pub mod legality;
