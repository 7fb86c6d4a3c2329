pub mod init_config;
pub mod update_config;
pub mod create_lottery;
pub mod claim_slot;
pub mod collect_fee;
pub mod collect_prize;

pub use init_config::*;
pub use update_config::*;
pub use create_lottery::*;
pub use claim_slot::*;
pub use collect_fee::*;
pub use collect_prize::*;
