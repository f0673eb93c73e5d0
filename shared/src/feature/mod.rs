pub mod chain_advancer;
pub mod init_state_feature;
pub mod notification_bridge;
