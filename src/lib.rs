pub mod cluster;
pub mod error;
pub mod highlight;
pub mod layout;
pub mod network;
pub mod view;
