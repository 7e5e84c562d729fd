//! Parts that other hardware bolts, clips or plugs into.

pub mod board;
pub mod hardware;
pub mod lcd;
pub mod mini_din;
pub mod pcb;
pub mod trackpoint;

pub use board::BoardMount;
pub use lcd::LcdMount;
pub use mini_din::MiniDinMount;
pub use pcb::SingleKeyPcb;
pub use trackpoint::TrackPointMount;
