// Packet-level wire protocol

pub mod packet;

pub use packet::{decode, DecodeError, PACKET_LENGTH};
