//! Storage size values
//!
//! [`ByteSize`] is the value type used everywhere a quota is expressed in
//! bytes. It never goes negative and carries an explicit "unlimited"
//! sentinel ([`ByteSize::inf`]).

pub mod byte_size;
pub mod unit;

pub use byte_size::ByteSize;
pub use unit::ByteUnit;
