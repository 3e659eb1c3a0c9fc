//! Fuzz target: `codec::decode` and `SocketIoClient::on_frame`
//!
//! Arbitrary text frames must never panic the decoder, and a client fed
//! the same frames must keep its inbound queue within capacity.
//!
//! cargo fuzz run fuzz_packet_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomctl::error::TransportError;
use roomctl::link::client::{FrameSink, INBOUND_QUEUE_LEN, SocketIoClient};
use roomctl::link::codec::{self, Packet};
use roomctl::link::transport::{EventSocket, MAX_EVENT_NAME};

struct Discard;

impl FrameSink for Discard {
    fn send_text(&mut self, _: &str) -> Result<(), TransportError> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(Packet::Event(ev)) = codec::decode(text) {
        assert!(ev.name.len() <= MAX_EVENT_NAME);
    }

    // Treat each line as one frame.
    let mut client = SocketIoClient::new(Discard);
    for frame in text.lines() {
        client.on_frame(frame);
    }
    let mut drained = 0;
    while client.poll().is_some() {
        drained += 1;
    }
    assert!(drained <= INBOUND_QUEUE_LEN);
});
