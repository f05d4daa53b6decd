#![no_main]
use extplay_core::PlayerConfig;
use extplay_trace::TraceStream;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header parsing must fail cleanly on any input
    if let Ok(stream) = TraceStream::from_bytes(data.to_vec(), &PlayerConfig::default()) {
        assert!(stream.offset() <= stream.size());
    }
});
