#![no_main]
use extplay_core::PlayerConfig;
use extplay_player::Player;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let config = PlayerConfig::relaxed().with_slot_capacity(2);
    let Ok(mut player) = Player::from_bytes(data.to_vec(), config) else {
        return;
    };

    // Walk every record, releasing as we go; decoding must never panic
    loop {
        let handle = match player.next_call(false) {
            Ok(handle) => handle,
            Err(_) => break,
        };
        let sentinel = player.record(handle).is_some_and(|record| record.is_sentinel());
        if player.release(handle).is_err() || sentinel {
            break;
        }
    }
});
