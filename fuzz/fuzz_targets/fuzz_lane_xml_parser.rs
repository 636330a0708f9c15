#![no_main]

use lane_path_editor::{parse_lane_customizations, write_lane_customizations};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(records) = parse_lane_customizations(text) else {
        return;
    };

    // Was einmal gelesen wurde, muss sich verlustfrei wieder schreiben und lesen lassen
    let written = write_lane_customizations(&records);
    let reparsed = parse_lane_customizations(&written).expect("eigene Ausgabe nicht lesbar");
    assert_eq!(records, reparsed);
});
