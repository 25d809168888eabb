use std::env;

fn main() {
    let target = env::var("TARGET").unwrap();

    // Firmware link flags only apply on the AVR target; the core clock and
    // scheduler modules also build (and test) on the host.
    if target.contains("avr") {
        println!("cargo:rustc-link-arg=-mmcu=atmega328p");
    }

    // Pass CPU frequency for timing calculations
    println!("cargo:rustc-env=MCU_FREQ_HZ=8000000");
}
