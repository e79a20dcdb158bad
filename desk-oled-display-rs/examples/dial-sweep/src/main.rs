//! Dial sweep example
//!
//! Standalone hardware demonstration that exercises [`OledDriver`] through
//! the [`Surface`] trait, with no encoders and no serial link. Draws the
//! two-dial tab screen and sweeps both needles in opposite directions,
//! verifying the display and the dial geometry on real hardware.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes           |
//! |-----------|------------|-----------------|
//! | I2C0 SDA  | GP4        |                 |
//! | I2C0 SCL  | GP5        |                 |
//! | OLED VCC  | 3V3        |                 |
//! | OLED GND  | GND        |                 |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use desk_oled_display::layout::{self, Side};
use desk_oled_display::{OledDriver, ScreenLayout, Surface};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("Dial sweep example starting");

    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_5, // SCL
        p.PIN_4, // SDA
        Irqs,
        i2c::Config::default(),
    );

    let mut oled = OledDriver::new(i2c, 0x3C);
    oled.init().await.expect("OLED init failed");

    let screen = ScreenLayout::default();
    let mut step: u32 = 0;

    loop {
        let value = (step % 100) as f32 / 100.0;

        oled.clear();
        let target = oled.target();
        layout::draw_header(target, &screen, "Sweep").ok();
        layout::draw_knob(target, &screen, Side::Left, "up", value).ok();
        layout::draw_knob(target, &screen, Side::Right, "down", 1.0 - value).ok();

        if let Err(e) = oled.present().await {
            warn!("present failed: {}", e);
        }

        step = step.wrapping_add(1);
        Timer::after(Duration::from_millis(screen.frame_period_ms())).await;
    }
}
