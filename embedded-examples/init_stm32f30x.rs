//! Full example code for setting up a chain of four MAX7219 8x8 modules. This runs on an
//! STM32F303RE, with the chain's DIN and CLK on SPI1 (PA7 and PA5) and LOAD on PA8.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate cortex_m;
extern crate embedded_hal as hal_api;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate max7219_matrix;
extern crate panic_abort;

use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use hal::prelude::*;
use hal::spi;
use max7219_matrix as matrix;

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

/// A tiny glyph table: codes 0-47 are empty, followed by the digits '0' and '1'.
#[cfg_attr(rustfmt, rustfmt_skip)]
static GLYPHS: [u8; 48 + 4 + 2] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    3, 0x7E, 0x81, 0x7E, // '0'
    1, 0xFF,             // '1'
];

fn main() -> ! {
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);

    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);

    // Set up SPI1, which is Alternate Function 5 for GPIOs PA5,6,7. The MAX7219 shifts data in on
    // the rising edge and idles low: MODE 0, MSB first.
    let sck = gpioa.pa5.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let miso = gpioa.pa6.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let mosi = gpioa.pa7.into_af5(&mut gpioa.moder, &mut gpioa.afrl);

    let spi = spi::Spi::spi1(
        dp.SPI1,
        (sck, miso, mosi),
        hal_api::spi::Mode {
            polarity: hal_api::spi::Polarity::IdleLow,
            phase: hal_api::spi::Phase::CaptureOnFirstTransition,
        },
        1.mhz(),
        clocks,
        &mut rcc.apb2,
    );

    // PA8 drives LOAD, shared by every module in the chain. It must idle high.
    let mut load = gpioa
        .pa8
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    load.set_high();

    let mut disp = matrix::Display::new(
        matrix::SpiInterface::new(spi, load),
        matrix::Config::new(4)
            .intensity(4)
            .glyph_table(matrix::GlyphTable::new(&GLYPHS)),
    ).unwrap();

    disp.init().unwrap();
    disp.render_text("1010").unwrap();

    loop {
        asm::wfi();
    }
}
