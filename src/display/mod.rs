//! The main API to the display driver. It owns the interface to the chain and the framebuffer the
//! chain shows, and provides the bring-up sequence, register control, and the bitmap and text
//! drawing entry points.


pub mod framebuffer;
pub mod text;

use crate::command::consts::*;
use crate::command::{self, Command};
use crate::config::Config;
use crate::display::framebuffer::Framebuffer;
use crate::display::text::{FontVariant, TextCompositor};
use crate::error::Error;
use crate::interface::{self, BitOrder};

/// A driver for a chain of MAX7219 devices forming an 8x32 LED matrix.
///
/// All methods take `&mut self` and run each framing window to completion before returning, so a
/// single `Display` can never interleave two frames. Sharing one chain between execution contexts
/// means putting the whole `Display` behind a mutex.
pub struct Display<'g, DI>
where
    DI: interface::DisplayInterface,
{
    iface: DI,
    chain_len: u8,
    intensity: u8,
    font: FontVariant,
    compositor: TextCompositor<'g>,
    framebuffer: Framebuffer,
}

impl<'g, DI> Display<'g, DI>
where
    DI: interface::DisplayInterface,
{
    /// Construct a new display driver for the chain connected to `iface`. Nothing is sent until
    /// `init` is called.
    ///
    /// Fails with `Error::InvalidConfiguration` if the chain length is zero or the configured
    /// intensity is out of range.
    pub fn new(iface: DI, config: Config<'g>) -> Result<Self, Error<DI::Error>> {
        if !config.is_valid() {
            return Err(Error::InvalidConfiguration);
        }
        Ok(Display {
            iface,
            chain_len: config.chain_len,
            intensity: config.intensity,
            font: config.font,
            compositor: config.compositor(),
            framebuffer: Framebuffer::new(),
        })
    }

    /// Bring the chain up: leave test mode, scan all 8 rows, use raw (non-decoded) segment data,
    /// set the configured intensity, blank every LED, and finally leave shutdown mode.
    ///
    /// This clears the framebuffer, and is safe to call again at any time to recover a chain that
    /// was power cycled.
    pub fn init(&mut self) -> Result<(), Error<DI::Error>> {
        debug!("init: chain of {=u8} devices", self.chain_len);
        self.framebuffer.clear();
        self.command(Command::SetDisplayTest(false))?;
        self.command(Command::SetScanLimit(SCAN_LIMIT_MAX))?;
        self.command(Command::SetDecodeMode(0))?;
        self.command(Command::SetIntensity(self.intensity))?;
        self.transfer_framebuffer()?;
        self.command(Command::SetShutdown(false))
    }

    /// Write `data` to register `addr` of every device in the chain. The values are sent as given.
    pub fn send_register(&mut self, addr: u8, data: u8) -> Result<(), Error<DI::Error>> {
        command::broadcast(&mut self.iface, self.chain_len, addr, data)
    }

    /// Set the intensity of every device. Levels above 15 are rejected with
    /// `Error::InvalidArgument` without touching the chain.
    pub fn set_brightness(&mut self, level: u8) -> Result<(), Error<DI::Error>> {
        self.command(Command::SetIntensity(level))?;
        debug!("brightness {=u8}", level);
        self.intensity = level;
        Ok(())
    }

    /// Control shutdown mode. The digit registers keep their contents while shut down.
    pub fn shutdown(&mut self, enabled: bool) -> Result<(), Error<DI::Error>> {
        self.command(Command::SetShutdown(enabled))
    }

    /// Lamp test: light every LED. The framebuffer is blanked and transferred first, so that
    /// `all_off` afterwards leaves the display dark.
    pub fn all_on(&mut self) -> Result<(), Error<DI::Error>> {
        self.framebuffer.clear();
        self.transfer_framebuffer()?;
        self.command(Command::SetDisplayTest(true))
    }

    /// End the lamp test. The display goes back to showing whatever was last transferred.
    pub fn all_off(&mut self) -> Result<(), Error<DI::Error>> {
        self.command(Command::SetDisplayTest(false))
    }

    /// Blank the framebuffer and the display.
    pub fn clear(&mut self) -> Result<(), Error<DI::Error>> {
        self.framebuffer.clear();
        self.transfer_framebuffer()
    }

    /// Select the font used by subsequent calls to `render_text`.
    pub fn set_font(&mut self, font: FontVariant) {
        debug!("font {}", font);
        self.font = font;
    }

    pub fn font(&self) -> FontVariant {
        self.font
    }

    pub fn chain_len(&self) -> u8 {
        self.chain_len
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Direct access to the framebuffer. Changes are shown on the next `transfer_framebuffer`.
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.framebuffer
    }

    /// Render `text` left-aligned in the current font and show it. Returns the number of columns
    /// the text advanced over, including the blank column after each glyph.
    ///
    /// If a character has no glyph, or the text is too wide under `Overflow::Error`, the error is
    /// returned before anything is sent and the framebuffer is left as it was.
    pub fn render_text(&mut self, text: &str) -> Result<usize, Error<DI::Error>> {
        let width = match self
            .compositor
            .render(text, self.font, &mut self.framebuffer)
        {
            Ok(width) => width,
            Err(e) => {
                warn!("render_text: text not rendered");
                return Err(e);
            }
        };
        self.transfer_framebuffer()?;
        Ok(width)
    }

    /// Show `bitmap`, replacing the framebuffer contents.
    pub fn render_bitmap(&mut self, bitmap: &Framebuffer) -> Result<(), Error<DI::Error>> {
        self.framebuffer = *bitmap;
        self.transfer_framebuffer()
    }

    /// Send the framebuffer to the chain.
    ///
    /// Each of the 8 rows goes out in its own framing window as four (address, data) words, one
    /// per 8-column slice of the row starting with columns 0-7. The row address is shifted MSB
    /// first like every other register address, but the slice is shifted LSB first, which puts
    /// column 0 of each slice on segment DP of the device it lands in.
    pub fn transfer_framebuffer(&mut self) -> Result<(), Error<DI::Error>> {
        trace!("transfer framebuffer");
        for (row, addr) in (DIGIT_0..=DIGIT_7).enumerate() {
            self.iface.begin_frame().map_err(Error::Interface)?;
            for slice in self.framebuffer.row_slices(row).iter() {
                self.iface
                    .transfer_byte(addr, BitOrder::MsbFirst)
                    .map_err(Error::Interface)?;
                self.iface
                    .transfer_byte(*slice, BitOrder::LsbFirst)
                    .map_err(Error::Interface)?;
            }
            self.iface.end_frame().map_err(Error::Interface)?;
        }
        Ok(())
    }

    /// Give back the interface.
    pub fn release(self) -> DI {
        self.iface
    }

    fn command(&mut self, cmd: Command) -> Result<(), Error<DI::Error>> {
        cmd.send(&mut self.iface, self.chain_len)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{blank_rows, register, row, table};
    use super::*;
    use crate::display::text::{ColumnOrder, Overflow};
    use crate::glyph::GlyphTable;
    use crate::interface::test_spy::TestSpyInterface;
    use crate::interface::DisplayInterface;
    use proptest::prelude::*;

    fn display<'g>(di: &TestSpyInterface, cfg: Config<'g>) -> Display<'g, TestSpyInterface> {
        Display::new(di.split(), cfg).unwrap()
    }

    #[test]
    fn init_defaults() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(1));
        disp.init().unwrap();
        di.check_multi(&sends!(
            register(1, 0x0F, 0), // display test off
            register(1, 0x0B, 7), // scan limit 8 rows
            register(1, 0x09, 0), // no decode
            register(1, 0x0A, 1), // intensity
            blank_rows(),
            register(1, 0x0C, 1), // normal operation
        ));
    }

    #[test]
    fn init_chain_and_intensity() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(4).intensity(9));
        disp.init().unwrap();
        di.check_multi(&sends!(
            register(4, 0x0F, 0),
            register(4, 0x0B, 7),
            register(4, 0x09, 0),
            register(4, 0x0A, 9),
            blank_rows(),
            register(4, 0x0C, 1),
        ));
    }

    #[test]
    fn init_is_idempotent() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(2));
        disp.init().unwrap();
        let first = di.sent();
        di.clear();
        disp.render_bitmap(&Framebuffer::from_rows([0xFFFF_FFFF; 8]))
            .unwrap();
        di.clear();
        disp.init().unwrap();
        di.check_multi(&first);
        assert!(disp.framebuffer().is_blank());
    }

    #[test]
    fn invalid_configuration() {
        let di = TestSpyInterface::new();
        assert!(match Display::new(di.split(), Config::new(0)) {
            Err(Error::InvalidConfiguration) => true,
            _ => false,
        });
        assert!(match Display::new(di.split(), Config::new(4).intensity(16)) {
            Err(Error::InvalidConfiguration) => true,
            _ => false,
        });
        di.check_multi(&[]);
    }

    #[test]
    fn send_register_is_raw() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(3));
        disp.send_register(0x0A, 0xEE).unwrap();
        di.check_multi(&register(3, 0x0A, 0xEE));
    }

    #[test]
    fn brightness() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(2));
        disp.set_brightness(15).unwrap();
        di.check_multi(&register(2, 0x0A, 15));
        di.clear();
        assert_eq!(disp.set_brightness(16), Err(Error::InvalidArgument));
        di.check_multi(&[]);

        // The new level survives a re-init.
        disp.set_brightness(3).unwrap();
        di.clear();
        disp.init().unwrap();
        assert!(di.frames()[3] == [(0x0A, BitOrder::MsbFirst), (3, BitOrder::MsbFirst)].repeat(2));
    }

    #[test]
    fn shutdown() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(1));
        disp.shutdown(true).unwrap();
        di.check_multi(&register(1, 0x0C, 0));
        di.clear();
        disp.shutdown(false).unwrap();
        di.check_multi(&register(1, 0x0C, 1));
    }

    #[test]
    fn all_on_blanks_then_tests() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(4));
        disp.render_bitmap(&Framebuffer::from_rows([0x0F0F_0F0F; 8]))
            .unwrap();
        di.clear();
        disp.all_on().unwrap();
        di.check_multi(&sends!(blank_rows(), register(4, 0x0F, 1)));
        assert!(disp.framebuffer().is_blank());
    }

    #[test]
    fn all_off_keeps_framebuffer() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(4));
        let bitmap = Framebuffer::from_rows([0x0102_0304; 8]);
        disp.render_bitmap(&bitmap).unwrap();
        di.clear();
        disp.all_off().unwrap();
        di.check_multi(&register(4, 0x0F, 0));
        assert_eq!(*disp.framebuffer(), bitmap);
    }

    #[test]
    fn clear() {
        let mut di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(1));
        disp.framebuffer_mut().set(4, 20, true);
        di.clear();
        disp.clear().unwrap();
        di.check_multi(&blank_rows());
        assert!(disp.framebuffer().is_blank());
    }

    #[test]
    fn transfer_row_encoding() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(4));
        let mut rows = [0u32; 8];
        rows[0] = 0x8000_0001;
        rows[5] = 0x00AB_CD00;
        disp.render_bitmap(&Framebuffer::from_rows(rows)).unwrap();
        di.check_multi(&sends!(
            row(1, [0x01, 0x00, 0x00, 0x80]),
            row(2, [0; 4]),
            row(3, [0; 4]),
            row(4, [0; 4]),
            row(5, [0; 4]),
            row(6, [0x00, 0xCD, 0xAB, 0x00]),
            row(7, [0; 4]),
            row(8, [0; 4]),
        ));
    }

    #[test]
    fn render_text_example() {
        // 'A' is three columns, 'B' two.
        let data = table(128, &[(65, &[0xFF, 0x90, 0xFF][..]), (66, &[0xFF, 0x66][..])]);
        let di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(4).glyph_table(GlyphTable::new(&data)));
        assert_eq!(disp.render_text("AB").unwrap(), 7);

        let fb = *disp.framebuffer();
        // Top row: A is lit across 0..3, column 3 is the spacer, B's first column at 4.
        assert_eq!(fb.row(0), 0b0001_0111);
        // Row 1: only A's outer columns, then both of B's.
        assert_eq!(fb.row(1), 0b0011_0101);

        let frames = di.frames();
        assert_eq!(frames.len(), 8);
        assert_eq!(
            frames[0],
            vec![
                (1, BitOrder::MsbFirst),
                (0b0001_0111, BitOrder::LsbFirst),
                (1, BitOrder::MsbFirst),
                (0, BitOrder::LsbFirst),
                (1, BitOrder::MsbFirst),
                (0, BitOrder::LsbFirst),
                (1, BitOrder::MsbFirst),
                (0, BitOrder::LsbFirst),
            ]
        );
    }

    #[test]
    fn render_text_font_switch() {
        let data = table(200, &[(65, &[0x01][..]), (165, &[0x80][..])]);
        let di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(1).glyph_table(GlyphTable::new(&data)));
        disp.render_text("A").unwrap();
        assert_eq!(disp.framebuffer().row(7), 1);
        disp.set_font(FontVariant::Alternate);
        assert_eq!(disp.font(), FontVariant::Alternate);
        disp.render_text("A").unwrap();
        assert_eq!(disp.framebuffer().row(0), 1);
        assert_eq!(disp.framebuffer().row(7), 0);
    }

    #[test]
    fn render_text_failure_sends_nothing() {
        let data = table(100, &[(65, &[0xFF][..])]);
        let mut di = TestSpyInterface::new();
        let mut disp = display(
            &di,
            Config::new(4)
                .glyph_table(GlyphTable::new(&data))
                .overflow(Overflow::Error),
        );
        disp.render_text("A").unwrap();
        let shown = *disp.framebuffer();
        di.clear();

        assert_eq!(disp.render_text("A~"), Err(Error::GlyphNotFound('~')));
        assert_eq!(
            disp.render_text("AAAAAAAAAAAAAAAAA"),
            Err(Error::TextTooWide)
        );
        di.check_multi(&[]);
        assert_eq!(*disp.framebuffer(), shown);
    }

    #[test]
    fn render_text_reversed_columns() {
        let data = table(100, &[(65, &[0xFF][..])]);
        let di = TestSpyInterface::new();
        let mut disp = display(
            &di,
            Config::new(4)
                .glyph_table(GlyphTable::new(&data))
                .column_order(ColumnOrder::Reversed),
        );
        disp.render_text("A").unwrap();
        assert!(disp.framebuffer().rows().iter().all(|r| *r == 0x8000_0000));
        // Column 31 is the top bit of the last slice, which goes out last in each frame.
        assert_eq!(di.frames()[2][7], (0x80, BitOrder::LsbFirst));
    }

    #[test]
    fn render_text_empty() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(4));
        disp.framebuffer_mut().set(0, 0, true);
        assert_eq!(disp.render_text("").unwrap(), 0);
        assert!(disp.framebuffer().is_blank());
        assert_eq!(di.sent(), blank_rows());
    }

    struct DeadBus;

    impl DisplayInterface for DeadBus {
        type Error = u8;
        fn begin_frame(&mut self) -> Result<(), u8> {
            Ok(())
        }
        fn end_frame(&mut self) -> Result<(), u8> {
            Ok(())
        }
        fn transfer_byte(&mut self, _: u8, _: BitOrder) -> Result<(), u8> {
            Err(42)
        }
    }

    #[test]
    fn interface_errors_propagate() {
        let mut disp = Display::new(DeadBus, Config::new(1)).unwrap();
        assert_eq!(disp.init(), Err(Error::Interface(42)));
        assert_eq!(disp.transfer_framebuffer(), Err(Error::Interface(42)));
    }

    #[test]
    fn release() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di, Config::new(1));
        disp.all_off().unwrap();
        let mut iface = disp.release();
        iface.clear();
        assert!(di.sent().is_empty());
    }

    proptest! {
        #[test]
        fn transfer_framing(rows in any::<[u32; 8]>()) {
            let di = TestSpyInterface::new();
            let mut disp = display(&di, Config::new(4));
            disp.render_bitmap(&Framebuffer::from_rows(rows)).unwrap();
            let frames = di.frames();
            prop_assert_eq!(frames.len(), 8);
            for (r, frame) in frames.iter().enumerate() {
                prop_assert_eq!(frame.len(), 8);
                for (j, pair) in frame.chunks(2).enumerate() {
                    prop_assert_eq!(pair[0], (r as u8 + 1, BitOrder::MsbFirst));
                    prop_assert_eq!(pair[1], ((rows[r] >> (8 * j)) as u8, BitOrder::LsbFirst));
                }
            }
        }

        #[test]
        fn broadcast_fidelity(n in 1u8..=16, addr in any::<u8>(), data in any::<u8>()) {
            let di = TestSpyInterface::new();
            let mut disp = display(&di, Config::new(n));
            disp.send_register(addr, data).unwrap();
            let frames = di.frames();
            prop_assert_eq!(frames.len(), 1);
            prop_assert_eq!(
                &frames[0],
                &[(addr, BitOrder::MsbFirst), (data, BitOrder::MsbFirst)].repeat(n as usize)
            );
        }
    }
}
